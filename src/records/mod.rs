mod entry;
mod migrate;

pub use entry::{
    add_collection, add_sale, add_withdrawal, delete_collection, delete_sale, delete_withdrawal,
    edit_collection, edit_withdrawal, normalize_date, parse_month, DeliveryEdit, DeliveryInput,
};
pub use migrate::{migrate_buffalo_rates, MigrationOutcome, RateFix};
