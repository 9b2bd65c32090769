pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod notify;
pub mod rates;
pub mod records;
pub mod report;

pub use config::{Collection, Customer, Ledger, Sale, Session, Supplier, Withdrawal};
pub use error::{MilkboothError, Result};
pub use rates::MilkType;
