use std::path::PathBuf;
use thiserror::Error;

use crate::rates::MilkType;

#[derive(Error, Debug)]
pub enum MilkboothError {
    #[error("Config directory not found at {0}. Run 'milkbooth init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Supplier '{0}' not found in suppliers.toml")]
    SupplierNotFound(String),

    #[error("Customer '{0}' not found in customers.toml")]
    CustomerNotFound(String),

    #[error("Supplier '{0}' already exists in suppliers.toml")]
    SupplierExists(String),

    #[error("Customer '{0}' already exists in customers.toml")]
    CustomerExists(String),

    #[error("No rate found for {milk_type} milk with fat {fat}")]
    RateNotFound { milk_type: MilkType, fat: f64 },

    #[error("Liters must be greater than zero (got {0})")]
    InvalidLiters(f64),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM.")]
    InvalidMonth(String),

    #[error("No {kind} record with id {id}. Use the daily listings to find record ids.")]
    RecordNotFound { kind: &'static str, id: u64 },

    #[error("Failed to write CSV export: {0}")]
    CsvExport(String),

    #[error("Notification gateway error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MilkboothError>;
