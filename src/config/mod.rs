mod customer;
mod ledger;
mod settings;
mod supplier;

pub use customer::Customer;
pub use ledger::{in_month, Collection, Counter, Ledger, Sale, Session, Withdrawal};
pub use settings::{Booth, ExportSettings, NotifySettings, Settings};
pub use supplier::Supplier;

use crate::error::{MilkboothError, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.milkbooth/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "milkbooth") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.milkbooth/
    let home = dirs_home().ok_or_else(|| {
        MilkboothError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".milkbooth"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Resolve the export directory: ~ expands, relative paths hang off the
/// config directory.
pub fn resolve_output_dir(output_dir: &str, config_dir: &PathBuf) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Load the main settings.toml
pub fn load_settings(config_dir: &PathBuf) -> Result<Settings> {
    let path = config_dir.join("settings.toml");
    if !path.exists() {
        return Err(MilkboothError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MilkboothError::ConfigParse { path, source: e })
}

/// Load suppliers.toml as a HashMap
pub fn load_suppliers(config_dir: &PathBuf) -> Result<HashMap<String, Supplier>> {
    let path = config_dir.join("suppliers.toml");
    if !path.exists() {
        return Err(MilkboothError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MilkboothError::ConfigParse { path, source: e })
}

/// Save suppliers.toml
pub fn save_suppliers(config_dir: &PathBuf, suppliers: &HashMap<String, Supplier>) -> Result<()> {
    let path = config_dir.join("suppliers.toml");
    let content = toml::to_string_pretty(suppliers).map_err(|e| {
        MilkboothError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Load customers.toml as a HashMap
pub fn load_customers(config_dir: &PathBuf) -> Result<HashMap<String, Customer>> {
    let path = config_dir.join("customers.toml");
    if !path.exists() {
        return Err(MilkboothError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MilkboothError::ConfigParse { path, source: e })
}

/// Save customers.toml
pub fn save_customers(config_dir: &PathBuf, customers: &HashMap<String, Customer>) -> Result<()> {
    let path = config_dir.join("customers.toml");
    let content = toml::to_string_pretty(customers).map_err(|e| {
        MilkboothError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Load ledger.toml (creates default if missing)
pub fn load_ledger(config_dir: &PathBuf) -> Result<Ledger> {
    let path = config_dir.join("ledger.toml");
    if !path.exists() {
        return Ok(Ledger::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| MilkboothError::ConfigParse { path, source: e })
}

/// Save ledger.toml
pub fn save_ledger(config_dir: &PathBuf, ledger: &Ledger) -> Result<()> {
    let path = config_dir.join("ledger.toml");
    let content = toml::to_string_pretty(ledger).map_err(|e| {
        MilkboothError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Sort key that orders plain-number ids numerically and pushes
/// everything else to the end alphabetically.
pub fn id_sort_key(id: &str) -> (u64, String) {
    match id.parse::<u64>() {
        Ok(n) => (n, String::new()),
        Err(_) => (u64::MAX, id.to_string()),
    }
}

/// Template content for settings.toml
pub const SETTINGS_TEMPLATE: &str = r#"[booth]
name = "Milk Booth"
currency_symbol = "₹"

[export]
output_dir = "~/.milkbooth/exports"

# Uncomment to send WhatsApp notifications through a gateway after
# collections and withdrawals are recorded.
# [notify]
# gateway_url = "https://gateway.example.com/send"
"#;

/// Template content for suppliers.toml
pub const SUPPLIERS_TEMPLATE: &str = r#"# Define your milk suppliers here. The table name (e.g., [12]) is used
# as the supplier identifier in the collect and withdraw commands.
#
# Example:
#   milkbooth collect --supplier 12 --liters 10 --fat 6.5

[example-supplier]
name = "Example Supplier"
mobile = "9876543210"           # optional, used for notifications
address = "Village Main Road"   # optional
"#;

/// Template content for customers.toml
pub const CUSTOMERS_TEMPLATE: &str = r#"# Define your milk customers here. The table name (e.g., [c1]) is used
# as the customer identifier in the sell command.
#
# Example:
#   milkbooth sell --customer c1 --liters 2 --fat 6.0

[example-customer]
name = "Example Customer"
mobile = "9123456780"           # optional
address = "Market Street"       # optional
"#;
