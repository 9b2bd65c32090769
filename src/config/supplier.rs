use serde::{Deserialize, Serialize};

/// Someone who delivers milk to the booth. Keyed in suppliers.toml by a
/// short human-assigned id (usually a plain number).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Supplier {
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
