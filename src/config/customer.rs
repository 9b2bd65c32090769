use serde::{Deserialize, Serialize};

/// Someone the booth sells milk to.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
