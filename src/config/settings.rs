use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub booth: Booth,
    pub export: ExportSettings,
    #[serde(default)]
    pub notify: NotifySettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Booth {
    pub name: String,
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportSettings {
    pub output_dir: String,
}

/// Optional notification gateway. When no URL is configured, record
/// commits simply skip the notification step.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct NotifySettings {
    #[serde(default)]
    pub gateway_url: Option<String>,
}
