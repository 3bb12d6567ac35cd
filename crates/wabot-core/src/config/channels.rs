use serde::{Deserialize, Serialize};

use super::defaults::*;

/// WhatsApp channel config.
///
/// Session data is stored at `{data_dir}/whatsapp_session/`.
/// Pairing is done by scanning a QR code (like WhatsApp Web).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Allowed phone numbers (e.g. `["5511999887766"]`). Empty = allow all.
    #[serde(default)]
    pub allowed_users: Vec<String>,
    /// Phone number or JID notified when the bot comes online. Empty = off.
    #[serde(default)]
    pub admin_number: String,
    /// Seconds to wait after a disconnect before reconnecting.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
    /// Seconds between attempts when the initial connect fails.
    #[serde(default = "default_init_retry")]
    pub init_retry_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_users: Vec::new(),
            admin_number: String::new(),
            reconnect_delay_secs: default_reconnect_delay(),
            init_retry_secs: default_init_retry(),
        }
    }
}

/// HTTP health server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}
