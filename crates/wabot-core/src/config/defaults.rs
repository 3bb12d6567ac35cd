//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "WhatsApp Bot".to_string()
}

pub fn default_version() -> String {
    "2.0.0".to_string()
}

pub fn default_platform() -> String {
    "Heroku".to_string()
}

pub fn default_data_dir() -> String {
    "~/.wabot".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_reconnect_delay() -> u64 {
    5
}

pub fn default_init_retry() -> u64 {
    10
}

pub fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_api_port() -> u16 {
    3000
}

pub fn default_fallback_rate() -> f64 {
    0.3
}

pub fn default_fallback_message() -> String {
    "Sorry, I didn't understand that. Type !help to see what I can do.".to_string()
}
