use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::clients::DEFAULT_SPONSORED_LIMIT;

pub const DEFAULT_MOBILE_WIDTH_THRESHOLD: u32 = 1001;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub log_to_file: bool,
    pub log_file: String,
    pub storage_path: String,
    pub presence_base_url: String,
    pub trader_info_base_url: String,
    /// Credential injected by the embedding host; wins over the stored one
    pub api_key: Option<String>,
    pub sponsored_limit: usize,
    pub request_timeout_secs: u64,
    pub mobile_width_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
            log_file: "log/trader_roster.log".to_string(),
            storage_path: "data/roster.sled".to_string(),
            presence_base_url: "https://api.torn.com".to_string(),
            trader_info_base_url: "http://157.180.24.109:3000".to_string(),
            api_key: None,
            sponsored_limit: DEFAULT_SPONSORED_LIMIT,
            request_timeout_secs: 10,
            mobile_width_threshold: DEFAULT_MOBILE_WIDTH_THRESHOLD,
        }
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from("config/config")
}

/// Defaults, then the optional file at `path` (any extension `config`
/// understands), then `ROSTER_*` environment variables
pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let s = Config::builder()
        // Set defaults
        .set_default("log_level", defaults.log_level)?
        .set_default("log_to_file", defaults.log_to_file)?
        .set_default("log_file", defaults.log_file)?
        .set_default("storage_path", defaults.storage_path)?
        .set_default("presence_base_url", defaults.presence_base_url)?
        .set_default("trader_info_base_url", defaults.trader_info_base_url)?
        .set_default("sponsored_limit", defaults.sponsored_limit as i64)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
        .set_default("mobile_width_threshold", defaults.mobile_width_threshold as i64)?
        // Add configuration from a file
        .add_source(File::with_name(path).required(false))
        // Add configuration from environment variables
        .add_source(Environment::with_prefix("ROSTER"))
        .build()?;

    s.try_deserialize()
}
