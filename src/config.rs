use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::Result;

pub const ENV_PREFIX: &str = "TOKENSWAP";
pub const DEFAULT_PRICE_SOURCE_URL: &str = "https://interview.switcheo.com/prices.json";
pub const DEFAULT_ICON_BASE_URL: &str = "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    // Price feed
    pub price_source_url: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,

    // Display
    pub icon_base_url: String,

    // Default pair, used when both symbols are listed
    pub primary_currency: String,
    pub secondary_currency: String,

    // Amount fields
    pub amount_decimals: usize,

    // Simulated swap execution
    pub swap_latency_ms: u64,

    // Logging
    pub log_dir: String,
    pub log_level: Option<String>,
}

impl Settings {
    /// Layered load: `config/{RUN_MODE}`, `config/local`, then `TOKENSWAP_*` environment variables.
    /// An optional `.env` file is read into the environment first.
    pub fn new() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded configuration from .env file");
        }
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Self::with_defaults(ConfigBuilder::<DefaultState>::default())?
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("price_source_url", DEFAULT_PRICE_SOURCE_URL)?
            .set_default("request_timeout_secs", 30)?
            .set_default("max_retries", 3)?
            .set_default("retry_backoff_ms", 1000)?
            .set_default("icon_base_url", DEFAULT_ICON_BASE_URL)?
            .set_default("primary_currency", "ETH")?
            .set_default("secondary_currency", "USDC")?
            .set_default("amount_decimals", 5)?
            .set_default("swap_latency_ms", 2500)?
            .set_default("log_dir", "./logs")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn swap_latency(&self) -> Duration {
        Duration::from_millis(self.swap_latency_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        // Defaults only, no external sources
        Self::with_defaults(Config::builder())
            .and_then(|builder| builder.build())
            .and_then(|config| config.try_deserialize())
            .unwrap_or_else(|_| Settings {
                price_source_url: DEFAULT_PRICE_SOURCE_URL.to_string(),
                request_timeout_secs: 30,
                max_retries: 3,
                retry_backoff_ms: 1000,
                icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
                primary_currency: "ETH".to_string(),
                secondary_currency: "USDC".to_string(),
                amount_decimals: 5,
                swap_latency_ms: 2500,
                log_dir: "./logs".to_string(),
                log_level: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.price_source_url, DEFAULT_PRICE_SOURCE_URL);
        assert_eq!(settings.primary_currency, "ETH");
        assert_eq!(settings.secondary_currency, "USDC");
        assert_eq!(settings.amount_decimals, 5);
        assert_eq!(settings.swap_latency(), Duration::from_millis(2500));
        assert!(settings.log_level.is_none());
    }

    #[test]
    fn test_settings_layer_environment() {
        std::env::set_var("TOKENSWAP_SWAP_LATENCY_MS", "10");
        std::env::set_var("TOKENSWAP_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("TOKENSWAP_LOG_LEVEL", "debug");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.swap_latency_ms, 10);
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.max_retries, 3);
    }
}
