//! CLI configuration

use anyhow::Result;
use serde::Deserialize;

/// Defaults overridable through `TDP_`-prefixed environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Directory holding stored model bundles
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    /// Profit target column in training tables
    #[serde(default = "default_profit_column")]
    pub profit_column: String,

    /// Delivery target column in training tables
    #[serde(default = "default_delivery_column")]
    pub delivery_column: String,
}

fn default_model_dir() -> String {
    "./models".to_string()
}

fn default_profit_column() -> String {
    "profit_margin_percentage".to_string()
}

fn default_delivery_column() -> String {
    "actual_delivery_days".to_string()
}

impl CliConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("TDP"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| CliConfig {
            model_dir: default_model_dir(),
            profit_column: default_profit_column(),
            delivery_column: default_delivery_column(),
        }))
    }
}
