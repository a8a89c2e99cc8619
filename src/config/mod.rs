//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EXPERT_DESK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use expert_desk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Answering tenant {}", config.bot.expected_tenant_id);
//! ```

mod bot;
mod error;
mod knowledge_base;
mod settings;
mod tag_index;
mod telemetry;

pub use bot::BotConfig;
pub use error::{ConfigError, ValidationError};
pub use knowledge_base::KnowledgeBaseConfig;
pub use settings::SettingsConfig;
pub use tag_index::TagIndexConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Tenant filter and tour links
    pub bot: BotConfig,

    /// Seed values for the configuration store
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Knowledge base service connection
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,

    /// YAML tile file for tag search
    #[serde(default)]
    pub tag_index: TagIndexConfig,

    /// Log filter and output format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EXPERT_DESK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EXPERT_DESK__BOT__EXPECTED_TENANT_ID=...` -> `bot.expected_tenant_id = ...`
    /// - `EXPERT_DESK__SETTINGS__TEAM_ID=...` -> `settings.team_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EXPERT_DESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.knowledge_base.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
