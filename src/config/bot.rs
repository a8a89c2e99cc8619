//! Bot identity configuration

use serde::Deserialize;

use super::error::{is_http_url, ValidationError};

/// Tenant and hosting settings of the bot itself
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Only activities from this tenant are handled
    pub expected_tenant_id: String,

    /// Base URI of the static tour pages
    #[serde(default = "default_app_base_uri")]
    pub app_base_uri: String,
}

impl BotConfig {
    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.expected_tenant_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BOT__EXPECTED_TENANT_ID"));
        }
        if !is_http_url(&self.app_base_uri) {
            return Err(ValidationError::InvalidUrl("BOT__APP_BASE_URI"));
        }
        Ok(())
    }
}

fn default_app_base_uri() -> String {
    "http://localhost:3978".to_string()
}
