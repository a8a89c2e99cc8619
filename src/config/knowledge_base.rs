//! Knowledge base service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::{is_http_url, ValidationError};

/// Knowledge base service connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Runtime endpoint, e.g. `https://contoso.azurewebsites.net/qnamaker`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of answers requested per query
    #[serde(default = "default_top")]
    pub top: u32,
}

impl KnowledgeBaseConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate knowledge base configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.endpoint) {
            return Err(ValidationError::InvalidUrl("KNOWLEDGE_BASE__ENDPOINT"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.top == 0 || self.top > 10 {
            return Err(ValidationError::InvalidTop);
        }
        Ok(())
    }
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            top: default_top(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000/qnamaker".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_top() -> u32 {
    1
}
