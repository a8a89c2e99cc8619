//! Configuration store port.
//!
//! Runtime settings an administrator can change without a redeploy. Values
//! are read on every use, so a change takes effect on the next message.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::DomainError;

/// Keys the core reads from the configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationKey {
    WelcomeText,
    KnowledgeBaseId,
    KnowledgeBaseEndpointKey,
    TeamId,
}

impl ConfigurationKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigurationKey::WelcomeText => "WelcomeMessageText",
            ConfigurationKey::KnowledgeBaseId => "KnowledgeBaseId",
            ConfigurationKey::KnowledgeBaseEndpointKey => "KnowledgeBaseEndpointKey",
            ConfigurationKey::TeamId => "TeamId",
        }
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value lookup for runtime settings.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Returns the value for `key`, or `None` when it was never set.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` when the backing store cannot be read
    async fn get(&self, key: ConfigurationKey) -> Result<Option<String>, DomainError>;
}
