//! In-memory configuration store, seeded from application settings.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::SettingsConfig;
use crate::domain::foundation::DomainError;
use crate::ports::{ConfigurationKey, ConfigurationStore};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigurationStore {
    values: Arc<RwLock<HashMap<ConfigurationKey, String>>>,
}

impl InMemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with every value present in `settings`.
    pub fn from_settings(settings: &SettingsConfig) -> Self {
        let mut values = HashMap::new();
        let seeds = [
            (ConfigurationKey::WelcomeText, settings.welcome_text.clone()),
            (ConfigurationKey::KnowledgeBaseId, settings.knowledge_base_id.clone()),
            (
                ConfigurationKey::KnowledgeBaseEndpointKey,
                settings
                    .knowledge_base_endpoint_key
                    .as_ref()
                    .map(|k| k.expose_secret().clone()),
            ),
            (ConfigurationKey::TeamId, settings.team_id.clone()),
        ];
        for (key, value) in seeds {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                values.insert(key, value);
            }
        }
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Builder-style seed, mostly for tests.
    pub fn with_value(self, key: ConfigurationKey, value: impl Into<String>) -> Self {
        if let Ok(mut values) = self.values.try_write() {
            values.insert(key, value.into());
        }
        self
    }

    pub async fn set(&self, key: ConfigurationKey, value: impl Into<String>) {
        self.values.write().await.insert(key, value.into());
    }

    pub async fn remove(&self, key: ConfigurationKey) {
        self.values.write().await.remove(&key);
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn get(&self, key: ConfigurationKey) -> Result<Option<String>, DomainError> {
        Ok(self.values.read().await.get(&key).cloned())
    }
}
