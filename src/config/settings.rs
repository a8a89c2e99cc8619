//! Seed values for the runtime configuration store

use secrecy::SecretString;
use serde::Deserialize;

/// Values loaded into the configuration store at startup.
///
/// All entries are optional; the handlers degrade when one is absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsConfig {
    /// Text of the personal welcome card
    pub welcome_text: Option<String>,

    /// Knowledge base queried for answers
    pub knowledge_base_id: Option<String>,

    /// Endpoint key of the knowledge base service
    pub knowledge_base_endpoint_key: Option<SecretString>,

    /// Channel that receives tickets and feedback
    pub team_id: Option<String>,
}
