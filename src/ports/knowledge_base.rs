//! Knowledge base port - question answering over curated content.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which knowledge base to ask and the key to ask it with.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseTarget {
    pub knowledge_base_id: String,
    pub endpoint_key: SecretString,
}

/// One ranked answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseMatch {
    /// The stored question the answer belongs to.
    pub question: String,
    pub answer: String,
    /// Confidence in `0.0..=100.0`.
    pub score: f64,
}

/// Knowledge base failures. The router treats all of them as "no match".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnowledgeBaseError {
    #[error("knowledge base request failed: {0}")]
    Network(String),

    #[error("knowledge base returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("knowledge base response could not be parsed: {0}")]
    Parse(String),

    #[error("knowledge base rejected the endpoint key")]
    Unauthorized,
}

/// Client for the knowledge base service.
#[async_trait]
pub trait KnowledgeBaseClient: Send + Sync {
    /// Returns matches for `question`, best first. An empty result means
    /// nothing scored above the service's threshold.
    async fn query(
        &self,
        target: &KnowledgeBaseTarget,
        question: &str,
    ) -> Result<Vec<KnowledgeBaseMatch>, KnowledgeBaseError>;
}
