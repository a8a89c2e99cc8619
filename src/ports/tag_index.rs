//! Tag index port - the catalogue of help tiles searched by keyword.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::routing::HelpTile;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagIndexError {
    #[error("tag index unavailable: {0}")]
    Unavailable(String),

    #[error("tag index is malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TagIndex: Send + Sync {
    /// Lists every tile in index order.
    async fn list_entities(&self) -> Result<Vec<HelpTile>, TagIndexError>;
}
