//! YAML-file tag index.
//!
//! The tile catalogue is a YAML sequence of tiles. The file is read on
//! every lookup so edits take effect without a restart.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::routing::HelpTile;
use crate::ports::{TagIndex, TagIndexError};

#[derive(Debug, Clone)]
pub struct YamlTagIndex {
    path: PathBuf,
}

impl YamlTagIndex {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TagIndex for YamlTagIndex {
    async fn list_entities(&self) -> Result<Vec<HelpTile>, TagIndexError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            TagIndexError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&content).map_err(|e| TagIndexError::Malformed(e.to_string()))
    }
}
