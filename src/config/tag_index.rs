//! Tag index configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Location of the YAML tile file used for tag search
#[derive(Debug, Clone, Deserialize)]
pub struct TagIndexConfig {
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for TagIndexConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("config/tiles.yaml")
}
