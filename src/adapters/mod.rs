//! Adapters - Implementations of port interfaces.
//!
//! - `configuration` - configuration store seeded from application settings
//! - `knowledge_base` - HTTP `generateAnswer` client and a scripted mock
//! - `notifier` - recording notifier for tests and the console host
//! - `storage` - versioned in-memory ticket store
//! - `tag_index` - help tiles loaded from a YAML file

pub mod configuration;
pub mod knowledge_base;
pub mod notifier;
pub mod storage;
pub mod tag_index;

pub use configuration::InMemoryConfigurationStore;
pub use knowledge_base::{HttpKnowledgeBaseClient, HttpKnowledgeBaseConfig, MockKnowledgeBaseClient};
pub use notifier::{Delivery, RecordingNotifier};
pub use storage::InMemoryTicketStore;
pub use tag_index::YamlTagIndex;
