//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and its collaborators. Adapters implement these ports.
//!
//! - `ConfigurationStore` - runtime settings (welcome text, team id, ...)
//! - `KnowledgeBaseClient` - ranked question answering
//! - `TagIndex` - help tiles searched by keyword overlap
//! - `TicketStore` - versioned ticket persistence
//! - `Notifier` - message delivery and in-place updates

mod configuration_store;
mod knowledge_base;
mod notifier;
mod tag_index;
mod ticket_store;

pub use configuration_store::{ConfigurationKey, ConfigurationStore};
pub use knowledge_base::{
    KnowledgeBaseClient, KnowledgeBaseError, KnowledgeBaseMatch, KnowledgeBaseTarget,
};
pub use notifier::{Notifier, NotifierError};
pub use tag_index::{TagIndex, TagIndexError};
pub use ticket_store::TicketStore;
