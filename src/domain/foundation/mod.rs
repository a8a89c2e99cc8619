//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the help desk domain.

mod delivery;
mod errors;
mod ids;
mod timestamp;

pub use delivery::DeliveryHandle;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConversationId, MessageId, TicketId, UserId};
pub use timestamp::Timestamp;
