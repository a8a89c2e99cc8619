//! Application layer - Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! It owns no state; durable state lives behind the `TicketStore` port.

pub mod handlers;

pub use handlers::{
    ActivityHandler, ActivityOutcome, ContentSearch, CreateTicketCommand, CreateTicketOutcome,
    MessageRouter, RouteDecision, RouterError, ShareFeedbackHandler, TicketActionCommand,
    TicketActionOutcome, TicketLifecycle,
};
