//! Help desk handlers: activity intake, message routing, content search,
//! the ticket lifecycle and feedback forwarding.

mod activity;
mod content_search;
mod errors;
mod message_router;
mod share_feedback;
mod ticket_lifecycle;

pub use activity::{ActivityHandler, ActivityOutcome, DEFAULT_WELCOME_TEXT};
pub use content_search::{
    ContentSearch, KnowledgeBaseLookup, LookupStrategy, SearchOutcome, TagLookup,
};
pub use errors::RouterError;
pub use message_router::{MessageRouter, RouteDecision};
pub use share_feedback::{
    ShareFeedbackCommand, ShareFeedbackHandler, ShareFeedbackOutcome, THANK_YOU_TEXT,
};
pub use ticket_lifecycle::{
    CreateTicketCommand, CreateTicketOutcome, TicketActionCommand, TicketActionOutcome,
    TicketLifecycle,
};
