//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `ticket` - Ticket aggregate and its status-change rules
//! - `routing` - Inbound activity model, commands, submissions, tag scoring
//! - `cards` - Outbound content model and display rules

pub mod cards;
pub mod foundation;
pub mod routing;
pub mod ticket;
