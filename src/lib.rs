//! Expert Desk - conversational help desk core.
//!
//! Routes chat messages to static cards, knowledge base answers, tag-based
//! help tiles, or a human-expert ticket, and runs the ticket lifecycle
//! between the requester and the support team.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
