//! Ticket status and the derived lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketStatus::Open => "Open",
            TicketStatus::Closed => "Closed",
        };
        write!(f, "{}", s)
    }
}

/// Lifecycle state, derived from status plus assignment.
///
/// Transitions:
/// - any state --Reopen--> OpenUnassigned
/// - any state --Close--> Closed
/// - any state --AssignToSelf--> OpenAssigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    OpenUnassigned,
    OpenAssigned,
    Closed,
}

impl TicketState {
    /// Returns true if the ticket still awaits resolution.
    pub fn is_open(&self) -> bool {
        !matches!(self, TicketState::Closed)
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketState::OpenUnassigned => "Open-Unassigned",
            TicketState::OpenAssigned => "Open-Assigned",
            TicketState::Closed => "Closed",
        };
        write!(f, "{}", s)
    }
}
