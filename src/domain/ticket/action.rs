//! Status-change actions a support team member can take on a ticket.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TicketState;

/// Closed set of status-change actions submitted from the team's ticket card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketAction {
    Reopen,
    Close,
    AssignToSelf,
}

impl TicketAction {
    /// Wire name carried by card buttons.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketAction::Reopen => "Reopen",
            TicketAction::Close => "Close",
            TicketAction::AssignToSelf => "AssignToSelf",
        }
    }

    /// State the ticket is in after the action is applied.
    pub fn target_state(&self) -> TicketState {
        match self {
            TicketAction::Reopen => TicketState::OpenUnassigned,
            TicketAction::Close => TicketState::Closed,
            TicketAction::AssignToSelf => TicketState::OpenAssigned,
        }
    }

    /// Every action, in card button order.
    pub fn all() -> [TicketAction; 3] {
        [
            TicketAction::AssignToSelf,
            TicketAction::Close,
            TicketAction::Reopen,
        ]
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action name that is not part of [`TicketAction`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown status command {0}")]
pub struct UnknownTicketAction(pub String);

impl FromStr for TicketAction {
    type Err = UnknownTicketAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reopen" => Ok(TicketAction::Reopen),
            "close" => Ok(TicketAction::Close),
            "assigntoself" => Ok(TicketAction::AssignToSelf),
            _ => Err(UnknownTicketAction(s.to_string())),
        }
    }
}
