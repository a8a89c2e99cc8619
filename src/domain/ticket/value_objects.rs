//! Value objects owned by the Ticket aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, Timestamp, UserId};

// ════════════════════════════════════════════════════════════════════════════════
// TicketVersion - Optimistic concurrency token
// ════════════════════════════════════════════════════════════════════════════════

/// Version of a stored ticket record.
///
/// Versions only increase. `unsaved()` marks a ticket that has never been
/// persisted; every successful upsert bumps the version by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TicketVersion(u64);

impl TicketVersion {
    /// Version of a ticket that has not been stored yet.
    pub fn unsaved() -> Self {
        Self(0)
    }

    /// Creates a version from a raw value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw version number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// True until the ticket is first persisted.
    pub fn is_unsaved(&self) -> bool {
        self.0 == 0
    }

    /// Returns the next version.
    pub fn increment(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for TicketVersion {
    fn default() -> Self {
        Self::unsaved()
    }
}

impl std::fmt::Display for TicketVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Actor / Requester / Assignment
// ════════════════════════════════════════════════════════════════════════════════

/// A chat user acting on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
}

impl Actor {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Identity and return address of the user who raised the ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub id: UserId,
    pub display_name: String,
    pub principal_name: Option<String>,
    /// 1:1 conversation where status notifications are delivered.
    pub conversation: ConversationId,
}

impl Requester {
    /// The requester in their role as the creating actor.
    pub fn as_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.display_name.clone())
    }
}

/// Claim of a ticket by a support team member.
///
/// Held as a single optional value on the ticket, so the assignment
/// time, name and id are always set or cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assigned_at: Timestamp,
    pub assignee_name: String,
    pub assignee_id: UserId,
}

impl Assignment {
    /// Assigns to the given actor as of now.
    pub fn to(actor: &Actor) -> Self {
        Self {
            assigned_at: Timestamp::now(),
            assignee_name: actor.name.clone(),
            assignee_id: actor.id.clone(),
        }
    }
}
