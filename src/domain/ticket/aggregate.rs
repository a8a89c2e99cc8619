//! Ticket aggregate entity.
//!
//! A ticket is an escalation from an end user to the support team. It is
//! created from a validated ask-an-expert form and afterwards mutated only
//! through [`Ticket::apply`]. Tickets are never deleted; closing is a
//! status, and a closed ticket can be reopened.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DeliveryHandle, DomainError, ErrorCode, TicketId, Timestamp, ValidationError,
};

use super::{
    Actor, Assignment, Requester, TicketAction, TicketState, TicketStatus, TicketVersion,
};

/// Free text captured from the ask-an-expert form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: Option<String>,
    /// Question the user originally typed, when escalating from an answer.
    pub original_question: Option<String>,
    /// Answer the knowledge base gave to that question.
    pub knowledge_base_answer: Option<String>,
}

impl TicketDraft {
    /// Checks the form is acceptable for ticket creation.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the title is blank
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(())
    }
}

/// Outcome of one status change, for logging and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketTransition {
    pub ticket_id: TicketId,
    pub action: TicketAction,
    pub from: TicketState,
    pub to: TicketState,
}

/// Ticket aggregate.
///
/// # Invariants
///
/// - `id` is globally unique and immutable
/// - `status == Closed` iff `closed_at` is set
/// - assignment fields are set or cleared together (single `Option`)
/// - `team_thread`, once set, is never cleared or replaced
/// - form text and requester identity never change after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    version: TicketVersion,
    status: TicketStatus,
    created_at: Timestamp,
    closed_at: Option<Timestamp>,
    assignment: Option<Assignment>,

    title: String,
    description: Option<String>,
    original_question: Option<String>,
    knowledge_base_answer: Option<String>,

    requester: Requester,
    last_modified_by: Actor,

    /// Card posted to the support team; edited in place on every change.
    team_thread: Option<DeliveryHandle>,
}

impl Ticket {
    /// Opens a new, unassigned ticket on behalf of the requester.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the draft title is blank
    pub fn open(draft: TicketDraft, requester: Requester) -> Result<Self, DomainError> {
        draft.validate()?;

        Ok(Self {
            id: TicketId::new(),
            version: TicketVersion::unsaved(),
            status: TicketStatus::Open,
            created_at: Timestamp::now(),
            closed_at: None,
            assignment: None,
            title: draft.title.trim().to_string(),
            description: non_blank(draft.description),
            original_question: non_blank(draft.original_question),
            knowledge_base_answer: non_blank(draft.knowledge_base_answer),
            last_modified_by: requester.as_actor(),
            requester,
            team_thread: None,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TicketId {
        &self.id
    }

    /// Version this copy was loaded or last saved at.
    pub fn version(&self) -> TicketVersion {
        self.version
    }

    pub fn status(&self) -> TicketStatus {
        self.status
    }

    /// Lifecycle state derived from status and assignment.
    pub fn state(&self) -> TicketState {
        match (self.status, &self.assignment) {
            (TicketStatus::Closed, _) => TicketState::Closed,
            (TicketStatus::Open, Some(_)) => TicketState::OpenAssigned,
            (TicketStatus::Open, None) => TicketState::OpenUnassigned,
        }
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn closed_at(&self) -> Option<&Timestamp> {
        self.closed_at.as_ref()
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn original_question(&self) -> Option<&str> {
        self.original_question.as_deref()
    }

    pub fn knowledge_base_answer(&self) -> Option<&str> {
        self.knowledge_base_answer.as_deref()
    }

    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    pub fn last_modified_by(&self) -> &Actor {
        &self.last_modified_by
    }

    pub fn team_thread(&self) -> Option<&DeliveryHandle> {
        self.team_thread.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a status-change action on behalf of `actor`.
    ///
    /// Every action is valid from every state; the resulting state is
    /// always `action.target_state()`.
    pub fn apply(&mut self, action: TicketAction, actor: &Actor) -> TicketTransition {
        let from = self.state();

        match action {
            TicketAction::Reopen => {
                self.status = TicketStatus::Open;
                self.assignment = None;
                self.closed_at = None;
            }
            TicketAction::Close => {
                self.status = TicketStatus::Closed;
                self.closed_at = Some(Timestamp::now());
            }
            TicketAction::AssignToSelf => {
                self.status = TicketStatus::Open;
                self.assignment = Some(Assignment::to(actor));
                self.closed_at = None;
            }
        }
        self.last_modified_by = actor.clone();

        TicketTransition {
            ticket_id: self.id,
            action,
            from,
            to: self.state(),
        }
    }

    /// Records where the team's ticket card was posted.
    ///
    /// Re-attaching the same handle is a no-op.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if a different handle is already recorded
    pub fn attach_team_thread(&mut self, handle: DeliveryHandle) -> Result<(), DomainError> {
        match &self.team_thread {
            Some(existing) if *existing != handle => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Ticket {} already has a team thread", self.id),
            )
            .with_detail("existing", existing.to_string())),
            Some(_) => Ok(()),
            None => {
                self.team_thread = Some(handle);
                Ok(())
            }
        }
    }

    /// Adopts the version assigned by the store after a successful write.
    pub fn mark_persisted(&mut self, version: TicketVersion) {
        self.version = version;
    }

    /// Verifies the cross-field invariants.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if status and close time disagree
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        let closed = self.status == TicketStatus::Closed;
        if closed != self.closed_at.is_some() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Ticket {} has status {} but closed_at is {}",
                    self.id,
                    self.status,
                    if self.closed_at.is_some() { "set" } else { "unset" }
                ),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
