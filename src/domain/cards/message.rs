//! Outbound content model.
//!
//! The core decides *what* to say; the notifier adapter decides how a
//! variant is rendered on the chat platform.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{TicketId, Timestamp};
use crate::domain::routing::{AskAnExpertForm, FeedbackRating, HelpTile, ShareFeedbackForm};
use crate::domain::ticket::{Ticket, TicketAction, TicketState};

use super::display::{
    available_actions, requester_status, team_status, truncate_for_display,
    DESCRIPTION_MAX_DISPLAY_LENGTH, KNOWLEDGE_BASE_ANSWER_MAX_DISPLAY_LENGTH,
    TITLE_MAX_DISPLAY_LENGTH,
};

/// Who a tour is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourAudience {
    Personal,
    Team,
}

/// Why the requester is being told about their ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequesterNotice {
    Created,
    Reopened,
    Closed,
    Assigned,
}

impl RequesterNotice {
    pub fn for_action(action: TicketAction) -> Self {
        match action {
            TicketAction::Reopen => RequesterNotice::Reopened,
            TicketAction::Close => RequesterNotice::Closed,
            TicketAction::AssignToSelf => RequesterNotice::Assigned,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            RequesterNotice::Created => {
                "Your request has been sent to the experts. They will reach out to you soon."
            }
            RequesterNotice::Reopened => "Your request has been reopened.",
            RequesterNotice::Closed => "Your request has been closed.",
            RequesterNotice::Assigned => "An expert is now working on your request.",
        }
    }
}

/// Snapshot of a ticket prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
    pub ticket_id: TicketId,
    pub title: String,
    pub description: Option<String>,
    pub original_question: Option<String>,
    pub knowledge_base_answer: Option<String>,
    pub state: TicketState,
    pub team_status: String,
    pub requester_status: String,
    pub requester_name: String,
    pub requester_principal_name: Option<String>,
    pub created_at: Timestamp,
    pub created_on: String,
    pub closed_at: Option<Timestamp>,
    pub assignee_name: Option<String>,
    pub last_modified_by: String,
    pub actions: Vec<TicketAction>,
}

impl TicketView {
    pub fn of(ticket: &Ticket) -> Self {
        Self {
            ticket_id: *ticket.id(),
            title: truncate_for_display(ticket.title(), TITLE_MAX_DISPLAY_LENGTH),
            description: ticket
                .description()
                .map(|d| truncate_for_display(d, DESCRIPTION_MAX_DISPLAY_LENGTH)),
            original_question: ticket.original_question().map(str::to_string),
            knowledge_base_answer: ticket
                .knowledge_base_answer()
                .map(|a| truncate_for_display(a, KNOWLEDGE_BASE_ANSWER_MAX_DISPLAY_LENGTH)),
            state: ticket.state(),
            team_status: team_status(ticket),
            requester_status: requester_status(ticket).to_string(),
            requester_name: ticket.requester().display_name.clone(),
            requester_principal_name: ticket.requester().principal_name.clone(),
            created_at: *ticket.created_at(),
            created_on: ticket.created_at().format_for_reader(None),
            closed_at: ticket.closed_at().copied(),
            assignee_name: ticket.assignment().map(|a| a.assignee_name.clone()),
            last_modified_by: ticket.last_modified_by().name.clone(),
            actions: available_actions(ticket.state()),
        }
    }
}

/// Everything the bot can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "card", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Plain text reply.
    Text { text: String },
    /// Greeting for a new 1:1 chat.
    Welcome { text: String },
    /// Greeting for the support team channel.
    TeamWelcome,
    Tour {
        audience: TourAudience,
        app_base_uri: String,
    },
    AskAnExpertForm {
        form: AskAnExpertForm,
        show_validation_errors: bool,
    },
    ShareFeedbackForm {
        form: ShareFeedbackForm,
        show_validation_errors: bool,
    },
    /// Top knowledge-base answer for the user's question.
    Answer {
        user_question: String,
        question: String,
        answer: String,
    },
    /// Help tiles found through tag overlap.
    SuggestedLinks {
        user_question: String,
        tiles: Vec<HelpTile>,
    },
    /// Nothing matched in a 1:1 chat.
    Unrecognized { user_question: String },
    /// Nothing matched in the team channel.
    TeamUnrecognized,
    /// The team's card for one ticket; edited in place on each change.
    TeamTicket { ticket: TicketView },
    RequesterNotification {
        notice: RequesterNotice,
        ticket: TicketView,
    },
    /// Feedback forwarded to the team.
    TeamFeedback {
        rating: FeedbackRating,
        description: Option<String>,
        user_question: Option<String>,
        knowledge_base_answer: Option<String>,
        sender_name: String,
        sender_principal_name: Option<String>,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn team_ticket(ticket: &Ticket) -> Self {
        OutboundMessage::TeamTicket {
            ticket: TicketView::of(ticket),
        }
    }

    pub fn requester_notification(notice: RequesterNotice, ticket: &Ticket) -> Self {
        OutboundMessage::RequesterNotification {
            notice,
            ticket: TicketView::of(ticket),
        }
    }

    /// Short plain-text rendering, used as notification preview and by
    /// text-only hosts.
    pub fn summary(&self) -> String {
        match self {
            OutboundMessage::Text { text } | OutboundMessage::Welcome { text } => text.clone(),
            OutboundMessage::TeamWelcome => {
                "Hi! I'll post new requests for the experts in this channel.".to_string()
            }
            OutboundMessage::Tour { audience, .. } => match audience {
                TourAudience::Personal => "Take a tour".to_string(),
                TourAudience::Team => "Team tour".to_string(),
            },
            OutboundMessage::AskAnExpertForm {
                show_validation_errors,
                ..
            } => {
                if *show_validation_errors {
                    "Ask an expert: a title is required".to_string()
                } else {
                    "Ask an expert".to_string()
                }
            }
            OutboundMessage::ShareFeedbackForm {
                show_validation_errors,
                ..
            } => {
                if *show_validation_errors {
                    "Share feedback: please choose a rating".to_string()
                } else {
                    "Share feedback".to_string()
                }
            }
            OutboundMessage::Answer { answer, .. } => answer.clone(),
            OutboundMessage::SuggestedLinks { tiles, .. } => {
                let titles: Vec<&str> = tiles.iter().map(|t| t.title.as_str()).collect();
                format!("These articles may help: {}", titles.join(", "))
            }
            OutboundMessage::Unrecognized { .. } => {
                "I didn't find an answer. You can ask an expert instead.".to_string()
            }
            OutboundMessage::TeamUnrecognized => {
                "I didn't recognize that. Try \"Team tour\".".to_string()
            }
            OutboundMessage::TeamTicket { ticket } => {
                format!("{} ({})", ticket.title, ticket.team_status)
            }
            OutboundMessage::RequesterNotification { notice, .. } => notice.summary().to_string(),
            OutboundMessage::TeamFeedback {
                rating,
                sender_name,
                ..
            } => format!("{} shared feedback: {}", sender_name, rating),
        }
    }
}
