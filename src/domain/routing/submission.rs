//! Structured card submissions.
//!
//! Every card the bot renders tags its submit buttons with a `command`
//! field naming one [`SubmitAction`]. The rest of the submitted value is
//! the typed form payload for that action.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::ticket::TicketDraft;

use super::FeedbackRating;

/// Field of the submitted value that names the action.
pub const COMMAND_FIELD: &str = "command";

/// Closed set of card submit actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmitAction {
    /// Open the ask-an-expert form, prefilled from an answer card.
    AskAnExpert,
    /// Open the feedback form, prefilled from an answer card.
    ShareFeedback,
    /// Ask-an-expert form submitted.
    AskAnExpertSubmit,
    /// Feedback form submitted.
    ShareFeedbackSubmit,
    /// Status button pressed on the team's ticket card.
    ChangeTicketStatus,
}

impl SubmitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitAction::AskAnExpert => "AskAnExpert",
            SubmitAction::ShareFeedback => "ShareFeedback",
            SubmitAction::AskAnExpertSubmit => "AskAnExpertSubmit",
            SubmitAction::ShareFeedbackSubmit => "ShareFeedbackSubmit",
            SubmitAction::ChangeTicketStatus => "ChangeTicketStatus",
        }
    }
}

impl fmt::Display for SubmitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmitAction {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AskAnExpert" => Ok(SubmitAction::AskAnExpert),
            "ShareFeedback" => Ok(SubmitAction::ShareFeedback),
            "AskAnExpertSubmit" => Ok(SubmitAction::AskAnExpertSubmit),
            "ShareFeedbackSubmit" => Ok(SubmitAction::ShareFeedbackSubmit),
            "ChangeTicketStatus" => Ok(SubmitAction::ChangeTicketStatus),
            other => Err(SubmissionError::UnknownAction(other.to_string())),
        }
    }
}

/// Why a submission could not be routed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Unknown action {0}")]
    UnknownAction(String),

    #[error("Action {0} is not available in this conversation")]
    NotAvailable(SubmitAction),

    #[error("Malformed {action} payload: {reason}")]
    Malformed { action: SubmitAction, reason: String },
}

/// Question and answer carried over from an answer card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerContext {
    #[serde(default)]
    pub user_question: Option<String>,
    #[serde(default)]
    pub knowledge_base_answer: Option<String>,
}

/// Ask-an-expert form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskAnExpertForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_question: Option<String>,
    #[serde(default)]
    pub knowledge_base_answer: Option<String>,
}

impl AskAnExpertForm {
    /// Form prefilled from an answer card.
    pub fn prefilled(context: &AnswerContext) -> Self {
        Self {
            title: String::new(),
            description: None,
            user_question: context.user_question.clone(),
            knowledge_base_answer: context.knowledge_base_answer.clone(),
        }
    }

    pub fn to_draft(&self) -> TicketDraft {
        TicketDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            original_question: self.user_question.clone(),
            knowledge_base_answer: self.knowledge_base_answer.clone(),
        }
    }
}

/// Share-feedback form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareFeedbackForm {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_question: Option<String>,
    #[serde(default)]
    pub knowledge_base_answer: Option<String>,
}

impl ShareFeedbackForm {
    /// Form prefilled from an answer card.
    pub fn prefilled(context: &AnswerContext) -> Self {
        Self {
            rating: None,
            description: None,
            user_question: context.user_question.clone(),
            knowledge_base_answer: context.knowledge_base_answer.clone(),
        }
    }

    /// Parses the selected rating.
    ///
    /// # Errors
    ///
    /// - `EmptyField` when no rating was chosen
    /// - `InvalidFormat` for a value outside [`FeedbackRating`]
    pub fn rating(&self) -> Result<FeedbackRating, ValidationError> {
        self.rating.as_deref().unwrap_or_default().parse()
    }
}

/// Payload of a status button on the team's ticket card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTicketStatusPayload {
    pub ticket_id: String,
    pub action: String,
}

/// Submissions accepted in a 1:1 chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonalSubmission {
    AskAnExpert(AnswerContext),
    ShareFeedback(AnswerContext),
    AskAnExpertSubmit(AskAnExpertForm),
    ShareFeedbackSubmit(ShareFeedbackForm),
}

/// Submissions accepted in the team channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSubmission {
    ChangeTicketStatus(ChangeTicketStatusPayload),
}

/// Reads the declared action of a submitted value.
pub fn submit_action(value: &serde_json::Value) -> Result<SubmitAction, SubmissionError> {
    value
        .get(COMMAND_FIELD)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .parse()
}

impl PersonalSubmission {
    /// Routes a submitted value by its declared action.
    pub fn parse(value: &serde_json::Value) -> Result<Self, SubmissionError> {
        let action = submit_action(value)?;
        match action {
            SubmitAction::AskAnExpert => payload(action, value).map(Self::AskAnExpert),
            SubmitAction::ShareFeedback => payload(action, value).map(Self::ShareFeedback),
            SubmitAction::AskAnExpertSubmit => payload(action, value).map(Self::AskAnExpertSubmit),
            SubmitAction::ShareFeedbackSubmit => {
                payload(action, value).map(Self::ShareFeedbackSubmit)
            }
            SubmitAction::ChangeTicketStatus => Err(SubmissionError::NotAvailable(action)),
        }
    }
}

impl TeamSubmission {
    /// Routes a submitted value by its declared action.
    pub fn parse(value: &serde_json::Value) -> Result<Self, SubmissionError> {
        let action = submit_action(value)?;
        match action {
            SubmitAction::ChangeTicketStatus => {
                payload(action, value).map(Self::ChangeTicketStatus)
            }
            SubmitAction::AskAnExpert
            | SubmitAction::ShareFeedback
            | SubmitAction::AskAnExpertSubmit
            | SubmitAction::ShareFeedbackSubmit => Err(SubmissionError::NotAvailable(action)),
        }
    }
}

fn payload<T: DeserializeOwned>(
    action: SubmitAction,
    value: &serde_json::Value,
) -> Result<T, SubmissionError> {
    serde_json::from_value(value.clone()).map_err(|e| SubmissionError::Malformed {
        action,
        reason: e.to_string(),
    })
}
