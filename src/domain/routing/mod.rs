//! Routing vocabulary.
//!
//! Everything the message router needs to classify an inbound activity:
//! the activity model, command keywords, structured card submissions,
//! feedback ratings, and tag-overlap scoring.

mod command;
mod feedback;
mod inbound;
mod submission;
mod tags;

pub use command::{normalize_text, PersonalCommand, TeamCommand};
pub use feedback::FeedbackRating;
pub use inbound::{
    Activity, CardSubmission, ConversationKind, InboundMessage, MembersAdded, Sender,
};
pub use submission::{
    submit_action, AnswerContext, AskAnExpertForm, ChangeTicketStatusPayload,
    PersonalSubmission, ShareFeedbackForm, SubmissionError, SubmitAction, TeamSubmission,
    COMMAND_FIELD,
};
pub use tags::{rank_by_tags, score_tags, HelpTile, ScoredTile};
