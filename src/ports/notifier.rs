//! Notifier port - delivery of outbound content to chat conversations.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::cards::OutboundMessage;
use crate::domain::foundation::{ConversationId, DeliveryHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    #[error("conversation {0} is not reachable")]
    Unreachable(String),

    #[error("message {0} cannot be updated")]
    UpdateRejected(String),

    #[error("delivery failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Posts a message to a conversation (1:1 chat or channel thread).
    async fn send_to_conversation(
        &self,
        conversation: &ConversationId,
        message: &OutboundMessage,
    ) -> Result<DeliveryHandle, NotifierError>;

    /// Starts a new thread in the team's channel.
    async fn send_to_team(
        &self,
        team_id: &str,
        message: &OutboundMessage,
    ) -> Result<DeliveryHandle, NotifierError>;

    /// Replaces the content of a previously delivered message.
    async fn update_message(
        &self,
        handle: &DeliveryHandle,
        message: &OutboundMessage,
    ) -> Result<(), NotifierError>;

    /// Shows a typing indicator. Hosts without one may ignore it.
    async fn send_typing(&self, _conversation: &ConversationId) -> Result<(), NotifierError> {
        Ok(())
    }
}
