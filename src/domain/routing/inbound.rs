//! Inbound activity model handed to the core by the hosting layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, DeliveryHandle, MessageId, UserId};
use crate::domain::ticket::{Actor, Requester};

/// Where a message was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// 1:1 chat between one user and the bot.
    Personal,
    /// Team channel where the support team works.
    Channel,
}

/// The chat user who sent an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: UserId,
    pub name: String,
    /// Sign-in name, resolved from the conversation roster when available.
    pub principal_name: Option<String>,
}

impl Sender {
    pub fn as_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.name.clone())
    }

    /// The sender as the requester of a ticket raised from `conversation`.
    pub fn as_requester(&self, conversation: &ConversationId) -> Requester {
        Requester {
            id: self.id.clone(),
            display_name: self.name.clone(),
            principal_name: self.principal_name.clone(),
            conversation: conversation.clone(),
        }
    }
}

/// Value submitted from a previously rendered card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSubmission {
    /// Message the card was rendered in; target of in-place edits.
    pub reply_to: MessageId,
    pub value: serde_json::Value,
}

impl CardSubmission {
    /// True when the submitted value carries at least one field.
    pub fn has_values(&self) -> bool {
        match &self.value {
            serde_json::Value::Object(map) => !map.is_empty(),
            serde_json::Value::Null => false,
            _ => true,
        }
    }
}

/// One inbound chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub tenant_id: Option<String>,
    pub kind: ConversationKind,
    pub conversation: ConversationId,
    pub from: Sender,
    #[serde(default)]
    pub text: String,
    pub submission: Option<CardSubmission>,
}

impl InboundMessage {
    /// Handle of the card a submission came from, inside this conversation.
    pub fn submitted_card(&self) -> Option<DeliveryHandle> {
        self.submission
            .as_ref()
            .map(|s| DeliveryHandle::new(self.conversation.clone(), s.reply_to.clone()))
    }

    /// The structured submission, if it carries any values.
    pub fn structured_submission(&self) -> Option<&CardSubmission> {
        self.submission.as_ref().filter(|s| s.has_values())
    }
}

/// Conversation membership change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembersAdded {
    pub tenant_id: Option<String>,
    pub kind: ConversationKind,
    pub conversation: ConversationId,
    /// Team the channel belongs to; present for channel conversations.
    pub team_id: Option<String>,
    /// Whether the bot itself is among the added members.
    pub includes_bot: bool,
}

/// Activities the core reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    Message(InboundMessage),
    MembersAdded(MembersAdded),
}

impl Activity {
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Activity::Message(m) => m.tenant_id.as_deref(),
            Activity::MembersAdded(m) => m.tenant_id.as_deref(),
        }
    }
}
