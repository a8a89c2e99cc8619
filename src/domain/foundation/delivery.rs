//! Delivery handle for messages already posted to a conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ConversationId, MessageId};

/// Stable address of one delivered message: the conversation it lives in
/// plus its message id. Needed to edit the message in place or to reply
/// in its thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryHandle {
    pub conversation_id: ConversationId,
    pub message_id: MessageId,
}

impl DeliveryHandle {
    pub fn new(conversation_id: ConversationId, message_id: MessageId) -> Self {
        Self {
            conversation_id,
            message_id,
        }
    }
}

impl fmt::Display for DeliveryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.conversation_id, self.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_conversation_and_message() {
        let handle = DeliveryHandle::new(
            ConversationId::new("19:team;messageid=42").unwrap(),
            MessageId::new("42").unwrap(),
        );
        assert_eq!(handle.to_string(), "19:team;messageid=42#42");
    }

    #[test]
    fn round_trips_through_json() {
        let handle = DeliveryHandle::new(
            ConversationId::new("a:1").unwrap(),
            MessageId::new("m-1").unwrap(),
        );
        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json["conversation_id"], "a:1");
        assert_eq!(json["message_id"], "m-1");
    }
}
