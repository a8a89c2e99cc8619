//! Recording notifier.
//!
//! Keeps every delivery in memory instead of talking to a chat platform.
//! Backs the test suites and the console host, which prints what was
//! recorded after each turn.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::cards::OutboundMessage;
use crate::domain::foundation::{ConversationId, DeliveryHandle, MessageId};
use crate::ports::{Notifier, NotifierError};

/// One recorded notifier call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent {
        handle: DeliveryHandle,
        message: OutboundMessage,
    },
    Team {
        team_id: String,
        handle: DeliveryHandle,
        message: OutboundMessage,
    },
    Updated {
        handle: DeliveryHandle,
        message: OutboundMessage,
    },
    Typing {
        conversation: ConversationId,
    },
}

impl Delivery {
    pub fn message(&self) -> Option<&OutboundMessage> {
        match self {
            Delivery::Sent { message, .. }
            | Delivery::Team { message, .. }
            | Delivery::Updated { message, .. } => Some(message),
            Delivery::Typing { .. } => None,
        }
    }

    /// True for sends and team posts; updates and typing are not new messages.
    pub fn is_new_message(&self) -> bool {
        matches!(self, Delivery::Sent { .. } | Delivery::Team { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    next_id: Arc<AtomicU64>,
    fail_sends: bool,
    fail_updates: bool,
    fail_typing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send and team post fails.
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Every in-place update fails.
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Typing indicators fail.
    pub fn failing_typing(mut self) -> Self {
        self.fail_typing = true;
        self
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Removes and returns everything recorded so far.
    pub fn take_deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    /// New messages only: sends and team posts.
    pub fn new_messages(&self) -> Vec<Delivery> {
        self.deliveries()
            .into_iter()
            .filter(Delivery::is_new_message)
            .collect()
    }

    pub fn updates(&self) -> Vec<Delivery> {
        self.deliveries()
            .into_iter()
            .filter(|d| matches!(d, Delivery::Updated { .. }))
            .collect()
    }

    fn record(&self, delivery: Delivery) {
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push(delivery);
        }
    }

    fn next_message_id(&self) -> Result<MessageId, NotifierError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        MessageId::new(id.to_string()).map_err(|e| NotifierError::Failed(e.to_string()))
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_to_conversation(
        &self,
        conversation: &ConversationId,
        message: &OutboundMessage,
    ) -> Result<DeliveryHandle, NotifierError> {
        if self.fail_sends {
            return Err(NotifierError::Unreachable(conversation.to_string()));
        }
        let handle = DeliveryHandle::new(conversation.clone(), self.next_message_id()?);
        self.record(Delivery::Sent {
            handle: handle.clone(),
            message: message.clone(),
        });
        Ok(handle)
    }

    async fn send_to_team(
        &self,
        team_id: &str,
        message: &OutboundMessage,
    ) -> Result<DeliveryHandle, NotifierError> {
        if self.fail_sends {
            return Err(NotifierError::Unreachable(team_id.to_string()));
        }
        let message_id = self.next_message_id()?;
        let thread = ConversationId::new(format!("{};messageid={}", team_id, message_id))
            .map_err(|e| NotifierError::Failed(e.to_string()))?;
        let handle = DeliveryHandle::new(thread, message_id);
        self.record(Delivery::Team {
            team_id: team_id.to_string(),
            handle: handle.clone(),
            message: message.clone(),
        });
        Ok(handle)
    }

    async fn update_message(
        &self,
        handle: &DeliveryHandle,
        message: &OutboundMessage,
    ) -> Result<(), NotifierError> {
        if self.fail_updates {
            return Err(NotifierError::UpdateRejected(handle.to_string()));
        }
        self.record(Delivery::Updated {
            handle: handle.clone(),
            message: message.clone(),
        });
        Ok(())
    }

    async fn send_typing(&self, conversation: &ConversationId) -> Result<(), NotifierError> {
        if self.fail_typing {
            return Err(NotifierError::Failed("typing indicator unavailable".to_string()));
        }
        self.record(Delivery::Typing {
            conversation: conversation.clone(),
        });
        Ok(())
    }
}
