//! ShareFeedbackHandler - forwards app feedback to the support team.

use std::sync::Arc;

use crate::domain::cards::OutboundMessage;
use crate::domain::foundation::{ConversationId, DeliveryHandle};
use crate::domain::routing::{Sender, ShareFeedbackForm};
use crate::ports::{ConfigurationKey, ConfigurationStore, Notifier};

use super::RouterError;

pub const THANK_YOU_TEXT: &str = "Thanks for your feedback!";

/// Command for a submitted feedback form.
#[derive(Debug, Clone)]
pub struct ShareFeedbackCommand {
    pub form: ShareFeedbackForm,
    pub sender: Sender,
    pub conversation: ConversationId,
    /// The form message, edited in place when the rating is invalid.
    pub form_card: DeliveryHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareFeedbackOutcome {
    Forwarded,
    FormRejected,
}

pub struct ShareFeedbackHandler {
    config: Arc<dyn ConfigurationStore>,
    notifier: Arc<dyn Notifier>,
}

impl ShareFeedbackHandler {
    pub fn new(config: Arc<dyn ConfigurationStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { config, notifier }
    }

    pub async fn handle(&self, cmd: ShareFeedbackCommand) -> Result<ShareFeedbackOutcome, RouterError> {
        let rating = match cmd.form.rating() {
            Ok(rating) => rating,
            Err(e) => {
                tracing::info!(reason = %e, "Feedback form rejected");
                let form = OutboundMessage::ShareFeedbackForm {
                    form: cmd.form,
                    show_validation_errors: true,
                };
                self.notifier.update_message(&cmd.form_card, &form).await?;
                return Ok(ShareFeedbackOutcome::FormRejected);
            }
        };

        let team_id = self
            .config
            .get(ConfigurationKey::TeamId)
            .await?
            .ok_or(RouterError::ConfigurationMissing(ConfigurationKey::TeamId.as_str()))?;

        let feedback = OutboundMessage::TeamFeedback {
            rating,
            description: cmd.form.description,
            user_question: cmd.form.user_question,
            knowledge_base_answer: cmd.form.knowledge_base_answer,
            sender_name: cmd.sender.name,
            sender_principal_name: cmd.sender.principal_name,
        };
        self.notifier.send_to_team(&team_id, &feedback).await?;
        tracing::info!(rating = %rating, "Feedback forwarded to team");

        self.notifier
            .send_to_conversation(&cmd.conversation, &OutboundMessage::text(THANK_YOU_TEXT))
            .await?;

        Ok(ShareFeedbackOutcome::Forwarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, MessageId, UserId};
    use crate::domain::routing::FeedbackRating;
    use crate::ports::NotifierError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockConfig;

    #[async_trait]
    impl ConfigurationStore for MockConfig {
        async fn get(&self, key: ConfigurationKey) -> Result<Option<String>, DomainError> {
            Ok((key == ConfigurationKey::TeamId).then(|| "19:experts".to_string()))
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        sent: Mutex<Vec<(String, OutboundMessage)>>,
        updated: Mutex<Vec<(DeliveryHandle, OutboundMessage)>>,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send_to_conversation(
            &self,
            conversation: &ConversationId,
            message: &OutboundMessage,
        ) -> Result<DeliveryHandle, NotifierError> {
            self.sent
                .lock()
                .unwrap()
                .push((conversation.to_string(), message.clone()));
            Ok(DeliveryHandle::new(conversation.clone(), MessageId::new("m").unwrap()))
        }

        async fn send_to_team(
            &self,
            team_id: &str,
            message: &OutboundMessage,
        ) -> Result<DeliveryHandle, NotifierError> {
            self.sent
                .lock()
                .unwrap()
                .push((team_id.to_string(), message.clone()));
            Ok(DeliveryHandle::new(
                ConversationId::new(team_id).unwrap(),
                MessageId::new("t").unwrap(),
            ))
        }

        async fn update_message(
            &self,
            handle: &DeliveryHandle,
            message: &OutboundMessage,
        ) -> Result<(), NotifierError> {
            self.updated
                .lock()
                .unwrap()
                .push((handle.clone(), message.clone()));
            Ok(())
        }
    }

    fn command(rating: Option<&str>) -> ShareFeedbackCommand {
        let conversation = ConversationId::new("a:riley").unwrap();
        ShareFeedbackCommand {
            form: ShareFeedbackForm {
                rating: rating.map(str::to_string),
                description: Some("Quick answers".to_string()),
                user_question: None,
                knowledge_base_answer: None,
            },
            sender: Sender {
                id: UserId::new("u-1").unwrap(),
                name: "Riley".to_string(),
                principal_name: None,
            },
            form_card: DeliveryHandle::new(conversation.clone(), MessageId::new("form").unwrap()),
            conversation,
        }
    }

    #[tokio::test]
    async fn valid_rating_goes_to_team_and_thanks_user() {
        let notifier = Arc::new(MockNotifier::default());
        let handler = ShareFeedbackHandler::new(Arc::new(MockConfig), notifier.clone());

        let outcome = handler.handle(command(Some("Helpful"))).await.unwrap();

        assert_eq!(outcome, ShareFeedbackOutcome::Forwarded);
        let sent = notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "19:experts");
        assert!(matches!(
            &sent[0].1,
            OutboundMessage::TeamFeedback { rating: FeedbackRating::Helpful, sender_name, .. } if sender_name == "Riley"
        ));
        assert_eq!(sent[1], ("a:riley".to_string(), OutboundMessage::text(THANK_YOU_TEXT)));
        assert!(notifier.updated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_rating_edits_form_in_place() {
        let notifier = Arc::new(MockNotifier::default());
        let handler = ShareFeedbackHandler::new(Arc::new(MockConfig), notifier.clone());

        let outcome = handler.handle(command(Some("Meh"))).await.unwrap();

        assert_eq!(outcome, ShareFeedbackOutcome::FormRejected);
        assert!(notifier.sent.lock().unwrap().is_empty());
        let updated = notifier.updated.lock().unwrap().clone();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].0.message_id.as_str(), "form");
        assert!(matches!(
            updated[0].1,
            OutboundMessage::ShareFeedbackForm { show_validation_errors: true, .. }
        ));
    }

    #[tokio::test]
    async fn missing_rating_is_rejected() {
        let notifier = Arc::new(MockNotifier::default());
        let handler = ShareFeedbackHandler::new(Arc::new(MockConfig), notifier.clone());

        let outcome = handler.handle(command(None)).await.unwrap();
        assert_eq!(outcome, ShareFeedbackOutcome::FormRejected);
    }
}
