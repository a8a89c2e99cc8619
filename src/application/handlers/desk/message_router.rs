//! MessageRouter - decides the single response to one inbound message.
//!
//! Order of precedence:
//!
//! 1. A structured card submission is routed by its declared action.
//! 2. In a 1:1 chat, command keywords, then the content search chain,
//!    then the "unrecognized" card.
//! 3. In the team channel, team commands, otherwise the team's
//!    "unrecognized" card. The channel never searches.
//!
//! Unexpected failures are logged, reported to the conversation as
//! "Error processing message: ..." and returned to the host.

use std::sync::Arc;

use crate::domain::cards::{OutboundMessage, TourAudience};
use crate::domain::foundation::ConversationId;
use crate::domain::routing::{
    normalize_text, AskAnExpertForm, ConversationKind, InboundMessage, PersonalCommand,
    PersonalSubmission, ShareFeedbackForm, SubmissionError, SubmitAction, TeamCommand,
    TeamSubmission,
};
use crate::ports::Notifier;

use super::{
    ContentSearch, CreateTicketCommand, CreateTicketOutcome, RouterError, SearchOutcome,
    ShareFeedbackCommand, ShareFeedbackHandler, ShareFeedbackOutcome, TicketActionCommand,
    TicketActionOutcome, TicketLifecycle,
};

/// The response the router chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    PersonalCommand(PersonalCommand),
    TeamCommand(TeamCommand),
    KnowledgeBaseAnswer,
    SuggestedLinks,
    Unrecognized,
    TeamUnrecognized,
    /// A structured submission was handled.
    Submission(SubmitAction),
    /// A submission failed validation and its form was edited in place.
    FormRejected(SubmitAction),
    /// The submission named no known action, or one not offered here.
    InvalidSubmission,
}

pub struct MessageRouter {
    notifier: Arc<dyn Notifier>,
    search: ContentSearch,
    tickets: Arc<TicketLifecycle>,
    feedback: ShareFeedbackHandler,
    app_base_uri: String,
}

impl MessageRouter {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        search: ContentSearch,
        tickets: Arc<TicketLifecycle>,
        feedback: ShareFeedbackHandler,
        app_base_uri: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            search,
            tickets,
            feedback,
            app_base_uri: app_base_uri.into(),
        }
    }

    /// Handles one inbound message.
    ///
    /// # Errors
    ///
    /// Returns the failure after it has been logged and reported to the
    /// conversation. Degraded lookups and user mistakes are not errors.
    pub async fn handle_message(&self, msg: &InboundMessage) -> Result<RouteDecision, RouterError> {
        if let Err(e) = self.notifier.send_typing(&msg.conversation).await {
            tracing::warn!(error = %e, "Typing indicator failed");
        }

        match self.route(msg).await {
            Ok(decision) => {
                tracing::debug!(decision = ?decision, "Message routed");
                Ok(decision)
            }
            Err(e) => {
                tracing::error!(conversation = %msg.conversation, error = %e, "Error processing message");
                let report = OutboundMessage::text(format!("Error processing message: {}", e));
                if let Err(send_err) = self.notifier.send_to_conversation(&msg.conversation, &report).await {
                    tracing::error!(error = %send_err, "Failed to report error to user");
                }
                Err(e)
            }
        }
    }

    async fn route(&self, msg: &InboundMessage) -> Result<RouteDecision, RouterError> {
        tracing::info!(
            conversation = %msg.conversation,
            kind = ?msg.kind,
            submission = msg.structured_submission().is_some(),
            "Received message"
        );

        if msg.structured_submission().is_some() {
            return match msg.kind {
                ConversationKind::Personal => self.route_personal_submission(msg).await,
                ConversationKind::Channel => self.route_team_submission(msg).await,
            };
        }

        match msg.kind {
            ConversationKind::Personal => self.route_personal_text(msg).await,
            ConversationKind::Channel => self.route_team_text(msg).await,
        }
    }

    async fn route_personal_text(&self, msg: &InboundMessage) -> Result<RouteDecision, RouterError> {
        if let Some(command) = PersonalCommand::parse(&normalize_text(&msg.text)) {
            let card = match command {
                PersonalCommand::AskAnExpert => OutboundMessage::AskAnExpertForm {
                    form: AskAnExpertForm::default(),
                    show_validation_errors: false,
                },
                PersonalCommand::ShareFeedback => OutboundMessage::ShareFeedbackForm {
                    form: ShareFeedbackForm::default(),
                    show_validation_errors: false,
                },
                PersonalCommand::TakeATour => self.tour(TourAudience::Personal),
            };
            self.send(&msg.conversation, &card).await?;
            return Ok(RouteDecision::PersonalCommand(command));
        }

        let question = msg.text.trim();
        let (card, decision) = match self.search.search(question).await {
            Some(outcome) => {
                let decision = match outcome {
                    SearchOutcome::Answer(_) => RouteDecision::KnowledgeBaseAnswer,
                    SearchOutcome::Tiles(_) => RouteDecision::SuggestedLinks,
                };
                (outcome.into_message(question), decision)
            }
            None => (
                OutboundMessage::Unrecognized {
                    user_question: question.to_string(),
                },
                RouteDecision::Unrecognized,
            ),
        };
        self.send(&msg.conversation, &card).await?;
        Ok(decision)
    }

    async fn route_team_text(&self, msg: &InboundMessage) -> Result<RouteDecision, RouterError> {
        match TeamCommand::parse(&normalize_text(&msg.text)) {
            Some(command) => {
                let card = match command {
                    TeamCommand::TeamTour => self.tour(TourAudience::Team),
                };
                self.send(&msg.conversation, &card).await?;
                Ok(RouteDecision::TeamCommand(command))
            }
            None => {
                tracing::info!("Unrecognized input in channel");
                self.send(&msg.conversation, &OutboundMessage::TeamUnrecognized)
                    .await?;
                Ok(RouteDecision::TeamUnrecognized)
            }
        }
    }

    async fn route_personal_submission(
        &self,
        msg: &InboundMessage,
    ) -> Result<RouteDecision, RouterError> {
        let (Some(submission), Some(form_card)) = (msg.structured_submission(), msg.submitted_card())
        else {
            return Ok(RouteDecision::InvalidSubmission);
        };

        let parsed = match PersonalSubmission::parse(&submission.value) {
            Ok(parsed) => parsed,
            Err(e) => return self.reject_submission(&msg.conversation, e).await,
        };

        match parsed {
            PersonalSubmission::AskAnExpert(context) => {
                let card = OutboundMessage::AskAnExpertForm {
                    form: AskAnExpertForm::prefilled(&context),
                    show_validation_errors: false,
                };
                self.send(&msg.conversation, &card).await?;
                Ok(RouteDecision::Submission(SubmitAction::AskAnExpert))
            }
            PersonalSubmission::ShareFeedback(context) => {
                let card = OutboundMessage::ShareFeedbackForm {
                    form: ShareFeedbackForm::prefilled(&context),
                    show_validation_errors: false,
                };
                self.send(&msg.conversation, &card).await?;
                Ok(RouteDecision::Submission(SubmitAction::ShareFeedback))
            }
            PersonalSubmission::AskAnExpertSubmit(form) => {
                let outcome = self
                    .tickets
                    .create_ticket(CreateTicketCommand {
                        form,
                        requester: msg.from.as_requester(&msg.conversation),
                        form_card,
                    })
                    .await?;
                Ok(match outcome {
                    CreateTicketOutcome::Created(_) => {
                        RouteDecision::Submission(SubmitAction::AskAnExpertSubmit)
                    }
                    CreateTicketOutcome::FormRejected => {
                        RouteDecision::FormRejected(SubmitAction::AskAnExpertSubmit)
                    }
                })
            }
            PersonalSubmission::ShareFeedbackSubmit(form) => {
                let outcome = self
                    .feedback
                    .handle(ShareFeedbackCommand {
                        form,
                        sender: msg.from.clone(),
                        conversation: msg.conversation.clone(),
                        form_card,
                    })
                    .await?;
                Ok(match outcome {
                    ShareFeedbackOutcome::Forwarded => {
                        RouteDecision::Submission(SubmitAction::ShareFeedbackSubmit)
                    }
                    ShareFeedbackOutcome::FormRejected => {
                        RouteDecision::FormRejected(SubmitAction::ShareFeedbackSubmit)
                    }
                })
            }
        }
    }

    async fn route_team_submission(&self, msg: &InboundMessage) -> Result<RouteDecision, RouterError> {
        let Some(submission) = msg.structured_submission() else {
            return Ok(RouteDecision::InvalidSubmission);
        };

        let TeamSubmission::ChangeTicketStatus(payload) = match TeamSubmission::parse(&submission.value) {
            Ok(parsed) => parsed,
            Err(e) => return self.reject_submission(&msg.conversation, e).await,
        };

        let outcome = self
            .tickets
            .handle_ticket_action(TicketActionCommand {
                ticket_id: payload.ticket_id,
                action: payload.action,
                actor: msg.from.as_actor(),
                surface: msg.conversation.clone(),
            })
            .await?;

        Ok(match outcome {
            TicketActionOutcome::Applied(_) => {
                RouteDecision::Submission(SubmitAction::ChangeTicketStatus)
            }
            TicketActionOutcome::NotFound | TicketActionOutcome::UnknownAction => {
                RouteDecision::InvalidSubmission
            }
        })
    }

    async fn reject_submission(
        &self,
        conversation: &ConversationId,
        err: SubmissionError,
    ) -> Result<RouteDecision, RouterError> {
        tracing::warn!(error = %err, "Unexpected submit payload");
        self.send(conversation, &OutboundMessage::text(err.to_string()))
            .await?;
        Ok(RouteDecision::InvalidSubmission)
    }

    fn tour(&self, audience: TourAudience) -> OutboundMessage {
        OutboundMessage::Tour {
            audience,
            app_base_uri: self.app_base_uri.clone(),
        }
    }

    async fn send(
        &self,
        conversation: &ConversationId,
        message: &OutboundMessage,
    ) -> Result<(), RouterError> {
        self.notifier
            .send_to_conversation(conversation, message)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        Delivery, InMemoryConfigurationStore, InMemoryTicketStore, MockKnowledgeBaseClient,
        RecordingNotifier,
    };
    use crate::domain::foundation::{MessageId, UserId};
    use crate::domain::routing::{CardSubmission, HelpTile, Sender};
    use crate::ports::{
        ConfigurationKey, KnowledgeBaseError, KnowledgeBaseMatch, TagIndex, TagIndexError,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockTagIndex {
        result: Result<Vec<HelpTile>, TagIndexError>,
        calls: Mutex<usize>,
    }

    impl MockTagIndex {
        fn new(result: Result<Vec<HelpTile>, TagIndexError>) -> Self {
            Self {
                result,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TagIndex for MockTagIndex {
        async fn list_entities(&self) -> Result<Vec<HelpTile>, TagIndexError> {
            *self.calls.lock().unwrap() += 1;
            self.result.clone()
        }
    }

    struct Fixture {
        router: MessageRouter,
        notifier: RecordingNotifier,
        store: InMemoryTicketStore,
        kb: MockKnowledgeBaseClient,
        tags: Arc<MockTagIndex>,
    }

    fn configured() -> InMemoryConfigurationStore {
        InMemoryConfigurationStore::new()
            .with_value(ConfigurationKey::KnowledgeBaseId, "kb-1")
            .with_value(ConfigurationKey::KnowledgeBaseEndpointKey, "secret")
            .with_value(ConfigurationKey::TeamId, "19:experts")
    }

    fn fixture_with(
        config: InMemoryConfigurationStore,
        kb: MockKnowledgeBaseClient,
        tags: MockTagIndex,
        notifier: RecordingNotifier,
    ) -> Fixture {
        let store = InMemoryTicketStore::new();
        let tags = Arc::new(tags);
        let config = Arc::new(config);
        let notifier_port: Arc<dyn Notifier> = Arc::new(notifier.clone());
        let tickets = Arc::new(TicketLifecycle::new(
            Arc::new(store.clone()),
            config.clone(),
            notifier_port.clone(),
        ));
        let router = MessageRouter::new(
            notifier_port.clone(),
            ContentSearch::standard(config.clone(), Arc::new(kb.clone()), tags.clone()),
            tickets,
            ShareFeedbackHandler::new(config, notifier_port),
            "https://desk.contoso.com",
        );
        Fixture {
            router,
            notifier,
            store,
            kb,
            tags,
        }
    }

    fn fixture(kb: MockKnowledgeBaseClient, tags: MockTagIndex) -> Fixture {
        fixture_with(configured(), kb, tags, RecordingNotifier::new())
    }

    fn tile(id: &str, tags: &str) -> HelpTile {
        HelpTile {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            image_url: None,
            redirect_url: None,
            tags: tags.to_string(),
        }
    }

    fn sender() -> Sender {
        Sender {
            id: UserId::new("u-1").unwrap(),
            name: "Riley".to_string(),
            principal_name: Some("riley@contoso.com".to_string()),
        }
    }

    fn personal(text: &str) -> InboundMessage {
        InboundMessage {
            tenant_id: Some("tenant".to_string()),
            kind: ConversationKind::Personal,
            conversation: ConversationId::new("a:riley").unwrap(),
            from: sender(),
            text: text.to_string(),
            submission: None,
        }
    }

    fn channel(text: &str) -> InboundMessage {
        InboundMessage {
            kind: ConversationKind::Channel,
            conversation: ConversationId::new("19:experts;messageid=1").unwrap(),
            ..personal(text)
        }
    }

    fn submitted(mut msg: InboundMessage, value: serde_json::Value) -> InboundMessage {
        msg.submission = Some(CardSubmission {
            reply_to: MessageId::new("card-1").unwrap(),
            value,
        });
        msg
    }

    fn only_message(notifier: &RecordingNotifier) -> OutboundMessage {
        let sent = notifier.new_messages();
        assert_eq!(sent.len(), 1, "expected exactly one response, got {:?}", sent);
        sent[0].message().cloned().unwrap()
    }

    #[tokio::test]
    async fn command_keyword_renders_its_card() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));

        let decision = f.router.handle_message(&personal("  Ask an EXPERT ")).await.unwrap();

        assert_eq!(decision, RouteDecision::PersonalCommand(PersonalCommand::AskAnExpert));
        assert!(matches!(
            only_message(&f.notifier),
            OutboundMessage::AskAnExpertForm { show_validation_errors: false, .. }
        ));
        assert_eq!(f.kb.call_count(), 0);
    }

    #[tokio::test]
    async fn tour_carries_app_base_uri() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));

        f.router.handle_message(&personal("take a tour")).await.unwrap();

        assert_eq!(
            only_message(&f.notifier),
            OutboundMessage::Tour {
                audience: TourAudience::Personal,
                app_base_uri: "https://desk.contoso.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn knowledge_base_answer_wins_without_tag_search() {
        let kb = MockKnowledgeBaseClient::new().with_matches(vec![KnowledgeBaseMatch {
            question: "How do I reset my password?".to_string(),
            answer: "Use the self-service portal.".to_string(),
            score: 88.0,
        }]);
        let f = fixture(kb, MockTagIndex::new(Ok(vec![tile("pw", "password")])));

        let decision = f
            .router
            .handle_message(&personal("how do I reset password"))
            .await
            .unwrap();

        assert_eq!(decision, RouteDecision::KnowledgeBaseAnswer);
        assert_eq!(
            only_message(&f.notifier),
            OutboundMessage::Answer {
                user_question: "how do I reset password".to_string(),
                question: "How do I reset my password?".to_string(),
                answer: "Use the self-service portal.".to_string(),
            }
        );
        assert_eq!(f.tags.calls(), 0);
    }

    #[tokio::test]
    async fn tag_search_returns_only_best_tile() {
        let tags = MockTagIndex::new(Ok(vec![
            tile("reset", "reset"),
            tile("password-reset", "password, reset"),
        ]));
        let f = fixture(MockKnowledgeBaseClient::new(), tags);

        let decision = f
            .router
            .handle_message(&personal("how do I reset password"))
            .await
            .unwrap();

        assert_eq!(decision, RouteDecision::SuggestedLinks);
        match only_message(&f.notifier) {
            OutboundMessage::SuggestedLinks { tiles, .. } => {
                let ids: Vec<_> = tiles.iter().map(|t| t.id.as_str()).collect();
                assert_eq!(ids, vec!["password-reset"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn failing_lookups_still_produce_one_fallback() {
        let kb = MockKnowledgeBaseClient::new().with_error(KnowledgeBaseError::Unauthorized);
        let tags = MockTagIndex::new(Err(TagIndexError::Unavailable("gone".to_string())));
        let f = fixture(kb, tags);

        let decision = f.router.handle_message(&personal("vpn")).await.unwrap();

        assert_eq!(decision, RouteDecision::Unrecognized);
        assert_eq!(
            only_message(&f.notifier),
            OutboundMessage::Unrecognized {
                user_question: "vpn".to_string()
            }
        );
    }

    #[tokio::test]
    async fn channel_never_searches() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));

        let decision = f.router.handle_message(&channel("reset password")).await.unwrap();

        assert_eq!(decision, RouteDecision::TeamUnrecognized);
        assert_eq!(only_message(&f.notifier), OutboundMessage::TeamUnrecognized);
        assert_eq!(f.kb.call_count(), 0);
        assert_eq!(f.tags.calls(), 0);
    }

    #[tokio::test]
    async fn channel_team_tour() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));

        let decision = f.router.handle_message(&channel("Team tour")).await.unwrap();

        assert_eq!(decision, RouteDecision::TeamCommand(TeamCommand::TeamTour));
        assert!(matches!(
            only_message(&f.notifier),
            OutboundMessage::Tour { audience: TourAudience::Team, .. }
        ));
    }

    #[tokio::test]
    async fn personal_commands_are_not_team_commands() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));

        let decision = f.router.handle_message(&channel("ask an expert")).await.unwrap();
        assert_eq!(decision, RouteDecision::TeamUnrecognized);
    }

    #[tokio::test]
    async fn blank_title_submission_edits_form_and_creates_nothing() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));
        let msg = submitted(
            personal(""),
            json!({"command": "AskAnExpertSubmit", "title": "", "description": "help"}),
        );

        let decision = f.router.handle_message(&msg).await.unwrap();

        assert_eq!(
            decision,
            RouteDecision::FormRejected(SubmitAction::AskAnExpertSubmit)
        );
        assert!(f.store.is_empty().await);
        assert!(f.notifier.new_messages().is_empty());
        let updates = f.notifier.updates();
        assert_eq!(updates.len(), 1);
        match &updates[0] {
            Delivery::Updated { handle, message } => {
                assert_eq!(handle.message_id.as_str(), "card-1");
                assert!(matches!(
                    message,
                    OutboundMessage::AskAnExpertForm { show_validation_errors: true, .. }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn valid_submission_creates_ticket() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));
        let msg = submitted(
            personal(""),
            json!({"command": "AskAnExpertSubmit", "title": "Payslip missing"}),
        );

        let decision = f.router.handle_message(&msg).await.unwrap();

        assert_eq!(decision, RouteDecision::Submission(SubmitAction::AskAnExpertSubmit));
        assert_eq!(f.store.len().await, 1);
        let sent = f.notifier.new_messages();
        assert!(matches!(&sent[0], Delivery::Team { team_id, .. } if team_id == "19:experts"));
        assert!(matches!(
            sent[1].message(),
            Some(OutboundMessage::RequesterNotification { .. })
        ));
    }

    #[tokio::test]
    async fn answer_card_buttons_open_prefilled_forms() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));
        let msg = submitted(
            personal(""),
            json!({"command": "ShareFeedback", "userQuestion": "vpn", "knowledgeBaseAnswer": "Use the client"}),
        );

        let decision = f.router.handle_message(&msg).await.unwrap();

        assert_eq!(decision, RouteDecision::Submission(SubmitAction::ShareFeedback));
        match only_message(&f.notifier) {
            OutboundMessage::ShareFeedbackForm { form, show_validation_errors } => {
                assert!(!show_validation_errors);
                assert_eq!(form.user_question.as_deref(), Some("vpn"));
                assert_eq!(form.knowledge_base_answer.as_deref(), Some("Use the client"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_submit_action_is_reported() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));
        let msg = submitted(personal(""), json!({"command": "Nope"}));

        let decision = f.router.handle_message(&msg).await.unwrap();

        assert_eq!(decision, RouteDecision::InvalidSubmission);
        assert_eq!(only_message(&f.notifier), OutboundMessage::text("Unknown action Nope"));
    }

    #[tokio::test]
    async fn empty_submission_is_treated_as_text() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));
        let msg = submitted(personal("take a tour"), json!({}));

        let decision = f.router.handle_message(&msg).await.unwrap();
        assert_eq!(decision, RouteDecision::PersonalCommand(PersonalCommand::TakeATour));
    }

    #[tokio::test]
    async fn team_status_change_for_missing_ticket() {
        let f = fixture(MockKnowledgeBaseClient::new(), MockTagIndex::new(Ok(vec![])));
        let msg = submitted(
            channel(""),
            json!({"command": "ChangeTicketStatus", "ticketId": "nope", "action": "AssignToSelf"}),
        );

        let decision = f.router.handle_message(&msg).await.unwrap();

        assert_eq!(decision, RouteDecision::InvalidSubmission);
        assert_eq!(
            only_message(&f.notifier),
            OutboundMessage::text("Ticket nope was not found in the data store")
        );
    }

    #[tokio::test]
    async fn unexpected_error_is_reported_and_returned() {
        let config = InMemoryConfigurationStore::new();
        let f = fixture_with(
            config,
            MockKnowledgeBaseClient::new(),
            MockTagIndex::new(Ok(vec![])),
            RecordingNotifier::new(),
        );
        let msg = submitted(
            personal(""),
            json!({"command": "AskAnExpertSubmit", "title": "Payslip"}),
        );

        let err = f.router.handle_message(&msg).await.unwrap_err();

        assert!(matches!(err, RouterError::Ticket(_)));
        assert!(f.store.is_empty().await);
        assert_eq!(
            only_message(&f.notifier),
            OutboundMessage::text(format!("Error processing message: {}", err))
        );
    }

    #[tokio::test]
    async fn typing_failure_does_not_stop_handling() {
        let f = fixture_with(
            configured(),
            MockKnowledgeBaseClient::new(),
            MockTagIndex::new(Ok(vec![])),
            RecordingNotifier::new().failing_typing(),
        );

        let decision = f.router.handle_message(&personal("share feedback")).await.unwrap();

        assert_eq!(decision, RouteDecision::PersonalCommand(PersonalCommand::ShareFeedback));
        assert_eq!(f.notifier.new_messages().len(), 1);
    }
}
