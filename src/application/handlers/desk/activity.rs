//! ActivityHandler - entry point for every activity the host receives.
//!
//! Drops activities from foreign tenants, greets new conversations and
//! hands messages to the [`MessageRouter`].

use std::sync::Arc;

use crate::domain::cards::OutboundMessage;
use crate::domain::routing::{Activity, ConversationKind, MembersAdded};
use crate::ports::{ConfigurationKey, ConfigurationStore, Notifier};

use super::{MessageRouter, RouteDecision, RouterError};

pub const DEFAULT_WELCOME_TEXT: &str =
    "Hi! Ask me a question, or ask an expert if I can't help.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityOutcome {
    Routed(RouteDecision),
    Welcomed(ConversationKind),
    /// Wrong tenant, or a membership change that does not involve the bot.
    Ignored,
}

pub struct ActivityHandler {
    expected_tenant_id: String,
    router: Arc<MessageRouter>,
    config: Arc<dyn ConfigurationStore>,
    notifier: Arc<dyn Notifier>,
}

impl ActivityHandler {
    pub fn new(
        expected_tenant_id: impl Into<String>,
        router: Arc<MessageRouter>,
        config: Arc<dyn ConfigurationStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            expected_tenant_id: expected_tenant_id.into(),
            router,
            config,
            notifier,
        }
    }

    pub async fn handle(&self, activity: &Activity) -> Result<ActivityOutcome, RouterError> {
        if activity.tenant_id() != Some(self.expected_tenant_id.as_str()) {
            tracing::warn!(
                tenant_id = activity.tenant_id().unwrap_or("<none>"),
                "Activity from unexpected tenant dropped"
            );
            return Ok(ActivityOutcome::Ignored);
        }

        match activity {
            Activity::Message(msg) => self
                .router
                .handle_message(msg)
                .await
                .map(ActivityOutcome::Routed),
            Activity::MembersAdded(added) => self.welcome(added).await,
        }
    }

    async fn welcome(&self, added: &MembersAdded) -> Result<ActivityOutcome, RouterError> {
        if !added.includes_bot {
            return Ok(ActivityOutcome::Ignored);
        }

        let card = match added.kind {
            ConversationKind::Personal => {
                let text = match self.config.get(ConfigurationKey::WelcomeText).await? {
                    Some(text) => text,
                    None => {
                        tracing::warn!("Welcome text is not configured, using default");
                        DEFAULT_WELCOME_TEXT.to_string()
                    }
                };
                OutboundMessage::Welcome { text }
            }
            ConversationKind::Channel => OutboundMessage::TeamWelcome,
        };

        tracing::info!(
            conversation = %added.conversation,
            team_id = added.team_id.as_deref().unwrap_or(""),
            "Bot added, sending welcome"
        );
        self.notifier
            .send_to_conversation(&added.conversation, &card)
            .await?;
        Ok(ActivityOutcome::Welcomed(added.kind))
    }
}
