//! Console host for the help desk.
//!
//! Plays the chat platform on stdin/stdout: every line is delivered as a
//! message from one user, and whatever the bot sent is printed afterwards.
//!
//! ```text
//! how do i reset my password        personal chat message
//! /team team tour                   message in the support channel
//! /submit {"command": "..."}        card submission in the personal chat
//! /team-submit {"command": "..."}   card submission in the support channel
//! ```

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use expert_desk::adapters::{
    Delivery, HttpKnowledgeBaseClient, HttpKnowledgeBaseConfig, InMemoryConfigurationStore,
    InMemoryTicketStore, RecordingNotifier, YamlTagIndex,
};
use expert_desk::application::handlers::{
    ActivityHandler, ContentSearch, MessageRouter, ShareFeedbackHandler, TicketLifecycle,
};
use expert_desk::config::AppConfig;
use expert_desk::domain::foundation::{ConversationId, MessageId, UserId};
use expert_desk::domain::routing::{
    Activity, CardSubmission, ConversationKind, InboundMessage, MembersAdded, Sender,
};
use expert_desk::ports::{ConfigurationStore, Notifier};
use expert_desk::telemetry;

const CONSOLE_CHAT: &str = "a:console";
const CONSOLE_TEAM: &str = "19:console-team";

struct Console {
    tenant_id: String,
    user: Sender,
    chat: ConversationId,
    team: ConversationId,
    last_chat_message: Option<MessageId>,
    last_team_message: Option<MessageId>,
}

impl Console {
    fn activity(&mut self, line: &str) -> Result<Activity, Box<dyn std::error::Error>> {
        let (kind, rest) = match line.strip_prefix("/team") {
            Some(rest) if rest.starts_with(' ') || rest.starts_with("-submit") => {
                (ConversationKind::Channel, rest)
            }
            _ => (ConversationKind::Personal, line),
        };

        let (conversation, reply_to) = match kind {
            ConversationKind::Personal => (self.chat.clone(), self.last_chat_message.clone()),
            ConversationKind::Channel => (self.team.clone(), self.last_team_message.clone()),
        };

        let (text, submission) = match rest.trim_start().strip_prefix("/submit") {
            Some(json) => (String::new(), Some(json)),
            None => match rest.strip_prefix("-submit") {
                Some(json) => (String::new(), Some(json)),
                None => (rest.trim().to_string(), None),
            },
        };

        let submission = match submission {
            Some(json) => Some(CardSubmission {
                reply_to: match reply_to {
                    Some(id) => id,
                    None => MessageId::new("0")?,
                },
                value: serde_json::from_str(json.trim())?,
            }),
            None => None,
        };

        Ok(Activity::Message(InboundMessage {
            tenant_id: Some(self.tenant_id.clone()),
            kind,
            conversation,
            from: self.user.clone(),
            text,
            submission,
        }))
    }

    fn print(&mut self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            let (label, handle, message) = match &delivery {
                Delivery::Sent { handle, message } => ("sent", handle, message),
                Delivery::Team { handle, message, .. } => ("team", handle, message),
                Delivery::Updated { handle, message } => ("updated", handle, message),
                Delivery::Typing { .. } => continue,
            };

            if delivery.is_new_message() {
                if handle.conversation_id == self.chat {
                    self.last_chat_message = Some(handle.message_id.clone());
                } else {
                    self.last_team_message = Some(handle.message_id.clone());
                }
            }

            println!("[{label} {handle}] {}", message.summary());
            match serde_json::to_string(message) {
                Ok(json) => println!("    {json}"),
                Err(e) => tracing::warn!(error = %e, "Card could not be serialized"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init_tracing(&config.telemetry);

    let store = Arc::new(InMemoryConfigurationStore::from_settings(&config.settings));
    let team_id = store
        .get(expert_desk::ports::ConfigurationKey::TeamId)
        .await?
        .unwrap_or_else(|| CONSOLE_TEAM.to_string());
    let settings: Arc<dyn ConfigurationStore> = store;

    let recorder = RecordingNotifier::new();
    let notifier: Arc<dyn Notifier> = Arc::new(recorder.clone());

    let knowledge_base = HttpKnowledgeBaseClient::new(
        HttpKnowledgeBaseConfig::new(config.knowledge_base.endpoint.clone())
            .with_timeout(config.knowledge_base.timeout())
            .with_top(config.knowledge_base.top),
    )?;
    let search = ContentSearch::standard(
        settings.clone(),
        Arc::new(knowledge_base),
        Arc::new(YamlTagIndex::new(&config.tag_index.path)),
    );

    let tickets = Arc::new(TicketLifecycle::new(
        Arc::new(InMemoryTicketStore::new()),
        settings.clone(),
        notifier.clone(),
    ));
    let router = Arc::new(MessageRouter::new(
        notifier.clone(),
        search,
        tickets,
        ShareFeedbackHandler::new(settings.clone(), notifier.clone()),
        config.bot.app_base_uri.clone(),
    ));
    let handler = ActivityHandler::new(
        config.bot.expected_tenant_id.clone(),
        router,
        settings,
        notifier,
    );

    let mut console = Console {
        tenant_id: config.bot.expected_tenant_id.clone(),
        user: Sender {
            id: UserId::new("console-user")?,
            name: "Console User".to_string(),
            principal_name: None,
        },
        chat: ConversationId::new(CONSOLE_CHAT)?,
        team: ConversationId::new(team_id)?,
        last_chat_message: None,
        last_team_message: None,
    };

    tracing::info!(tenant_id = %console.tenant_id, "Console host started");

    handler
        .handle(&Activity::MembersAdded(MembersAdded {
            tenant_id: Some(console.tenant_id.clone()),
            kind: ConversationKind::Personal,
            conversation: console.chat.clone(),
            team_id: None,
            includes_bot: true,
        }))
        .await?;
    console.print(recorder.take_deliveries());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let activity = match console.activity(&line) {
            Ok(activity) => activity,
            Err(e) => {
                eprintln!("could not read input: {e}");
                continue;
            }
        };

        if let Err(e) = handler.handle(&activity).await {
            tracing::error!(error = %e, "Activity failed");
        }
        console.print(recorder.take_deliveries());
    }

    Ok(())
}
