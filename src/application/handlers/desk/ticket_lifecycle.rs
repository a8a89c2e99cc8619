//! TicketLifecycle - creates tickets and applies status changes.
//!
//! Every successful change is persisted before anything is sent. After a
//! status change the team's card is edited in place through the stored
//! team thread, a one-line note is posted in that thread, and the
//! requester is told in their own conversation.

use std::sync::Arc;

use crate::domain::cards::{team_status_line, OutboundMessage, RequesterNotice};
use crate::domain::foundation::{ConversationId, DeliveryHandle, TicketId};
use crate::domain::routing::AskAnExpertForm;
use crate::domain::ticket::{
    Actor, Requester, Ticket, TicketAction, TicketError, TicketTransition,
};
use crate::ports::{ConfigurationKey, ConfigurationStore, Notifier, NotifierError, TicketStore};

/// Attempts at a status change before a version conflict is reported.
const MAX_ATTEMPTS: u32 = 3;

/// Command to open a ticket from a submitted ask-an-expert form.
#[derive(Debug, Clone)]
pub struct CreateTicketCommand {
    pub form: AskAnExpertForm,
    pub requester: Requester,
    /// The form message, edited in place when validation fails.
    pub form_card: DeliveryHandle,
}

#[derive(Debug, Clone)]
pub enum CreateTicketOutcome {
    Created(Ticket),
    /// The form was re-rendered with validation errors; nothing was stored.
    FormRejected,
}

/// Command to apply a status button pressed on the team's card.
#[derive(Debug, Clone)]
pub struct TicketActionCommand {
    /// Raw ticket id from the card payload.
    pub ticket_id: String,
    /// Raw action name from the card payload.
    pub action: String,
    pub actor: Actor,
    /// Conversation the button was pressed in.
    pub surface: ConversationId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketActionOutcome {
    Applied(TicketTransition),
    /// Reported to the surface; nothing changed.
    NotFound,
    /// Reported to the surface; nothing changed.
    UnknownAction,
}

pub struct TicketLifecycle {
    store: Arc<dyn TicketStore>,
    config: Arc<dyn ConfigurationStore>,
    notifier: Arc<dyn Notifier>,
}

impl TicketLifecycle {
    pub fn new(
        store: Arc<dyn TicketStore>,
        config: Arc<dyn ConfigurationStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            config,
            notifier,
        }
    }

    /// Opens a ticket, posts it to the team and acknowledges the requester.
    ///
    /// # Errors
    ///
    /// - `ConfigurationMissing` if no team id is configured
    /// - `Infrastructure` if the ticket cannot be stored
    /// - `Conflict` if the team thread cannot be recorded after every retry
    /// - `Delivery` if the team card or acknowledgement cannot be sent
    pub async fn create_ticket(
        &self,
        cmd: CreateTicketCommand,
    ) -> Result<CreateTicketOutcome, TicketError> {
        let draft = cmd.form.to_draft();
        if let Err(e) = draft.validate() {
            tracing::info!(field = e.field(), "Ask-an-expert form rejected");
            let form = OutboundMessage::AskAnExpertForm {
                form: cmd.form,
                show_validation_errors: true,
            };
            self.notifier
                .update_message(&cmd.form_card, &form)
                .await
                .map_err(delivery_error)?;
            return Ok(CreateTicketOutcome::FormRejected);
        }

        let team_id = self
            .config
            .get(ConfigurationKey::TeamId)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Team id is not configured, cannot route ticket");
                TicketError::configuration_missing(ConfigurationKey::TeamId.as_str())
            })?;

        let mut ticket = Ticket::open(draft, cmd.requester)?;
        let version = self.store.upsert(&ticket).await?;
        ticket.mark_persisted(version);
        tracing::info!(ticket_id = %ticket.id(), "Ticket created");

        let thread = self
            .notifier
            .send_to_team(&team_id, &OutboundMessage::team_ticket(&ticket))
            .await
            .map_err(delivery_error)?;

        let posted = ticket.version();
        let ticket = self.record_team_thread(ticket, thread).await?;
        tracing::debug!(ticket_id = %ticket.id(), "Team thread recorded");

        // A status button pressed before the thread was stored changed the
        // ticket after its card was rendered.
        if ticket.version() > posted.increment() {
            if let Some(thread) = ticket.team_thread() {
                self.notifier
                    .update_message(thread, &OutboundMessage::team_ticket(&ticket))
                    .await
                    .map_err(delivery_error)?;
            }
        }

        self.notifier
            .send_to_conversation(
                &ticket.requester().conversation,
                &OutboundMessage::requester_notification(RequesterNotice::Created, &ticket),
            )
            .await
            .map_err(delivery_error)?;

        Ok(CreateTicketOutcome::Created(ticket))
    }

    /// Applies a status change requested from the team's card.
    ///
    /// Unknown tickets and actions are reported to the surface and are
    /// not errors.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the ticket kept changing underneath every attempt
    /// - `Infrastructure` if the store fails
    /// - `Delivery` if a notification cannot be sent
    pub async fn handle_ticket_action(
        &self,
        cmd: TicketActionCommand,
    ) -> Result<TicketActionOutcome, TicketError> {
        tracing::info!(ticket_id = %cmd.ticket_id, action = %cmd.action, "Received status change");

        let Some(ticket) = self.load(&cmd.ticket_id).await? else {
            return self.report_not_found(&cmd).await;
        };

        let action: TicketAction = match cmd.action.parse() {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(action = %cmd.action, "Unknown status command");
                self.reply(&cmd.surface, e.to_string()).await?;
                return Ok(TicketActionOutcome::UnknownAction);
            }
        };

        let Some((ticket, transition)) = self.apply_with_retry(ticket, action, &cmd.actor).await?
        else {
            return self.report_not_found(&cmd).await;
        };

        tracing::info!(
            ticket_id = %ticket.id(),
            from = %transition.from,
            to = %transition.to,
            assignee = ticket.assignment().map(|a| a.assignee_id.as_str()).unwrap_or(""),
            "Ticket updated in store"
        );

        self.notify_team(&ticket, action, &cmd.surface).await?;
        self.notify_requester(&ticket, action).await?;

        Ok(TicketActionOutcome::Applied(transition))
    }

    async fn load(&self, raw_id: &str) -> Result<Option<Ticket>, TicketError> {
        let Ok(id) = raw_id.parse::<TicketId>() else {
            return Ok(None);
        };
        Ok(self.store.get(&id).await?)
    }

    /// Stores the team card handle, reloading on version conflicts so a
    /// status change that landed first is kept.
    async fn record_team_thread(
        &self,
        mut ticket: Ticket,
        thread: DeliveryHandle,
    ) -> Result<Ticket, TicketError> {
        let id = *ticket.id();
        let mut attempt = 1;
        loop {
            ticket.attach_team_thread(thread.clone())?;
            match self.store.upsert(&ticket).await {
                Ok(version) => {
                    ticket.mark_persisted(version);
                    return Ok(ticket);
                }
                Err(e) if e.is_conflict() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(ticket_id = %id, attempt, "Ticket changed before team thread was stored, retrying");
                    attempt += 1;
                    ticket = self
                        .store
                        .get(&id)
                        .await?
                        .ok_or_else(|| TicketError::not_found(id.to_string()))?;
                }
                Err(e) if e.is_conflict() => return Err(TicketError::Conflict(id)),
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Applies the action and writes it, reloading on version conflicts.
    /// Returns `None` if the ticket vanished between attempts.
    async fn apply_with_retry(
        &self,
        mut ticket: Ticket,
        action: TicketAction,
        actor: &Actor,
    ) -> Result<Option<(Ticket, TicketTransition)>, TicketError> {
        let mut attempt = 1;
        loop {
            let transition = ticket.apply(action, actor);
            match self.store.upsert(&ticket).await {
                Ok(version) => {
                    ticket.mark_persisted(version);
                    return Ok(Some((ticket, transition)));
                }
                Err(e) if e.is_conflict() && attempt < MAX_ATTEMPTS => {
                    tracing::warn!(ticket_id = %ticket.id(), attempt, "Ticket changed concurrently, retrying");
                    attempt += 1;
                    match self.store.get(ticket.id()).await? {
                        Some(fresh) => ticket = fresh,
                        None => return Ok(None),
                    }
                }
                Err(e) if e.is_conflict() => return Err(TicketError::Conflict(*ticket.id())),
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn notify_team(
        &self,
        ticket: &Ticket,
        action: TicketAction,
        surface: &ConversationId,
    ) -> Result<(), TicketError> {
        let thread_conversation = match ticket.team_thread() {
            Some(thread) => {
                self.notifier
                    .update_message(thread, &OutboundMessage::team_ticket(ticket))
                    .await
                    .map_err(delivery_error)?;
                tracing::debug!(ticket_id = %ticket.id(), message_id = %thread.message_id, "Team card updated");
                &thread.conversation_id
            }
            None => {
                tracing::warn!(ticket_id = %ticket.id(), "Ticket has no team card to update");
                surface
            }
        };

        self.reply(thread_conversation, team_status_line(action, ticket))
            .await
    }

    async fn notify_requester(&self, ticket: &Ticket, action: TicketAction) -> Result<(), TicketError> {
        let handle = self
            .notifier
            .send_to_conversation(
                &ticket.requester().conversation,
                &OutboundMessage::requester_notification(RequesterNotice::for_action(action), ticket),
            )
            .await
            .map_err(delivery_error)?;
        tracing::debug!(ticket_id = %ticket.id(), message_id = %handle.message_id, "Requester notified");
        Ok(())
    }

    async fn report_not_found(
        &self,
        cmd: &TicketActionCommand,
    ) -> Result<TicketActionOutcome, TicketError> {
        let err = TicketError::not_found(cmd.ticket_id.clone());
        tracing::warn!(ticket_id = %cmd.ticket_id, "{}", err);
        self.reply(&cmd.surface, err.to_string()).await?;
        Ok(TicketActionOutcome::NotFound)
    }

    async fn reply(&self, conversation: &ConversationId, text: String) -> Result<(), TicketError> {
        self.notifier
            .send_to_conversation(conversation, &OutboundMessage::text(text))
            .await
            .map(|_| ())
            .map_err(delivery_error)
    }
}

fn delivery_error(err: NotifierError) -> TicketError {
    TicketError::delivery(err.to_string())
}
