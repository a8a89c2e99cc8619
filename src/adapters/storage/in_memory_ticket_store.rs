//! In-memory ticket store.
//!
//! Holds tickets in a map keyed by id. Every write checks the caller's
//! version against the stored one, so two handlers racing on the same
//! ticket cannot both win.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, TicketId};
use crate::domain::ticket::{Ticket, TicketVersion};
use crate::ports::TicketStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    tickets: Arc<RwLock<HashMap<TicketId, Ticket>>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError> {
        Ok(self.tickets.read().await.get(id).cloned())
    }

    async fn upsert(&self, ticket: &Ticket) -> Result<TicketVersion, DomainError> {
        ticket.check_invariants()?;

        let mut tickets = self.tickets.write().await;
        let stored = tickets.get(ticket.id()).map(|t| t.version());

        match (stored, ticket.version()) {
            (None, v) if v.is_unsaved() => {}
            (None, _) => {
                return Err(DomainError::new(
                    ErrorCode::TicketNotFound,
                    format!("Ticket {} was not found in the data store", ticket.id()),
                )
                .with_detail("ticket_id", ticket.id().to_string()));
            }
            (Some(current), expected) if current == expected => {}
            (Some(current), expected) => {
                return Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!(
                        "Ticket {} is at {} but the write expected {}",
                        ticket.id(),
                        current,
                        expected
                    ),
                )
                .with_detail("ticket_id", ticket.id().to_string()));
            }
        }

        let next = ticket.version().increment();
        let mut saved = ticket.clone();
        saved.mark_persisted(next);
        tickets.insert(*ticket.id(), saved);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, UserId};
    use crate::domain::ticket::{Actor, Requester, TicketAction, TicketDraft};

    fn ticket() -> Ticket {
        Ticket::open(
            TicketDraft {
                title: "VPN".to_string(),
                ..TicketDraft::default()
            },
            Requester {
                id: UserId::new("u-1").unwrap(),
                display_name: "Riley".to_string(),
                principal_name: None,
                conversation: ConversationId::new("a:riley").unwrap(),
            },
        )
        .unwrap()
    }

    fn sme() -> Actor {
        Actor::new(UserId::new("sme").unwrap(), "Dana")
    }

    #[tokio::test]
    async fn insert_then_get_returns_persisted_version() {
        let store = InMemoryTicketStore::new();
        let ticket = ticket();

        let version = store.upsert(&ticket).await.unwrap();

        assert_eq!(version, TicketVersion::from_raw(1));
        let loaded = store.get(ticket.id()).await.unwrap().unwrap();
        assert_eq!(loaded.version(), version);
        assert_eq!(loaded.title(), "VPN");
    }

    #[tokio::test]
    async fn get_unknown_returns_none() {
        let store = InMemoryTicketStore::new();
        assert!(store.get(&TicketId::new()).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_with_current_version_succeeds() {
        let store = InMemoryTicketStore::new();
        let mut ticket = ticket();
        let v1 = store.upsert(&ticket).await.unwrap();
        ticket.mark_persisted(v1);

        ticket.apply(TicketAction::Close, &sme());
        let v2 = store.upsert(&ticket).await.unwrap();

        assert_eq!(v2, TicketVersion::from_raw(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn stale_write_is_rejected() {
        let store = InMemoryTicketStore::new();
        let ticket = ticket();
        store.upsert(&ticket).await.unwrap();

        let mut first = store.get(ticket.id()).await.unwrap().unwrap();
        let mut second = first.clone();

        first.apply(TicketAction::AssignToSelf, &sme());
        store.upsert(&first).await.unwrap();

        second.apply(TicketAction::Close, &sme());
        let err = store.upsert(&second).await.unwrap_err();

        assert!(err.is_conflict());
        let stored = store.get(ticket.id()).await.unwrap().unwrap();
        assert!(stored.is_assigned());
        assert!(stored.closed_at().is_none());
    }

    #[tokio::test]
    async fn second_insert_of_same_id_conflicts() {
        let store = InMemoryTicketStore::new();
        let ticket = ticket();
        store.upsert(&ticket).await.unwrap();

        let err = store.upsert(&ticket).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
    }

    #[tokio::test]
    async fn saved_version_for_unknown_ticket_is_not_found() {
        let store = InMemoryTicketStore::new();
        let mut ticket = ticket();
        ticket.mark_persisted(TicketVersion::from_raw(4));

        let err = store.upsert(&ticket).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TicketNotFound);
    }

    #[tokio::test]
    async fn concurrent_writes_at_same_version_have_one_winner() {
        let store = InMemoryTicketStore::new();
        let ticket = ticket();
        store.upsert(&ticket).await.unwrap();

        let mut assign = store.get(ticket.id()).await.unwrap().unwrap();
        let mut close = assign.clone();
        assign.apply(TicketAction::AssignToSelf, &sme());
        close.apply(TicketAction::Close, &sme());

        let (a, b) = tokio::join!(store.upsert(&assign), store.upsert(&close));

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict()));

        let stored = store.get(ticket.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), TicketVersion::from_raw(2));
        assert!(stored.check_invariants().is_ok());
    }
}
