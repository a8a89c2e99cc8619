//! Ticket store port.
//!
//! The store exclusively owns ticket records. Writes are conditional on
//! the version the caller loaded, which serializes concurrent changes to
//! one ticket without any global lock.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TicketId};
use crate::domain::ticket::{Ticket, TicketVersion};

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Finds a ticket by id.
    ///
    /// Returns `None` if not found.
    async fn get(&self, id: &TicketId) -> Result<Option<Ticket>, DomainError>;

    /// Inserts or updates a ticket and returns the newly stored version.
    ///
    /// A ticket with an unsaved version is inserted. Any other ticket is
    /// written only if its version matches the stored one.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the stored version moved on, or an
    ///   unsaved ticket's id already exists
    /// - `TicketNotFound` if a saved version is given for an unknown id
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, ticket: &Ticket) -> Result<TicketVersion, DomainError>;
}
