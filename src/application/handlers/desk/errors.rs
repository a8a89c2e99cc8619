//! Errors surfaced by the message router to the hosting layer.

use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::domain::ticket::TicketError;
use crate::ports::NotifierError;

#[derive(Debug, Clone, Error)]
pub enum RouterError {
    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error("Configuration value '{0}' is not set")]
    ConfigurationMissing(&'static str),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] NotifierError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
