//! Ticket-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, TicketId};

/// Errors raised by the ticket lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// No ticket exists for the id given by the acting surface.
    NotFound(String),
    /// Action name outside the closed set.
    UnknownAction(String),
    /// Form input rejected.
    ValidationFailed { field: String, message: String },
    /// Concurrent writers kept winning the race for this ticket.
    Conflict(TicketId),
    /// A required configuration value is absent.
    ConfigurationMissing(String),
    /// A notification could not be delivered.
    Delivery(String),
    /// Persistence or other infrastructure failure.
    Infrastructure(String),
}

impl TicketError {
    pub fn not_found(id: impl Into<String>) -> Self {
        TicketError::NotFound(id.into())
    }
    pub fn unknown_action(action: impl Into<String>) -> Self {
        TicketError::UnknownAction(action.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TicketError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn configuration_missing(key: impl Into<String>) -> Self {
        TicketError::ConfigurationMissing(key.into())
    }
    pub fn delivery(message: impl Into<String>) -> Self {
        TicketError::Delivery(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        TicketError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            TicketError::NotFound(_) => ErrorCode::TicketNotFound,
            TicketError::UnknownAction(_) => ErrorCode::UnknownAction,
            TicketError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TicketError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            TicketError::ConfigurationMissing(_) => ErrorCode::ConfigurationMissing,
            TicketError::Delivery(_) => ErrorCode::DeliveryFailed,
            TicketError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            TicketError::NotFound(id) => format!("Ticket {} was not found in the data store", id),
            TicketError::UnknownAction(action) => format!("Unknown status command {}", action),
            TicketError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            TicketError::Conflict(id) => {
                format!("Ticket {} was changed concurrently, please retry", id)
            }
            TicketError::ConfigurationMissing(key) => {
                format!("Configuration value '{}' is not set", key)
            }
            TicketError::Delivery(msg) => format!("Notification failed: {}", msg),
            TicketError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// True for failures reported back to the acting user instead of
    /// being raised to the host.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            TicketError::NotFound(_) | TicketError::UnknownAction(_)
        )
    }
}

impl std::fmt::Display for TicketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TicketError {}

impl From<DomainError> for TicketError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::TicketNotFound => TicketError::NotFound(
                err.details
                    .get("ticket_id")
                    .cloned()
                    .unwrap_or_else(|| err.message.clone()),
            ),
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                TicketError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.to_string(),
                }
            }
            ErrorCode::ConfigurationMissing => TicketError::ConfigurationMissing(err.message),
            ErrorCode::DeliveryFailed => TicketError::Delivery(err.message),
            _ => TicketError::Infrastructure(err.to_string()),
        }
    }
}
