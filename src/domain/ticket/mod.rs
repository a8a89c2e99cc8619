//! Ticket domain module.
//!
//! Escalation tickets raised by end users for the support team, and the
//! status transitions the team applies to them.
//!
//! # States
//!
//! - `OpenUnassigned` - initial state after creation, and after Reopen
//! - `OpenAssigned` - a team member claimed the ticket (AssignToSelf)
//! - `Closed` - resolved; can be reopened or claimed again

mod action;
mod aggregate;
mod errors;
mod status;
mod value_objects;

pub use action::{TicketAction, UnknownTicketAction};
pub use aggregate::{Ticket, TicketDraft, TicketTransition};
pub use errors::TicketError;
pub use status::{TicketState, TicketStatus};
pub use value_objects::{Actor, Assignment, Requester, TicketVersion};
