//! Cards module - what the bot says, independent of how it is rendered.

mod display;
mod message;

pub use display::{
    available_actions, requester_status, team_status, team_status_line, truncate_for_display,
    DESCRIPTION_MAX_DISPLAY_LENGTH, KNOWLEDGE_BASE_ANSWER_MAX_DISPLAY_LENGTH,
    TITLE_MAX_DISPLAY_LENGTH,
};
pub use message::{OutboundMessage, RequesterNotice, TicketView, TourAudience};
