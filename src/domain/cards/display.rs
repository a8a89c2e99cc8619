//! Display rules shared by every card that shows a ticket.

use crate::domain::ticket::{Ticket, TicketAction, TicketState};

pub const TITLE_MAX_DISPLAY_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_DISPLAY_LENGTH: usize = 500;
pub const KNOWLEDGE_BASE_ANSWER_MAX_DISPLAY_LENGTH: usize = 500;

const ELLIPSIS: &str = "...";

/// Cuts `text` to `max_chars` characters and appends an ellipsis when it
/// was longer.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Status as the support team sees it.
pub fn team_status(ticket: &Ticket) -> String {
    match (ticket.state(), ticket.assignment()) {
        (TicketState::OpenAssigned, Some(assignment)) => {
            format!("Assigned to {}", assignment.assignee_name)
        }
        (TicketState::Closed, _) => "Closed".to_string(),
        _ => "Unassigned".to_string(),
    }
}

/// Status as the requester sees it; never names the assignee.
pub fn requester_status(ticket: &Ticket) -> &'static str {
    match ticket.state() {
        TicketState::OpenUnassigned => "Unassigned",
        TicketState::OpenAssigned => "Assigned",
        TicketState::Closed => "Closed",
    }
}

/// One-line note posted in the team thread after a status change.
pub fn team_status_line(action: TicketAction, ticket: &Ticket) -> String {
    match action {
        TicketAction::Reopen => format!("Reopened by {}", ticket.last_modified_by().name),
        TicketAction::Close => format!("Closed by {}", ticket.last_modified_by().name),
        TicketAction::AssignToSelf => {
            let name = ticket
                .assignment()
                .map(|a| a.assignee_name.as_str())
                .unwrap_or(ticket.last_modified_by().name.as_str());
            format!("Assigned to {}", name)
        }
    }
}

/// Status buttons offered on the team card: every action that would
/// change the current state.
pub fn available_actions(state: TicketState) -> Vec<TicketAction> {
    TicketAction::all()
        .into_iter()
        .filter(|action| action.target_state() != state)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ConversationId, UserId};
    use crate::domain::ticket::{Actor, Requester, TicketDraft};

    fn ticket() -> Ticket {
        Ticket::open(
            TicketDraft {
                title: "Payslip".to_string(),
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
        Actor::new(UserId::new("sme-1").unwrap(), "Dana")
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_for_display("hello", 5), "hello");
        assert_eq!(truncate_for_display("", TITLE_MAX_DISPLAY_LENGTH), "");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        let long = "a".repeat(60);
        let shown = truncate_for_display(&long, TITLE_MAX_DISPLAY_LENGTH);
        assert_eq!(shown.len(), 53);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_for_display("ééééé", 3), "ééé...");
    }

    #[test]
    fn statuses_follow_ticket_state() {
        let mut ticket = ticket();
        assert_eq!(team_status(&ticket), "Unassigned");
        assert_eq!(requester_status(&ticket), "Unassigned");

        ticket.apply(TicketAction::AssignToSelf, &sme());
        assert_eq!(team_status(&ticket), "Assigned to Dana");
        assert_eq!(requester_status(&ticket), "Assigned");

        ticket.apply(TicketAction::Close, &sme());
        assert_eq!(team_status(&ticket), "Closed");
        assert_eq!(requester_status(&ticket), "Closed");
    }

    #[test]
    fn status_lines_name_the_actor() {
        let mut ticket = ticket();
        ticket.apply(TicketAction::AssignToSelf, &sme());
        assert_eq!(team_status_line(TicketAction::AssignToSelf, &ticket), "Assigned to Dana");
        ticket.apply(TicketAction::Close, &sme());
        assert_eq!(team_status_line(TicketAction::Close, &ticket), "Closed by Dana");
        ticket.apply(TicketAction::Reopen, &sme());
        assert_eq!(team_status_line(TicketAction::Reopen, &ticket), "Reopened by Dana");
    }

    #[test]
    fn available_actions_exclude_current_state() {
        assert_eq!(
            available_actions(TicketState::OpenUnassigned),
            vec![TicketAction::AssignToSelf, TicketAction::Close]
        );
        assert_eq!(
            available_actions(TicketState::Closed),
            vec![TicketAction::AssignToSelf, TicketAction::Reopen]
        );
    }
}
