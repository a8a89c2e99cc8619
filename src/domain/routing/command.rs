//! Command keywords recognized in free text.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Commands available in a 1:1 chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalCommand {
    AskAnExpert,
    ShareFeedback,
    TakeATour,
}

/// Commands available in the support team channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamCommand {
    TeamTour,
}

/// Spoken label and compact command id for each personal command.
/// Buttons send the id; people type the label.
static PERSONAL_KEYWORDS: Lazy<HashMap<&'static str, PersonalCommand>> = Lazy::new(|| {
    HashMap::from([
        ("ask an expert", PersonalCommand::AskAnExpert),
        ("questionforexpert", PersonalCommand::AskAnExpert),
        ("share feedback", PersonalCommand::ShareFeedback),
        ("sharefeedback", PersonalCommand::ShareFeedback),
        ("take a tour", PersonalCommand::TakeATour),
        ("taketour", PersonalCommand::TakeATour),
    ])
});

static TEAM_KEYWORDS: Lazy<HashMap<&'static str, TeamCommand>> =
    Lazy::new(|| HashMap::from([("team tour", TeamCommand::TeamTour)]));

/// Trims and lower-cases message text for keyword and tag matching.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

impl PersonalCommand {
    /// Matches normalized text against the personal keyword table.
    pub fn parse(normalized: &str) -> Option<Self> {
        PERSONAL_KEYWORDS.get(normalized).copied()
    }

    /// Label shown on buttons and in help text.
    pub fn label(&self) -> &'static str {
        match self {
            PersonalCommand::AskAnExpert => "Ask an expert",
            PersonalCommand::ShareFeedback => "Share feedback",
            PersonalCommand::TakeATour => "Take a tour",
        }
    }
}

impl TeamCommand {
    /// Matches normalized text against the team keyword table.
    pub fn parse(normalized: &str) -> Option<Self> {
        TEAM_KEYWORDS.get(normalized).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TeamCommand::TeamTour => "Team tour",
        }
    }
}
