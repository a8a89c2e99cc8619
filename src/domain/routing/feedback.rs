//! Feedback rating submitted with the share-feedback form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackRating {
    Helpful,
    NeedsImprovement,
    NotHelpful,
}

impl FeedbackRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackRating::Helpful => "Helpful",
            FeedbackRating::NeedsImprovement => "NeedsImprovement",
            FeedbackRating::NotHelpful => "NotHelpful",
        }
    }

    /// Human-readable label for cards.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackRating::Helpful => "Helpful",
            FeedbackRating::NeedsImprovement => "Needs improvement",
            FeedbackRating::NotHelpful => "Not helpful",
        }
    }
}

impl fmt::Display for FeedbackRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FeedbackRating {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Helpful" => Ok(FeedbackRating::Helpful),
            "NeedsImprovement" => Ok(FeedbackRating::NeedsImprovement),
            "NotHelpful" => Ok(FeedbackRating::NotHelpful),
            "" => Err(ValidationError::empty_field("rating")),
            other => Err(ValidationError::invalid_format(
                "rating",
                format!("unknown rating '{}'", other),
            )),
        }
    }
}
