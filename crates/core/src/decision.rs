use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal classification of one matching attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Matched,
    ProbableMatch,
    ReviewRequired,
    Break,
    DataError,
}

impl Classification {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "MATCHED",
            Self::ProbableMatch => "PROBABLE_MATCH",
            Self::ReviewRequired => "REVIEW_REQUIRED",
            Self::Break => "BREAK",
            Self::DataError => "DATA_ERROR",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action implied by a classification. Downstream routing consumers key off
/// this value only and never re-derive it from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    AutoMatch,
    Escalate,
    Exception,
}

impl DecisionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AutoMatch => "AUTO_MATCH",
            Self::Escalate => "ESCALATE",
            Self::Exception => "EXCEPTION",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
