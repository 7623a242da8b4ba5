use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Trial;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClassLabel {
    AdditionClass,
    SubtractionClass,
    Unrecognized,
}

impl ClassLabel {
    /// Raw classifier output convention: `1` addition, `0` subtraction.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => ClassLabel::AdditionClass,
            0 => ClassLabel::SubtractionClass,
            _ => ClassLabel::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLabel::AdditionClass => "Addition",
            ClassLabel::SubtractionClass => "Subtraction",
            ClassLabel::Unrecognized => "Unrecognized",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationOutcome {
    pub label: ClassLabel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_correct: bool,
    pub computed_result: Option<i32>,
}

/// What a finalized session hands back to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub trial: Trial,
    pub outcome: ClassificationOutcome,
    pub verdict: Verdict,
    pub finalized_at: DateTime<Utc>,
}
