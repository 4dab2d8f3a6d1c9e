use super::pattern::{DetectedPattern, Severity};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One submitted recruitment text and the outcome of classifying it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub source_label: String,
    pub submitted_text: String,
    #[serde(rename = "submittedAtEpochMs")]
    pub submitted_at_ms: i64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Lifecycle state of the classification call.
///
/// The analysis payload only exists on `Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Pending,
    Failed,
    Completed(Classification),
}

impl Outcome {
    pub fn status(&self) -> RecordStatus {
        match self {
            Outcome::Pending => RecordStatus::Pending,
            Outcome::Failed => RecordStatus::Failed,
            Outcome::Completed(_) => RecordStatus::Completed,
        }
    }
}

/// Normalized classifier output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub bias_detected: bool,
    pub confidence_percent: u8,
    #[serde(default)]
    pub patterns: Vec<DetectedPattern>,
}

impl Classification {
    /// Build a classification, clamping confidence to 100
    pub fn new(bias_detected: bool, confidence_percent: u8, patterns: Vec<DetectedPattern>) -> Self {
        Self {
            bias_detected,
            confidence_percent: confidence_percent.min(100),
            patterns,
        }
    }

    pub fn clean(confidence_percent: u8) -> Self {
        Self::new(false, confidence_percent, Vec::new())
    }

    /// Highest severity among the patterns, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.patterns.iter().map(|p| p.severity).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Completed,
    Pending,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Completed => "completed",
            RecordStatus::Pending => "pending",
            RecordStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(RecordStatus::Completed),
            "pending" => Ok(RecordStatus::Pending),
            "failed" => Ok(RecordStatus::Failed),
            other => Err(Error::InvalidPattern(format!("Unknown status: {}", other))),
        }
    }
}

impl AnalysisResult {
    /// Create a freshly submitted record awaiting classification
    pub fn pending(
        id: impl Into<String>,
        source_label: impl Into<String>,
        submitted_text: impl Into<String>,
        submitted_at_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            source_label: source_label.into(),
            submitted_text: submitted_text.into(),
            submitted_at_ms,
            outcome: Outcome::Pending,
        }
    }

    pub fn status(&self) -> RecordStatus {
        self.outcome.status()
    }

    pub fn classification(&self) -> Option<&Classification> {
        match &self.outcome {
            Outcome::Completed(c) => Some(c),
            _ => None,
        }
    }

    /// False unless the record completed with bias detected
    pub fn bias_detected(&self) -> bool {
        self.classification().is_some_and(|c| c.bias_detected)
    }

    pub fn confidence_percent(&self) -> Option<u8> {
        self.classification().map(|c| c.confidence_percent)
    }

    pub fn patterns(&self) -> &[DetectedPattern] {
        self.classification()
            .map(|c| c.patterns.as_slice())
            .unwrap_or(&[])
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.submitted_at_ms)
    }

    /// Move a pending record to its final state.
    ///
    /// Only `pending -> completed | failed` is allowed, and only once.
    pub fn resolve(&mut self, outcome: Outcome) -> Result<()> {
        if self.status() != RecordStatus::Pending || outcome == Outcome::Pending {
            return Err(Error::AlreadyResolved {
                id: self.id.clone(),
                status: self.status(),
            });
        }

        tracing::debug!("Resolving analysis {} as {}", self.id, outcome.status());
        self.outcome = outcome;
        Ok(())
    }
}
