mod label_matcher;

pub use label_matcher::LabelPattern;

use crate::model::{AnalysisResult, RecordStatus, Severity};

/// Bias verdict filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasFilter {
    Biased,
    Clean,
}

/// Filter criteria for analysis records
///
/// All conditions are combined with AND logic - a record must match every
/// specified criterion to be kept.
#[derive(Debug, Default)]
pub struct FilterCriteria {
    /// Earliest submission time, inclusive (epoch ms)
    pub since_ms: Option<i64>,
    /// Latest submission time, inclusive (epoch ms)
    pub until_ms: Option<i64>,
    pub bias: Option<BiasFilter>,
    pub status: Option<RecordStatus>,
    /// Keep records with at least one pattern at or above this severity
    pub min_severity: Option<Severity>,
    /// Label patterns (any pattern matching = pass)
    pub labels: Vec<LabelPattern>,
}

impl FilterCriteria {
    /// Create a new FilterCriteria with default (no filtering)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, since_ms: i64) -> Self {
        self.since_ms = Some(since_ms);
        self
    }

    pub fn with_until(mut self, until_ms: i64) -> Self {
        self.until_ms = Some(until_ms);
        self
    }

    pub fn with_bias(mut self, bias: BiasFilter) -> Self {
        self.bias = Some(bias);
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Add label patterns from a list of pattern strings
    pub fn with_labels(mut self, patterns: Vec<String>) -> crate::Result<Self> {
        for pattern in patterns {
            self.labels.push(LabelPattern::parse(&pattern)?);
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.since_ms.is_none()
            && self.until_ms.is_none()
            && self.bias.is_none()
            && self.status.is_none()
            && self.min_severity.is_none()
            && self.labels.is_empty()
    }

    /// Check if a record matches all filter criteria
    pub fn matches(&self, record: &AnalysisResult) -> bool {
        self.matches_date(record)
            && self.matches_bias(record)
            && self.matches_status(record)
            && self.matches_severity(record)
            && self.matches_label(record)
    }

    fn matches_date(&self, record: &AnalysisResult) -> bool {
        let at = record.submitted_at_ms;
        self.since_ms.is_none_or(|since| at >= since) && self.until_ms.is_none_or(|until| at <= until)
    }

    fn matches_bias(&self, record: &AnalysisResult) -> bool {
        match self.bias {
            None => true,
            Some(BiasFilter::Biased) => record.bias_detected(),
            Some(BiasFilter::Clean) => !record.bias_detected(),
        }
    }

    fn matches_status(&self, record: &AnalysisResult) -> bool {
        self.status.is_none_or(|status| record.status() == status)
    }

    fn matches_severity(&self, record: &AnalysisResult) -> bool {
        match self.min_severity {
            None => true,
            Some(min) => record.patterns().iter().any(|p| p.severity >= min),
        }
    }

    fn matches_label(&self, record: &AnalysisResult) -> bool {
        // No label filters = all records pass
        if self.labels.is_empty() {
            return true;
        }
        self.labels.iter().any(|p| p.matches(&record.source_label))
    }
}

/// Return the records matching the criteria, preserving input order
pub fn filter_records(records: &[AnalysisResult], criteria: &FilterCriteria) -> Vec<AnalysisResult> {
    let filtered: Vec<AnalysisResult> = records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect();

    tracing::debug!("Filter kept {} of {} records", filtered.len(), records.len());
    filtered
}
