mod groups;
mod summary;
mod trend;

pub use groups::{GroupAggregator, OTHER_GROUP, label_prefix, top_groups_by_label_prefix};
pub use summary::{SummaryAggregator, summarize};
pub use trend::{DEFAULT_TREND_WINDOW_DAYS, TrendAggregator, daily_trend, daily_trend_in};

use crate::model::{AnalysisResult, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived statistics over a set of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub biased_count: usize,
    pub clean_count: usize,
    pub bias_rate_percent: u8,
    pub avg_confidence_percent: u8,
    pub max_confidence_percent: u8,
    pub min_confidence_percent: u8,
    /// Pattern occurrences per bias type, keyed by the raw label
    pub bias_type_histogram: BTreeMap<String, usize>,
    pub severity_histogram: SeverityHistogram,
    pub status_counts: StatusCounts,
}

/// Pattern occurrences per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityHistogram {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityHistogram {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Low => self.low += 1,
            Severity::Medium => self.medium += 1,
            Severity::High => self.high += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
}

/// Submissions falling on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date_label: String,
    pub biased_count: usize,
    pub clean_count: usize,
    pub total_count: usize,
}

/// Records sharing a group key (usually the company name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStat {
    pub key: String,
    pub total: usize,
    pub biased_count: usize,
    pub clean_count: usize,
}

/// A pure fold over a record set.
///
/// Implementations hold only their parameters, so the same input always
/// yields the same output.
pub trait Aggregate {
    type Output;

    fn aggregate(&self, records: &[AnalysisResult]) -> Self::Output;
}

/// `round(numerator / denominator * 100)` with halves rounded up; 0 when
/// the denominator is 0
pub(crate) fn percent_half_up(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 0;
    }
    let percent = (numerator * 200 + denominator) / (denominator * 2);
    percent.min(100) as u8
}
