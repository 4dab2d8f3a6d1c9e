use crate::analysis::{
    Aggregate, DEFAULT_TREND_WINDOW_DAYS, DayBucket, GroupAggregator, GroupStat, Summary,
    SummaryAggregator, TrendAggregator,
};
use crate::compare::{self, ComparisonDiff};
use crate::model::{AnalysisResult, RecordStatus};
use crate::{Error, Result};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_GROUPS: usize = 5;

/// Everything the dashboard shows for one record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub summary: Summary,
    pub trend: Vec<DayBucket>,
    pub top_groups: Vec<GroupStat>,
}

/// Identifying details of one side of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBrief {
    pub id: String,
    pub source_label: String,
    pub submitted_at_ms: i64,
    pub confidence_percent: Option<u8>,
    pub bias_detected: bool,
}

impl From<&AnalysisResult> for RecordBrief {
    fn from(record: &AnalysisResult) -> Self {
        Self {
            id: record.id.clone(),
            source_label: record.source_label.clone(),
            submitted_at_ms: record.submitted_at_ms,
            confidence_percent: record.confidence_percent(),
            bias_detected: record.bias_detected(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub left: RecordBrief,
    pub right: RecordBrief,
    pub diff: ComparisonDiff,
}

/// One flat row per record for CSV or printable exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id: String,
    pub source_label: String,
    /// RFC 3339 in UTC, empty if the timestamp is out of range
    pub submitted_at: String,
    pub status: RecordStatus,
    pub bias_detected: bool,
    pub confidence_percent: Option<u8>,
    pub pattern_count: usize,
    /// Distinct bias types in first-seen order
    pub bias_types: Vec<String>,
    pub highest_severity: Option<String>,
}

/// Stateless composition of the aggregation and comparison steps
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    pub trend_window_days: usize,
    pub top_groups: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            top_groups: DEFAULT_TOP_GROUPS,
        }
    }
}

impl ReportBuilder {
    pub fn new(trend_window_days: usize, top_groups: usize) -> Self {
        Self {
            trend_window_days,
            top_groups,
        }
    }

    pub fn build_dashboard_summary(&self, records: &[AnalysisResult], now_ms: i64) -> DashboardReport {
        tracing::debug!("Building dashboard over {} records", records.len());

        DashboardReport {
            summary: SummaryAggregator.aggregate(records),
            trend: TrendAggregator::new(self.trend_window_days, now_ms).aggregate(records),
            top_groups: GroupAggregator::new(self.top_groups).aggregate(records),
        }
    }

    /// Look up both ids and diff them.
    ///
    /// Fails with `NotFound` if either id is missing and `ComparisonNotReady`
    /// if either record has not completed.
    pub fn build_comparison_view(
        &self,
        records: &[AnalysisResult],
        left_id: &str,
        right_id: &str,
    ) -> Result<ComparisonView> {
        let left = find(records, left_id)?;
        let right = find(records, right_id)?;
        let diff = compare::diff(left, right)?;

        Ok(ComparisonView {
            left: left.into(),
            right: right.into(),
            diff,
        })
    }
}

pub fn export_rows(records: &[AnalysisResult]) -> Vec<ExportRow> {
    records
        .iter()
        .map(|record| {
            let mut bias_types: Vec<String> = Vec::new();
            for pattern in record.patterns() {
                let label = pattern.bias_type.as_str();
                if !bias_types.iter().any(|t| t == label) {
                    bias_types.push(label.to_string());
                }
            }

            ExportRow {
                id: record.id.clone(),
                source_label: record.source_label.clone(),
                submitted_at: record
                    .submitted_at()
                    .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_default(),
                status: record.status(),
                bias_detected: record.bias_detected(),
                confidence_percent: record.confidence_percent(),
                pattern_count: record.patterns().len(),
                bias_types,
                highest_severity: record
                    .classification()
                    .and_then(|c| c.max_severity())
                    .map(|s| s.as_str().to_string()),
            }
        })
        .collect()
}

fn find<'a>(records: &'a [AnalysisResult], id: &str) -> Result<&'a AnalysisResult> {
    records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| Error::NotFound(id.to_string()))
}
