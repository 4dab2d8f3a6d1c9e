use super::{Aggregate, SeverityHistogram, StatusCounts, Summary, percent_half_up};
use crate::model::{AnalysisResult, RecordStatus};
use std::collections::BTreeMap;

pub struct SummaryAggregator;

impl Aggregate for SummaryAggregator {
    type Output = Summary;

    fn aggregate(&self, records: &[AnalysisResult]) -> Summary {
        summarize(records)
    }
}

/// Fold records into summary statistics. An empty input yields an all-zero
/// summary.
pub fn summarize(records: &[AnalysisResult]) -> Summary {
    tracing::debug!("Summarizing {} records", records.len());

    let total = records.len();
    let biased_count = records.iter().filter(|r| r.bias_detected()).count();

    let mut status_counts = StatusCounts::default();
    for record in records {
        match record.status() {
            RecordStatus::Completed => status_counts.completed += 1,
            RecordStatus::Pending => status_counts.pending += 1,
            RecordStatus::Failed => status_counts.failed += 1,
        }
    }

    // Confidence only exists on completed records
    let confidences: Vec<u8> = records.iter().filter_map(|r| r.confidence_percent()).collect();
    let confidence_sum: u64 = confidences.iter().map(|&c| u64::from(c)).sum();
    let avg_confidence_percent = if confidences.is_empty() {
        0
    } else {
        let n = confidences.len() as u64;
        ((confidence_sum * 2 + n) / (n * 2)) as u8
    };
    let max_confidence_percent = confidences.iter().copied().max().unwrap_or(0);
    let min_confidence_percent = confidences.iter().copied().min().unwrap_or(0);

    // Histograms count patterns, not records
    let mut bias_type_histogram: BTreeMap<String, usize> = BTreeMap::new();
    let mut severity_histogram = SeverityHistogram::default();
    for pattern in records.iter().flat_map(|r| r.patterns()) {
        *bias_type_histogram
            .entry(pattern.bias_type.as_str().to_string())
            .or_insert(0) += 1;
        severity_histogram.record(pattern.severity);
    }

    if severity_histogram.critical > 0 {
        tracing::debug!(
            "{} critical patterns counted in their own bucket",
            severity_histogram.critical
        );
    }

    let summary = Summary {
        total,
        biased_count,
        clean_count: total - biased_count,
        bias_rate_percent: percent_half_up(biased_count as u64, total as u64),
        avg_confidence_percent,
        max_confidence_percent,
        min_confidence_percent,
        bias_type_histogram,
        severity_histogram,
        status_counts,
    };

    tracing::info!(
        "Summary complete: {} records, {} biased ({}%), avg confidence {}%",
        summary.total,
        summary.biased_count,
        summary.bias_rate_percent,
        summary.avg_confidence_percent
    );

    summary
}
