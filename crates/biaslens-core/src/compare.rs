use crate::model::{AnalysisResult, Classification};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the bias verdict changed from the left record to the right one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTransition {
    BothClean,
    BothBiased,
    /// Clean on the left, biased on the right
    Regressed,
    /// Biased on the left, clean on the right
    Improved,
}

impl StatusTransition {
    pub fn from_verdicts(left_biased: bool, right_biased: bool) -> Self {
        match (left_biased, right_biased) {
            (false, false) => StatusTransition::BothClean,
            (true, true) => StatusTransition::BothBiased,
            (false, true) => StatusTransition::Regressed,
            (true, false) => StatusTransition::Improved,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTransition::BothClean => "both clean",
            StatusTransition::BothBiased => "both biased",
            StatusTransition::Regressed => "regressed",
            StatusTransition::Improved => "improved",
        }
    }
}

/// Structural difference between two completed analyses.
///
/// Bias type sets are sorted and compared by exact label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDiff {
    pub types_only_in_left: Vec<String>,
    pub types_only_in_right: Vec<String>,
    pub types_in_both: Vec<String>,
    /// `right.patterns.len() - left.patterns.len()`
    pub pattern_count_delta: i64,
    /// `right.confidence - left.confidence`
    pub confidence_delta: i32,
    pub status_transition: StatusTransition,
}

/// Compare two records; both must be completed
pub fn diff(left: &AnalysisResult, right: &AnalysisResult) -> Result<ComparisonDiff> {
    tracing::debug!("Comparing analysis {} with {}", left.id, right.id);

    let l = completed(left)?;
    let r = completed(right)?;

    let left_types = distinct_types(l);
    let right_types = distinct_types(r);

    let diff = ComparisonDiff {
        types_only_in_left: left_types.difference(&right_types).cloned().collect(),
        types_only_in_right: right_types.difference(&left_types).cloned().collect(),
        types_in_both: left_types.intersection(&right_types).cloned().collect(),
        pattern_count_delta: r.patterns.len() as i64 - l.patterns.len() as i64,
        confidence_delta: i32::from(r.confidence_percent) - i32::from(l.confidence_percent),
        status_transition: StatusTransition::from_verdicts(l.bias_detected, r.bias_detected),
    };

    tracing::info!(
        "Comparison {} -> {}: {}, confidence {:+}",
        left.id,
        right.id,
        diff.status_transition.as_str(),
        diff.confidence_delta
    );

    Ok(diff)
}

fn completed(record: &AnalysisResult) -> Result<&Classification> {
    record
        .classification()
        .ok_or_else(|| Error::ComparisonNotReady {
            id: record.id.clone(),
            status: record.status(),
        })
}

fn distinct_types(classification: &Classification) -> BTreeSet<String> {
    classification
        .patterns
        .iter()
        .map(|p| p.bias_type.as_str().to_string())
        .collect()
}
