//! Opt-in check that quoted evidence actually appears in the submitted text.
//!
//! Aggregation never looks at evidence; this is a reporting aid only.

use crate::model::{AnalysisResult, BiasType};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const QUOTE_CHARS: &[char] = &['"', '\'', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}', '`'];

/// A pattern whose evidence could not be found in the submitted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceMismatch {
    pub record_id: String,
    pub pattern_index: usize,
    pub bias_type: BiasType,
    pub evidence_text: String,
}

/// Report patterns whose evidence is not a substring of the submitted text.
///
/// Comparison ignores case, surrounding quotes and runs of whitespace.
/// Patterns with empty evidence are skipped.
pub fn verify_evidence(record: &AnalysisResult) -> Vec<EvidenceMismatch> {
    let haystack = normalize(&record.submitted_text);

    let mismatches: Vec<EvidenceMismatch> = record
        .patterns()
        .iter()
        .enumerate()
        .filter_map(|(idx, pattern)| {
            let needle = normalize(pattern.evidence_text.trim().trim_matches(QUOTE_CHARS));
            if needle.is_empty() || haystack.contains(&needle) {
                return None;
            }
            Some(EvidenceMismatch {
                record_id: record.id.clone(),
                pattern_index: idx,
                bias_type: pattern.bias_type.clone(),
                evidence_text: pattern.evidence_text.clone(),
            })
        })
        .collect();

    if !mismatches.is_empty() {
        tracing::warn!(
            "Analysis {} has {} patterns with evidence not found in its text",
            record.id,
            mismatches.len()
        );
    }

    mismatches
}

/// Verify every record, concatenating the mismatches in input order
pub fn verify_all(records: &[AnalysisResult]) -> Vec<EvidenceMismatch> {
    records.iter().flat_map(verify_evidence).collect()
}

fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, DetectedPattern, Outcome, Severity};

    fn record(text: &str, evidence: &[&str]) -> AnalysisResult {
        let mut record = AnalysisResult::pending("r1", "Acme - SDE", text, 0);
        let patterns = evidence
            .iter()
            .map(|e| DetectedPattern::new("gender_bias", Severity::High).with_evidence(*e))
            .collect();
        record
            .resolve(Outcome::Completed(Classification::new(true, 90, patterns)))
            .unwrap();
        record
    }

    #[test]
    fn test_verbatim_evidence_passes() {
        let r = record(
            "Only   male candidates\nfrom IIT may apply.",
            &["\u{201c}only male candidates from IIT\u{201d}", ""],
        );
        assert!(verify_evidence(&r).is_empty());
    }

    #[test]
    fn test_paraphrased_evidence_is_reported() {
        let r = record(
            "Only male candidates may apply.",
            &["male candidates", "women need not apply"],
        );

        let mismatches = verify_evidence(&r);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].pattern_index, 1);
        assert_eq!(mismatches[0].evidence_text, "women need not apply");
    }

    #[test]
    fn test_pending_records_have_nothing_to_verify() {
        let pending = AnalysisResult::pending("p", "x", "text", 0);
        assert!(verify_all(&[pending]).is_empty());
    }
}
