//! Normalization of loosely-typed classifier replies and stored records.
//!
//! Everything that crosses into the crate from the classifier or the record
//! store passes through here. Unknown or missing fields are defaulted at this
//! boundary so the rest of the crate only sees the strict model types.

use crate::model::{AnalysisResult, BiasType, Classification, DetectedPattern, Outcome, Severity};
use crate::{Error, Result};
use chrono::DateTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Label given to patterns whose bias type is missing
pub const FALLBACK_BIAS_TYPE: &str = "other";

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").unwrap();
}

const BIAS_DETECTED_KEYS: &[&str] = &["biasDetected", "bias_detected", "hasBias", "biased"];
const CONFIDENCE_KEYS: &[&str] = &[
    "confidencePercent",
    "confidence_percent",
    "confidence",
    "confidenceScore",
    "confidence_score",
];
const PATTERNS_KEYS: &[&str] = &["patterns", "detectedPatterns", "detected_patterns", "biases"];
const BIAS_TYPE_KEYS: &[&str] = &["biasType", "bias_type", "type", "category"];
const EVIDENCE_KEYS: &[&str] = &["evidenceText", "evidence_text", "evidence", "quote"];
const REASONING_KEYS: &[&str] = &[
    "reasoningText",
    "reasoning_text",
    "reasoning",
    "explanation",
];

/// A stored record before normalization.
///
/// Analysis fields are read either from a nested `analysis` object or from
/// the top level of the record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(alias = "_id")]
    pub id: Option<Value>,
    #[serde(
        rename = "sourceLabel",
        alias = "source_label",
        alias = "fileName",
        alias = "label"
    )]
    pub source_label: Option<Value>,
    #[serde(
        rename = "submittedText",
        alias = "submitted_text",
        alias = "text",
        alias = "emailText"
    )]
    pub submitted_text: Option<Value>,
    #[serde(
        rename = "submittedAtEpochMs",
        alias = "submittedAt",
        alias = "submitted_at",
        alias = "createdAt",
        alias = "timestamp"
    )]
    pub submitted_at: Option<Value>,
    pub status: Option<Value>,
    #[serde(alias = "result")]
    pub analysis: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Parse the raw reply text of the classifier into a [`Classification`].
///
/// The reply may wrap its JSON in a markdown code fence or surround it with
/// prose; the first JSON object found is used.
pub fn parse_classification(raw: &str) -> Result<Classification> {
    tracing::debug!("Parsing classifier reply ({} bytes)", raw.len());

    let body = match CODE_FENCE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => raw,
    };

    let start = body.find('{').ok_or_else(|| {
        Error::InvalidStructure("Classifier reply contains no JSON object".to_string())
    })?;

    // Anything after the first complete value is prose and ignored
    let value = serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| {
            Error::InvalidStructure("Classifier reply contains no JSON object".to_string())
        })??;
    let obj = value.as_object().ok_or_else(|| {
        Error::InvalidStructure("Classifier reply is not a JSON object".to_string())
    })?;

    let classification = classification_from_object(obj);
    tracing::info!(
        "Parsed classifier reply: bias_detected={}, confidence={}%, {} patterns",
        classification.bias_detected,
        classification.confidence_percent,
        classification.patterns.len()
    );
    Ok(classification)
}

/// Normalize one stored record. Never fails; see module docs.
pub fn normalize_record(raw: RawRecord, index: usize) -> AnalysisResult {
    let id = raw
        .id
        .as_ref()
        .and_then(value_as_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            tracing::warn!("Record {} has no id, assigning positional id", index);
            format!("record-{}", index)
        });

    let source_label = raw
        .source_label
        .as_ref()
        .and_then(value_as_text)
        .unwrap_or_default();
    let submitted_text = raw
        .submitted_text
        .as_ref()
        .and_then(value_as_text)
        .unwrap_or_default();
    let submitted_at_ms = raw
        .submitted_at
        .as_ref()
        .and_then(parse_timestamp_ms)
        .unwrap_or_else(|| {
            tracing::warn!("Record {} has no usable timestamp, using epoch", id);
            0
        });

    let analysis = match raw.analysis.as_ref().and_then(Value::as_object) {
        Some(nested) => nested,
        None => &raw.rest,
    };
    let has_payload = BIAS_DETECTED_KEYS
        .iter()
        .chain(CONFIDENCE_KEYS)
        .chain(PATTERNS_KEYS)
        .any(|k| analysis.contains_key(*k));

    let status = raw.status.as_ref().and_then(value_as_text);
    let outcome = match status.as_deref().map(str::to_lowercase).as_deref() {
        Some("completed" | "complete" | "done" | "success") => {
            Outcome::Completed(classification_from_object(analysis))
        }
        Some("failed" | "error") => Outcome::Failed,
        Some("pending" | "processing" | "analyzing") => Outcome::Pending,
        None if has_payload => Outcome::Completed(classification_from_object(analysis)),
        None => Outcome::Pending,
        Some(other) => {
            tracing::warn!("Record {} has unknown status '{}', treating as pending", id, other);
            Outcome::Pending
        }
    };

    AnalysisResult {
        id,
        source_label,
        submitted_text,
        submitted_at_ms,
        outcome,
    }
}

fn classification_from_object(obj: &Map<String, Value>) -> Classification {
    let patterns: Vec<DetectedPattern> = lookup(obj, PATTERNS_KEYS)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(pattern_from_value).collect())
        .unwrap_or_default();

    let bias_detected = lookup(obj, BIAS_DETECTED_KEYS)
        .and_then(value_as_bool)
        .unwrap_or(!patterns.is_empty());

    let confidence_percent = lookup(obj, CONFIDENCE_KEYS)
        .and_then(parse_confidence)
        .unwrap_or(0);

    Classification::new(bias_detected, confidence_percent, patterns)
}

fn pattern_from_value(value: &Value) -> Option<DetectedPattern> {
    match value {
        Value::String(label) if !label.trim().is_empty() => {
            Some(DetectedPattern::new(label.trim(), Severity::Medium))
        }
        Value::Object(obj) => {
            let bias_type = lookup(obj, BIAS_TYPE_KEYS)
                .and_then(value_as_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| FALLBACK_BIAS_TYPE.to_string());

            let severity = match obj.get("severity").and_then(value_as_text) {
                Some(raw) => raw.parse::<Severity>().unwrap_or_else(|_| {
                    tracing::warn!("Unknown severity '{}', defaulting to medium", raw);
                    Severity::Medium
                }),
                None => Severity::Medium,
            };

            Some(DetectedPattern {
                bias_type: BiasType::new(bias_type),
                severity,
                evidence_text: lookup(obj, EVIDENCE_KEYS)
                    .and_then(value_as_text)
                    .unwrap_or_default(),
                reasoning_text: lookup(obj, REASONING_KEYS)
                    .and_then(value_as_text)
                    .unwrap_or_default(),
            })
        }
        _ => {
            tracing::debug!("Skipping unusable pattern entry: {}", value);
            None
        }
    }
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

/// Confidence as a whole percentage in [0, 100].
///
/// Values strictly between 0 and 1 are read as fractions.
fn parse_confidence(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }

    let percent = if raw > 0.0 && raw < 1.0 { raw * 100.0 } else { raw };
    Some(percent.round().clamp(0.0, 100.0) as u8)
}

/// Epoch milliseconds from a number, an RFC 3339 string or a
/// `{seconds, nanoseconds}` document-store timestamp.
fn parse_timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(ms) => Some(ms),
            Err(_) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.timestamp_millis()),
        },
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            seconds.checked_mul(1000)?.checked_add(nanos / 1_000_000)
        }
        _ => None,
    }
}
