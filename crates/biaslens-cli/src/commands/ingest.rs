use super::load_or_empty;
use crate::OutputFormat;
use anyhow::{Context, Result, bail};
use biaslens_core::intake::parse_classification;
use biaslens_core::model::{AnalysisResult, Outcome};
use biaslens_core::store::RecordWriter;
use std::fs;
use std::path::Path;

/// Inputs for recording one classified submission
pub struct IngestRequest<'a> {
    pub label: &'a str,
    pub text_file: &'a Path,
    pub response_file: &'a Path,
    pub id: Option<String>,
    pub submitted_at_ms: i64,
}

/// Create the record as pending, resolve it from the classifier reply and
/// append it to the store.
///
/// A reply that cannot be parsed resolves the record as failed.
pub fn ingest(store: &Path, request: IngestRequest<'_>) -> Result<AnalysisResult> {
    let text = fs::read_to_string(request.text_file)
        .with_context(|| format!("Failed to read text file {}", request.text_file.display()))?;
    let reply = fs::read_to_string(request.response_file).with_context(|| {
        format!(
            "Failed to read classifier response {}",
            request.response_file.display()
        )
    })?;

    let mut records = load_or_empty(store)?;

    let id = match request.id {
        Some(id) => {
            if records.iter().any(|r| r.id == id) {
                bail!("An analysis with id {} already exists", id);
            }
            id
        }
        None => next_id(&records, request.submitted_at_ms),
    };

    let mut record = AnalysisResult::pending(id, request.label, text, request.submitted_at_ms);
    let outcome = match parse_classification(&reply) {
        Ok(classification) => Outcome::Completed(classification),
        Err(e) => {
            tracing::warn!("Classifier reply unusable, recording {} as failed: {}", record.id, e);
            Outcome::Failed
        }
    };
    record.resolve(outcome)?;

    if let Some(parent) = store.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    records.push(record.clone());
    RecordWriter::to_file(&records, store)?;

    tracing::info!("Stored analysis {} ({} records total)", record.id, records.len());
    Ok(record)
}

pub fn execute(store: &Path, request: IngestRequest<'_>, format: OutputFormat) -> Result<()> {
    let record = ingest(store, request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Table => {
            println!("Id,Status,Biased,Confidence,Patterns");
            println!(
                "{},{},{},{},{}",
                record.id,
                record.status(),
                record.bias_detected(),
                record
                    .confidence_percent()
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                record.patterns().len()
            );
        }
        OutputFormat::Pretty => {
            use console::style;

            println!(
                "Stored {} ({}) as {}",
                style(&record.id).bold(),
                record.source_label,
                style(record.status()).cyan()
            );
            if let Some(confidence) = record.confidence_percent() {
                let verdict = if record.bias_detected() {
                    style("bias detected").red()
                } else {
                    style("no bias detected").green()
                };
                println!(
                    "  {} ({}% confidence, {} patterns)",
                    verdict,
                    confidence,
                    record.patterns().len()
                );
            }
        }
    }

    Ok(())
}

/// `analysis-<ms>`, suffixed until unique
fn next_id(records: &[AnalysisResult], submitted_at_ms: i64) -> String {
    let base = format!("analysis-{}", submitted_at_ms);
    let mut candidate = base.clone();
    let mut n = 1;
    while records.iter().any(|r| r.id == candidate) {
        n += 1;
        candidate = format!("{}-{}", base, n);
    }
    candidate
}
