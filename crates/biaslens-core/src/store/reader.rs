use crate::intake::{RawRecord, normalize_record};
use crate::model::AnalysisResult;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Accepted top-level layouts of a record store file
#[derive(Deserialize)]
#[serde(untagged)]
enum StoreFile {
    Wrapped { records: Vec<RawRecord> },
    Bare(Vec<RawRecord>),
}

pub struct RecordReader;

impl RecordReader {
    /// Read and normalize a record store from the given path
    pub fn from_file(path: &Path) -> Result<Vec<AnalysisResult>> {
        tracing::debug!("Reading record store from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let store: StoreFile = serde_json::from_reader(reader)?;
        let records = Self::normalize(store);

        tracing::info!("Loaded {} records from {}", records.len(), path.display());

        Ok(records)
    }

    /// Parse a record store from a JSON string
    pub fn from_str(content: &str) -> Result<Vec<AnalysisResult>> {
        tracing::debug!("Parsing record store from string");

        let store: StoreFile = serde_json::from_str(content)?;
        let records = Self::normalize(store);

        tracing::info!("Parsed {} records from string", records.len());

        Ok(records)
    }

    /// Check that record ids are unique
    pub fn validate(records: &[AnalysisResult]) -> Result<()> {
        tracing::debug!("Validating record store");

        if records.is_empty() {
            tracing::warn!("Record store contains no records");
        }

        let mut seen = HashSet::new();
        for record in records {
            if !seen.insert(record.id.as_str()) {
                return Err(Error::InvalidStructure(format!(
                    "Duplicate record id: {}",
                    record.id
                )));
            }
        }

        tracing::debug!("Record store is valid");
        Ok(())
    }

    fn normalize(store: StoreFile) -> Vec<AnalysisResult> {
        let raw = match store {
            StoreFile::Wrapped { records } => records,
            StoreFile::Bare(records) => records,
        };

        raw.into_iter()
            .enumerate()
            .map(|(idx, r)| normalize_record(r, idx))
            .collect()
    }
}
