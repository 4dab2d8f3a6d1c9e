pub mod compare;
pub mod completion;
pub mod delete;
pub mod export;
pub mod filter;
pub mod groups;
pub mod ingest;
pub mod summary;
pub mod trend;
pub mod verify;

use anyhow::{Context, Result};
use biaslens_core::filter::{BiasFilter, FilterCriteria, filter_records};
use biaslens_core::model::{AnalysisResult, RecordStatus, Severity};
use biaslens_core::store::RecordReader;
use chrono::{Local, NaiveDate, TimeZone};
use clap::Args;
use std::path::Path;

/// Record filters shared by the reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only records submitted on or after this day (YYYY-MM-DD, local time)
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Only records submitted on or before this day (YYYY-MM-DD, local time)
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Only records where bias was detected
    #[arg(long, conflicts_with = "clean")]
    pub biased: bool,

    /// Only records where no bias was detected
    #[arg(long)]
    pub clean: bool,

    /// Only records in this state (completed, pending, failed)
    #[arg(long)]
    pub status: Option<String>,

    /// Only records with a pattern at or above this severity
    #[arg(long, value_name = "SEVERITY")]
    pub min_severity: Option<String>,

    /// Label pattern, exact or glob (can be repeated)
    #[arg(long = "label", value_name = "PATTERN")]
    pub labels: Vec<String>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::new();

        if let Some(since) = self.since {
            criteria = criteria.with_since(local_day_start_ms(since)?);
        }
        if let Some(until) = self.until {
            criteria = criteria.with_until(local_day_end_ms(until)?);
        }

        if self.biased {
            criteria = criteria.with_bias(BiasFilter::Biased);
        } else if self.clean {
            criteria = criteria.with_bias(BiasFilter::Clean);
        }

        if let Some(status) = &self.status {
            criteria = criteria.with_status(status.parse::<RecordStatus>()?);
        }
        if let Some(severity) = &self.min_severity {
            criteria = criteria.with_min_severity(severity.parse::<Severity>()?);
        }

        // Handle comma-separated values as well as repeated flags
        let label_patterns: Vec<String> = self
            .labels
            .iter()
            .flat_map(|l| l.split(',').map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect();
        if !label_patterns.is_empty() {
            criteria = criteria.with_labels(label_patterns)?;
        }

        Ok(criteria)
    }
}

/// Read the store and apply the filters
pub fn load_filtered(store: &Path, filters: &FilterArgs) -> Result<Vec<AnalysisResult>> {
    let criteria = filters.to_criteria()?;
    let records = RecordReader::from_file(store)
        .with_context(|| format!("Failed to load record store {}", store.display()))?;

    if criteria.is_empty() {
        return Ok(records);
    }
    Ok(filter_records(&records, &criteria))
}

/// Read the store, treating a missing file as an empty store
pub fn load_or_empty(store: &Path) -> Result<Vec<AnalysisResult>> {
    if !store.exists() {
        tracing::debug!("Store {} does not exist yet", store.display());
        return Ok(Vec::new());
    }
    RecordReader::from_file(store)
        .with_context(|| format!("Failed to load record store {}", store.display()))
}

/// Resolve the "now" used for trend windows: the end of `as_of` in local
/// time, or the current instant
pub fn now_ms(as_of: Option<NaiveDate>) -> Result<i64> {
    match as_of {
        Some(date) => local_day_end_ms(date),
        None => Ok(chrono::Utc::now().timestamp_millis()),
    }
}

pub fn local_day_start_ms(date: NaiveDate) -> Result<i64> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map(|dt| dt.timestamp_millis())
        .with_context(|| format!("Local midnight does not exist for {}", date))
}

/// Last millisecond of the local day
pub fn local_day_end_ms(date: NaiveDate) -> Result<i64> {
    let next = date
        .succ_opt()
        .with_context(|| format!("Date out of range: {}", date))?;
    Ok(local_day_start_ms(next)? - 1)
}
