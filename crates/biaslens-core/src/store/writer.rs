use super::RecordStore;
use crate::Result;
use crate::model::AnalysisResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub struct RecordWriter;

impl RecordWriter {
    /// Write records to a store file
    pub fn to_file(records: &[AnalysisResult], path: &Path) -> Result<()> {
        tracing::debug!("Writing record store to: {}", path.display());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &RecordStore { records })?;

        tracing::info!(
            "Successfully wrote {} records to {}",
            records.len(),
            path.display()
        );

        Ok(())
    }

    /// Convert records to a store JSON string
    pub fn to_string(records: &[AnalysisResult]) -> Result<String> {
        tracing::debug!("Converting {} records to string", records.len());

        let json = serde_json::to_string_pretty(&RecordStore { records })?;

        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, DetectedPattern, Outcome, Severity};
    use crate::store::RecordReader;

    #[test]
    fn test_written_store_reads_back() {
        let mut record = AnalysisResult::pending("a1", "TCS - SDE", "Only boys", 1_700_000_000_000);
        record
            .resolve(Outcome::Completed(Classification::new(
                true,
                91,
                vec![DetectedPattern::new("gender_bias", Severity::Critical).with_evidence("Only boys")],
            )))
            .unwrap();
        let records = vec![record, AnalysisResult::pending("a2", "Infosys - HR", "Hiring", 5)];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        RecordWriter::to_file(&records, &path).unwrap();

        let loaded = RecordReader::from_file(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_to_string_wraps_records() {
        let json = RecordWriter::to_string(&[]).unwrap();
        assert!(json.contains("\"records\": []"));
    }
}
