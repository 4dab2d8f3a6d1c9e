mod reader;
mod writer;

pub use reader::RecordReader;
pub use writer::RecordWriter;

use crate::model::AnalysisResult;
use serde::Serialize;

/// On-disk shape of a record store file
#[derive(Debug, Serialize)]
pub struct RecordStore<'a> {
    pub records: &'a [AnalysisResult],
}

/// Remove the records with the given ids, returning how many were removed
pub fn remove_ids(records: &mut Vec<AnalysisResult>, ids: &[String]) -> usize {
    let before = records.len();
    records.retain(|r| !ids.contains(&r.id));
    let removed = before - records.len();

    tracing::info!("Removed {} of {} records", removed, before);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_ids() {
        let mut records = vec![
            AnalysisResult::pending("a", "x", "t", 0),
            AnalysisResult::pending("b", "x", "t", 0),
            AnalysisResult::pending("c", "x", "t", 0),
        ];

        let removed = remove_ids(&mut records, &["a".to_string(), "c".to_string(), "zz".to_string()]);
        assert_eq!(removed, 2);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "b");
    }
}
