use anyhow::{Context, Result, bail};
use biaslens_core::store::{RecordReader, RecordWriter, remove_ids};
use std::path::Path;

/// Remove records by id and rewrite the store. Returns the number removed.
pub fn execute(store: &Path, ids: &[String]) -> Result<usize> {
    tracing::debug!("Deleting {} ids from {}", ids.len(), store.display());

    let mut records = RecordReader::from_file(store)
        .with_context(|| format!("Failed to load record store {}", store.display()))?;

    let removed = remove_ids(&mut records, ids);
    if removed == 0 {
        bail!("None of the given ids exist in {}", store.display());
    }

    RecordWriter::to_file(&records, store)?;
    println!("Deleted {} of {} requested analyses", removed, ids.len());

    Ok(removed)
}
