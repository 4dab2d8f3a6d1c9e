use super::{FilterArgs, load_filtered};
use anyhow::Result;
use biaslens_core::store::RecordWriter;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Write the records matching `filters` to `output`, or to stdout
pub fn execute(store: &Path, filters: &FilterArgs, output: Option<PathBuf>) -> Result<()> {
    tracing::debug!("Filtering record store: {}", store.display());

    let filtered = load_filtered(store, filters)?;
    if filtered.is_empty() {
        tracing::warn!("No records matched the filter criteria");
    }

    if let Some(output_path) = output {
        tracing::debug!("Writing filtered records to: {}", output_path.display());
        RecordWriter::to_file(&filtered, &output_path)?;
    } else {
        tracing::debug!("Writing filtered records to stdout");
        let json = RecordWriter::to_string(&filtered)?;
        io::stdout().write_all(json.as_bytes())?;
        io::stdout().write_all(b"\n")?;
    }

    Ok(())
}
