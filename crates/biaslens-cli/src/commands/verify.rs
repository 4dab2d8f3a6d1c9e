use super::{FilterArgs, load_filtered};
use crate::OutputFormat;
use anyhow::Result;
use biaslens_core::evidence::{EvidenceMismatch, verify_all};
use std::path::Path;

pub fn find_mismatches(store: &Path, filters: &FilterArgs) -> Result<Vec<EvidenceMismatch>> {
    let records = load_filtered(store, filters)?;
    Ok(verify_all(&records))
}

pub fn execute(store: &Path, filters: &FilterArgs, format: OutputFormat) -> Result<()> {
    tracing::info!("Verifying evidence quotes in {}", store.display());

    let mismatches = find_mismatches(store, filters)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mismatches)?),
        OutputFormat::Table => {
            println!("Record,Pattern,Bias Type,Evidence");
            for m in &mismatches {
                println!(
                    "{},{},{},\"{}\"",
                    m.record_id,
                    m.pattern_index,
                    m.bias_type,
                    m.evidence_text.replace('"', "\"\"")
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            println!("\n{}", style("Evidence Verification").bold().cyan());
            println!("{}", style("=====================").cyan());
            if mismatches.is_empty() {
                println!("  {}", style("All evidence quotes appear in their texts").green());
            } else {
                println!(
                    "  {} quotes not found in the submitted text:",
                    style(mismatches.len()).yellow()
                );
                for m in &mismatches {
                    println!(
                        "  {} #{} {}: \"{}\"",
                        style(&m.record_id).bold(),
                        m.pattern_index,
                        m.bias_type.display_name(),
                        m.evidence_text
                    );
                }
            }
            println!();
        }
    }

    Ok(())
}
