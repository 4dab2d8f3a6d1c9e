use super::{FilterArgs, load_filtered};
use crate::OutputFormat;
use anyhow::Result;
use biaslens_core::report::{ExportRow, export_rows};
use std::path::Path;

pub fn execute(store: &Path, filters: &FilterArgs, format: OutputFormat) -> Result<()> {
    tracing::info!("Exporting records from {}", store.display());

    let records = load_filtered(store, filters)?;
    let rows = export_rows(&records);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => output_table(&rows),
        OutputFormat::Pretty => output_pretty(&rows),
    }

    Ok(())
}

fn output_table(rows: &[ExportRow]) {
    println!("Id,Label,Submitted At,Status,Biased,Confidence,Patterns,Bias Types,Highest Severity");
    for row in rows {
        println!(
            "{},{},{},{},{},{},{},{},{}",
            csv_field(&row.id),
            csv_field(&row.source_label),
            row.submitted_at,
            row.status,
            row.bias_detected,
            row.confidence_percent.map(|c| c.to_string()).unwrap_or_default(),
            row.pattern_count,
            csv_field(&row.bias_types.join(";")),
            row.highest_severity.as_deref().unwrap_or("")
        );
    }
}

fn output_pretty(rows: &[ExportRow]) {
    use console::style;

    println!("\n{}", style(format!("{} analyses", rows.len())).bold().cyan());
    for row in rows {
        let verdict = if row.bias_detected {
            style("BIASED").red().bold()
        } else {
            style("clean").green()
        };
        println!(
            "  {} {} [{}] {} {}",
            style(&row.id).dim(),
            row.source_label,
            row.status,
            verdict,
            row.confidence_percent
                .map(|c| format!("{}%", c))
                .unwrap_or_default()
        );
        if !row.bias_types.is_empty() {
            println!("      {}", row.bias_types.join(", "));
        }
    }
    println!();
}

/// Quote a field if it contains a separator or quote
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
