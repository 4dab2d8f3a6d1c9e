use super::{FilterArgs, load_filtered};
use crate::OutputFormat;
use anyhow::Result;
use biaslens_core::analysis::{GroupStat, label_prefix, top_groups_by_label_prefix};
use std::path::Path;

pub fn top_groups(store: &Path, filters: &FilterArgs, limit: usize) -> Result<Vec<GroupStat>> {
    let records = load_filtered(store, filters)?;
    Ok(top_groups_by_label_prefix(&records, label_prefix, limit))
}

pub fn execute(store: &Path, filters: &FilterArgs, limit: usize, format: OutputFormat) -> Result<()> {
    tracing::info!("Grouping records by company for {}", store.display());

    let groups = top_groups(store, filters, limit)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&groups)?),
        OutputFormat::Table => {
            println!("Company,Total,Biased,Clean");
            for group in &groups {
                println!(
                    "{},{},{},{}",
                    group.key, group.total, group.biased_count, group.clean_count
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            println!("\n{}", style("Top Companies").bold().cyan());
            println!("{}", style("=============").cyan());
            if groups.is_empty() {
                println!("  {}", style("No analyses found").dim());
            }
            for (i, group) in groups.iter().enumerate() {
                println!(
                    "  {}. {} - {} analyses ({} biased, {} clean)",
                    i + 1,
                    style(&group.key).bold(),
                    group.total,
                    style(group.biased_count).red(),
                    style(group.clean_count).green()
                );
            }
            println!();
        }
    }

    Ok(())
}
