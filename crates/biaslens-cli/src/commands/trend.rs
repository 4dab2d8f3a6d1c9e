use super::{FilterArgs, load_filtered, now_ms};
use crate::OutputFormat;
use anyhow::{Result, bail};
use biaslens_core::analysis::{DayBucket, daily_trend};
use chrono::NaiveDate;
use std::path::Path;

pub fn execute(
    store: &Path,
    filters: &FilterArgs,
    days: usize,
    as_of: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    if days == 0 {
        bail!("--days must be at least 1");
    }

    tracing::info!("Building {}-day trend for {}", days, store.display());

    let records = load_filtered(store, filters)?;
    let trend = daily_trend(&records, days, now_ms(as_of)?);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trend)?),
        OutputFormat::Table => output_table(&trend),
        OutputFormat::Pretty => output_pretty(&trend),
    }

    Ok(())
}

fn output_pretty(trend: &[DayBucket]) {
    use console::style;

    println!("\n{}", style("Daily Trend").bold().cyan());
    println!("{}", style("===========").cyan());

    let peak = trend.iter().map(|b| b.total_count).max().unwrap_or(0).max(1);
    for bucket in trend {
        let width = bucket.total_count * 30 / peak;
        let biased_width = if bucket.total_count > 0 {
            bucket.biased_count * width / bucket.total_count
        } else {
            0
        };
        println!(
            "  {}  {}{} {}",
            bucket.date_label,
            style("#".repeat(biased_width)).red(),
            style("#".repeat(width - biased_width)).green(),
            style(bucket.total_count).dim()
        );
    }

    println!();
}

fn output_table(trend: &[DayBucket]) {
    println!("Date,Total,Biased,Clean");
    for bucket in trend {
        println!(
            "{},{},{},{}",
            bucket.date_label, bucket.total_count, bucket.biased_count, bucket.clean_count
        );
    }
}
