use super::{FilterArgs, load_filtered, now_ms};
use crate::OutputFormat;
use anyhow::Result;
use biaslens_core::report::{DashboardReport, ReportBuilder};
use chrono::NaiveDate;
use std::path::Path;

/// Load, filter and summarize a record store
pub fn build_report(
    store: &Path,
    filters: &FilterArgs,
    builder: &ReportBuilder,
    now_ms: i64,
) -> Result<DashboardReport> {
    let records = load_filtered(store, filters)?;
    Ok(builder.build_dashboard_summary(&records, now_ms))
}

pub fn execute(
    store: &Path,
    filters: &FilterArgs,
    builder: &ReportBuilder,
    as_of: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Summarizing record store: {}", store.display());

    let report = build_report(store, filters, builder, now_ms(as_of)?)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report)?,
        OutputFormat::Pretty => output_pretty(&report)?,
    }

    Ok(())
}

fn output_pretty(report: &DashboardReport) -> Result<()> {
    use console::style;

    let s = &report.summary;

    println!("\n{}", style("Bias Analysis Dashboard").bold().cyan());
    println!("{}", style("=======================").cyan());

    println!("\n{}", style("Overview").bold());
    println!("  Analyses:       {}", style(s.total).yellow());
    println!(
        "  Biased:         {} ({}%)",
        style(s.biased_count).red(),
        s.bias_rate_percent
    );
    println!("  Clean:          {}", style(s.clean_count).green());
    println!(
        "  Status:         {} completed, {} pending, {} failed",
        s.status_counts.completed, s.status_counts.pending, s.status_counts.failed
    );
    println!(
        "  Confidence:     avg {}%, min {}%, max {}%",
        s.avg_confidence_percent, s.min_confidence_percent, s.max_confidence_percent
    );

    if !s.bias_type_histogram.is_empty() {
        println!("\n{}", style("Bias Types").bold());
        let mut types: Vec<(&String, &usize)> = s.bias_type_histogram.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1));
        for (bias_type, count) in types {
            println!("  {:<28} {}", bias_type, count);
        }
    }

    let sev = &s.severity_histogram;
    if sev.total() > 0 {
        println!("\n{}", style("Severity").bold());
        println!("  Critical:       {}", style(sev.critical).red().bold());
        println!("  High:           {}", style(sev.high).red());
        println!("  Medium:         {}", style(sev.medium).yellow());
        println!("  Low:            {}", sev.low);
    }

    if !report.top_groups.is_empty() {
        println!("\n{}", style("Top Companies").bold());
        for group in &report.top_groups {
            println!(
                "  {:<20} {} analyses, {} biased, {} clean",
                group.key, group.total, group.biased_count, group.clean_count
            );
        }
    }

    let active: Vec<_> = report.trend.iter().filter(|b| b.total_count > 0).collect();
    println!(
        "\n{}",
        style(format!("Activity (last {} days)", report.trend.len())).bold()
    );
    if active.is_empty() {
        println!("  {}", style("No submissions in this window").dim());
    }
    for bucket in active {
        println!(
            "  {}  {} total, {} biased, {} clean",
            bucket.date_label, bucket.total_count, bucket.biased_count, bucket.clean_count
        );
    }

    println!();
    Ok(())
}

fn output_json(report: &DashboardReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &DashboardReport) -> Result<()> {
    let s = &report.summary;

    println!("Metric,Value");
    println!("Total,{}", s.total);
    println!("Biased,{}", s.biased_count);
    println!("Clean,{}", s.clean_count);
    println!("Bias Rate (%),{}", s.bias_rate_percent);
    println!("Average Confidence (%),{}", s.avg_confidence_percent);
    println!("Min Confidence (%),{}", s.min_confidence_percent);
    println!("Max Confidence (%),{}", s.max_confidence_percent);
    println!("Completed,{}", s.status_counts.completed);
    println!("Pending,{}", s.status_counts.pending);
    println!("Failed,{}", s.status_counts.failed);

    println!();
    println!("Severity,Patterns");
    println!("low,{}", s.severity_histogram.low);
    println!("medium,{}", s.severity_histogram.medium);
    println!("high,{}", s.severity_histogram.high);
    println!("critical,{}", s.severity_histogram.critical);

    println!();
    println!("Bias Type,Patterns");
    for (bias_type, count) in &s.bias_type_histogram {
        println!("{},{}", bias_type, count);
    }

    println!();
    println!("Company,Total,Biased,Clean");
    for group in &report.top_groups {
        println!(
            "{},{},{},{}",
            group.key, group.total, group.biased_count, group.clean_count
        );
    }

    Ok(())
}
