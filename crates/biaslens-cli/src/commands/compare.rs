use crate::OutputFormat;
use anyhow::{Context, Result};
use biaslens_core::compare::StatusTransition;
use biaslens_core::report::{ComparisonView, ReportBuilder};
use biaslens_core::store::RecordReader;
use std::path::Path;

/// Compare two analyses from the store by id
pub fn compare_records(store: &Path, left_id: &str, right_id: &str) -> Result<ComparisonView> {
    let records = RecordReader::from_file(store)
        .with_context(|| format!("Failed to load record store {}", store.display()))?;

    let view = ReportBuilder::default().build_comparison_view(&records, left_id, right_id)?;
    Ok(view)
}

pub fn execute(store: &Path, left_id: &str, right_id: &str, format: OutputFormat) -> Result<()> {
    tracing::info!("Comparing {} and {}", left_id, right_id);

    let view = compare_records(store, left_id, right_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Table => output_table(&view),
        OutputFormat::Pretty => output_pretty(&view),
    }

    Ok(())
}

fn output_pretty(view: &ComparisonView) {
    use console::style;

    let d = &view.diff;

    println!("\n{}", style("Analysis Comparison").bold().cyan());
    println!("{}", style("===================").cyan());
    println!(
        "  Left:   {} ({})",
        style(&view.left.source_label).bold(),
        view.left.id
    );
    println!(
        "  Right:  {} ({})",
        style(&view.right.source_label).bold(),
        view.right.id
    );

    let verdict = match d.status_transition {
        StatusTransition::BothClean => style("Both clean").green(),
        StatusTransition::BothBiased => style("Both biased").red(),
        StatusTransition::Regressed => style("Regressed (clean -> biased)").red().bold(),
        StatusTransition::Improved => style("Improved (biased -> clean)").green().bold(),
    };
    println!("\n{}", style("Verdict").bold());
    println!("  {}", verdict);
    println!("  Confidence change:  {:+}%", d.confidence_delta);
    println!("  Pattern change:     {:+}", d.pattern_count_delta);

    println!("\n{}", style("Bias Types").bold());
    for t in &d.types_in_both {
        println!("  = {}", t);
    }
    for t in &d.types_only_in_left {
        println!("  {} {}", style("-").green(), t);
    }
    for t in &d.types_only_in_right {
        println!("  {} {}", style("+").red(), t);
    }
    if d.types_in_both.is_empty() && d.types_only_in_left.is_empty() && d.types_only_in_right.is_empty() {
        println!("  {}", style("No bias types on either side").dim());
    }

    println!();
}

fn output_table(view: &ComparisonView) {
    let d = &view.diff;

    println!("Metric,Value");
    println!("Left,{}", view.left.id);
    println!("Right,{}", view.right.id);
    println!("Transition,{}", d.status_transition.as_str());
    println!("Confidence Delta,{}", d.confidence_delta);
    println!("Pattern Count Delta,{}", d.pattern_count_delta);
    println!("Only In Left,{}", d.types_only_in_left.join(";"));
    println!("Only In Right,{}", d.types_only_in_right.join(";"));
    println!("In Both,{}", d.types_in_both.join(";"));
}
