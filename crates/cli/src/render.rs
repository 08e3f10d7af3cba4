//! Result Rendering

use anomaly_engine::{AnalysisSummary, AnomalyResult, RuleOutcome, SkipReason};
use data_ingest::IngestReport;

/// Short display label for a rule outcome
fn outcome_label(outcome: RuleOutcome) -> &'static str {
    match outcome {
        RuleOutcome::Fired => "FIRED",
        RuleOutcome::Clear => "clear",
        RuleOutcome::NotApplicable(SkipReason::NoWinterData) => "n/a (no winter data)",
        RuleOutcome::NotApplicable(SkipReason::InsufficientPeers) => "n/a (no peers)",
        RuleOutcome::NotApplicable(SkipReason::NoPriorWinter) => "n/a (no prior winter)",
        RuleOutcome::NotApplicable(SkipReason::PriorWinterBelowMinimum) => "n/a (prior too low)",
    }
}

fn fmt_m3(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

/// Print the result table, summary, and ingest report as text
pub fn text(results: &[AnomalyResult], summary: &AnalysisSummary, report: &IngestReport) {
    println!(
        "{:<14} {:<10} {:>8} {:>8} {:<22} {:<22} {:<22} {}",
        "INSTALLATION", "BUILDING", "WINTER", "PEERS", "LOW-WINTER", "VS-BUILDING", "SUDDEN-DROP", "FLAG"
    );
    for result in results {
        println!(
            "{:<14} {:<10} {:>8} {:>8} {:<22} {:<22} {:<22} {}",
            result.installation_id,
            result.building_id,
            fmt_m3(result.evidence.winter_mean_m3),
            fmt_m3(result.evidence.peer_average_m3),
            outcome_label(result.low_winter_consumption),
            outcome_label(result.below_building_average),
            outcome_label(result.sudden_drop),
            if result.anomalous { "ANOMALOUS" } else { "" }
        );
    }

    println!();
    println!(
        "{} installations, {} anomalous (low-winter {}, vs-building {}, sudden-drop {})",
        summary.installations,
        summary.anomalous,
        summary.low_winter_consumption.fired,
        summary.below_building_average.fired,
        summary.sudden_drop.fired
    );
    for building in &summary.buildings {
        println!(
            "  {}: {}/{} anomalous",
            building.building_id, building.anomalous, building.installations
        );
    }

    if report.rows_with_errors > 0 {
        println!();
        println!(
            "{} of {} rows had data errors and were excluded in part or full:",
            report.rows_with_errors, report.rows_read
        );
        for error in &report.row_errors {
            println!(
                "  row {} ({}): {}",
                error.row,
                error.installation_id.as_deref().unwrap_or("?"),
                error.message
            );
        }
    }
}

/// Emit results, summary, and ingest report as one JSON document
pub fn json(
    results: &[AnomalyResult],
    summary: &AnalysisSummary,
    report: &IngestReport,
) -> anyhow::Result<()> {
    let document = serde_json::json!({
        "results": results,
        "summary": summary,
        "ingest": report,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
