//! Human-readable run summary printed by the CLI

use crate::crawler::{CrawlReport, StopReason};

/// Formats the end-of-run summary
pub fn format_report(report: &CrawlReport, output_path: &str) -> String {
    let reason = match report.stop_reason {
        StopReason::Drained => "frontier drained",
        StopReason::BudgetReached => "URL budget reached",
        StopReason::Cancelled => "cancelled",
    };

    let mut lines = vec![
        "=== Crawl Summary ===".to_string(),
        format!("Started:  {}", report.started_at.to_rfc3339()),
        format!("Finished: {}", report.finished_at.to_rfc3339()),
        format!("Duration: {:.2}s", report.elapsed().as_secs_f64()),
        format!("Stopped:  {}", reason),
        format!("Visited:  {}", report.visited.len()),
        format!("Failed:   {}", report.failed),
    ];
    if !output_path.is_empty() {
        lines.push(format!("Output:   {}", output_path));
    }

    lines.join("\n")
}

/// Prints the end-of-run summary to stdout
pub fn print_report(report: &CrawlReport, output_path: &str) {
    println!("{}", format_report(report, output_path));
}
