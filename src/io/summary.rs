//! Terminal output for run summaries and alert listings.

use crate::core::{AlertRecord, RiskLevel};
use crate::orchestrator::RunSummary;
use colored::*;
use comfy_table::{Cell, Table};
use std::fmt::Write as _;

fn level_label(level: RiskLevel) -> ColoredString {
    let label = level.to_string();
    match level {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red(),
        RiskLevel::Critical => label.red().bold(),
    }
}

fn counter(label: &str, value: usize) -> String {
    format!("  {:<30} {}\n", label, value)
}

/// Human-readable run summary.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Assessment summary".bold());
    out.push_str(&counter("Suppliers assessed", summary.suppliers_assessed));
    out.push_str(&counter("Suppliers at high risk", summary.suppliers_high_risk));
    out.push_str(&counter("Parts assessed", summary.parts_assessed));
    out.push_str(&counter("Parts at high risk", summary.parts_high_risk));
    out.push_str(&counter(
        "Parts below stock threshold",
        summary.parts_below_stock_threshold,
    ));
    out.push_str(&counter(
        "Recommendations generated",
        summary.recommendations_generated,
    ));
    out.push_str(&counter("Alerts dispatched", summary.alerts_dispatched));
    out.push_str(&counter("Risk events created", summary.risk_events_created));

    if summary.skipped_by_timeout > 0 {
        let _ = writeln!(
            out,
            "  {}",
            format!(
                "{} entities skipped: run timeout reached",
                summary.skipped_by_timeout
            )
            .yellow()
        );
    }

    if summary.has_errors() {
        let _ = writeln!(
            out,
            "  {}",
            format!("{} entities failed", summary.errors.len()).red()
        );
        out.push_str(&summary.failure_summary().report());
    } else {
        let _ = writeln!(out, "  {}", "No errors".green());
    }
    let _ = writeln!(out, "  Finished in {} ms", summary.elapsed_ms);
    out
}

pub fn print_run_summary(summary: &RunSummary) {
    print!("{}", format_run_summary(summary));
}

/// Table of alerts, most severe first.
pub fn alerts_table(alerts: &[AlertRecord]) -> Table {
    let mut sorted: Vec<&AlertRecord> = alerts.iter().collect();
    sorted.sort_by_key(|alert| (std::cmp::Reverse(alert.risk_level), alert.id));

    let mut table = Table::new();
    table.set_header(vec!["Id", "Entity", "Level", "Category", "Since", "Message"]);
    for alert in sorted {
        table.add_row(vec![
            Cell::new(alert.id),
            Cell::new(alert.entity),
            Cell::new(level_label(alert.risk_level)),
            Cell::new(alert.category),
            Cell::new(alert.last_activity().format("%Y-%m-%d %H:%M")),
            Cell::new(&alert.message),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AlertId, EntityRef, NewAlert, RiskCategory, SupplierId};
    use crate::errors::{EntityFailure, RiskError};
    use chrono::Utc;

    #[test]
    fn test_summary_without_errors() {
        colored::control::set_override(false);
        let summary = RunSummary {
            suppliers_assessed: 3,
            parts_high_risk: 1,
            ..Default::default()
        };
        let text = format_run_summary(&summary);
        assert!(text.contains("Suppliers assessed"));
        assert!(text.contains("No errors"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn test_summary_reports_failures_and_timeouts() {
        colored::control::set_override(false);
        let entity = EntityRef::Supplier(SupplierId(4));
        let summary = RunSummary {
            skipped_by_timeout: 2,
            errors: vec![EntityFailure::supplier_assessment(
                entity,
                &RiskError::not_found(entity),
            )],
            ..Default::default()
        };
        let text = format_run_summary(&summary);
        assert!(text.contains("2 entities skipped"));
        assert!(text.contains("1 entities failed"));
        assert!(text.contains("supplier#4 not found"));
    }

    #[test]
    fn test_alerts_table_lists_each_alert() {
        let alert = AlertRecord::from_new(
            AlertId(7),
            NewAlert {
                entity: EntityRef::Supplier(SupplierId(1)),
                risk_level: RiskLevel::High,
                alert_type: "supplier_risk".into(),
                category: RiskCategory::Delivery,
                message: "Supplier Acme risk level is HIGH".into(),
                alert_date: Utc::now(),
                event_pending: false,
            },
        );
        let rendered = alerts_table(&[alert]).to_string();
        assert!(rendered.contains("alert#7"));
        assert!(rendered.contains("supplier#1"));
        assert!(rendered.contains("delivery"));
    }
}
