//! Failure summary generation for assessment runs.

use super::collection::{EntityFailure, OperationType};
use crate::core::EntityRef;
use std::collections::BTreeMap;

/// Summary of failures from a batch run.
#[derive(Debug)]
pub struct FailureSummary {
    pub total: usize,
    pub by_operation: BTreeMap<OperationType, usize>,
    pub by_error_kind: BTreeMap<&'static str, Vec<EntityRef>>,
    pub sample_errors: Vec<EntityFailure>,
}

impl FailureSummary {
    pub fn from_failures(failures: &[EntityFailure]) -> Self {
        let mut by_operation: BTreeMap<OperationType, usize> = BTreeMap::new();
        let mut by_error_kind: BTreeMap<&'static str, Vec<EntityRef>> = BTreeMap::new();

        for failure in failures {
            *by_operation.entry(failure.operation).or_insert(0) += 1;
            by_error_kind
                .entry(failure.kind)
                .or_default()
                .push(failure.entity);
        }

        Self {
            total: failures.len(),
            by_operation,
            by_error_kind,
            sample_errors: failures.iter().take(10).cloned().collect(),
        }
    }

    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("\nFailure breakdown:\n");
        for (operation, count) in &self.by_operation {
            report.push_str(&format!("  {}: {} entity(ies)\n", operation.as_str(), count));
        }

        report.push_str("\nError categories:\n");
        for (kind, entities) in &self.by_error_kind {
            report.push_str(&format!("  {}: {} entity(ies)\n", kind, entities.len()));
        }

        if !self.sample_errors.is_empty() {
            report.push_str("\nSample errors:\n");
            for failure in &self.sample_errors {
                report.push_str(&format!("  {}: {}\n", failure.entity, failure.error));
            }
        }

        if self.total > self.sample_errors.len() {
            report.push_str(&format!(
                "  ... and {} more\n",
                self.total - self.sample_errors.len()
            ));
        }

        report
    }
}
