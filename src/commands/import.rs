use super::CommandContext;
use crate::cli::ImportFormat;
use crate::io::{apply_thresholds, read_threshold_records, RecordFormat};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

/// Apply threshold records and save. Rejected rows are listed but do not
/// fail the command.
pub fn handle_import(
    context: &CommandContext,
    path: &Path,
    format: Option<ImportFormat>,
) -> Result<()> {
    let format = format.map(|format| match format {
        ImportFormat::Json => RecordFormat::Json,
        ImportFormat::Csv => RecordFormat::Csv,
    });
    let records = read_threshold_records(path, format)
        .with_context(|| format!("Failed to read threshold records from {}", path.display()))?;

    let report = apply_thresholds(context.store.as_ref(), &records);
    context.save()?;

    println!("Applied {} of {} threshold records", report.applied, records.len());
    for failure in &report.failures {
        println!("  {} {}: {}", "rejected".red(), failure.entity, failure.error);
    }
    Ok(())
}
