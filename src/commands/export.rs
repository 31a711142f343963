use super::CommandContext;
use crate::cli::ExportFormat;
use crate::io::{collect_export, ensure_dir, CsvWriter, ExportWriter, JsonWriter, TableWriter};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

fn create_writer(format: ExportFormat, out: Box<dyn Write>) -> Box<dyn ExportWriter> {
    match format {
        ExportFormat::Table => Box::new(TableWriter::new(out)),
        ExportFormat::Json => Box::new(JsonWriter::new(out)),
        ExportFormat::Csv => Box::new(CsvWriter::new(out)),
    }
}

pub fn handle_export(
    context: &CommandContext,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let records = collect_export(context.store.as_ref())?;
    let out: Box<dyn Write> = match &output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            Box::new(std::io::BufWriter::new(
                std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            ))
        }
        None => Box::new(std::io::stdout()),
    };
    create_writer(format, out).write_records(&records)?;
    if let Some(path) = output {
        log::info!("Exported {} records to {}", records.len(), path.display());
    }
    Ok(())
}
