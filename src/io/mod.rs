pub mod export;
pub mod import;
pub mod summary;

pub use export::{collect_export, CsvWriter, ExportRecord, ExportWriter, JsonWriter, TableWriter};
pub use import::{
    apply_thresholds, parse_threshold_records, read_threshold_records, ImportReport,
    RecordFormat, ThresholdRecord,
};
pub use summary::{alerts_table, format_run_summary, print_run_summary};

use crate::errors::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
