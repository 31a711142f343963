use crate::core::{EntityKind, RiskLevel};
use crate::errors::Result;
use crate::store::RiskStore;
use comfy_table::{Cell, Color, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

/// One flat risk record, as written by `chainrisk export`.
///
/// `threshold` is the supplier's alert threshold or the part's low-stock
/// threshold. `score` is the supplier's overall score or the part's
/// combined score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub kind: EntityKind,
    pub id: u64,
    pub code: String,
    pub threshold: Option<u32>,
    pub score: f64,
    pub level: RiskLevel,
}

/// Every assessed supplier and part, suppliers first, each by id.
pub fn collect_export(store: &dyn RiskStore) -> Result<Vec<ExportRecord>> {
    let supplier_codes: BTreeMap<_, _> = store
        .suppliers()?
        .into_iter()
        .map(|supplier| (supplier.id, supplier.code))
        .collect();
    let parts: BTreeMap<_, _> = store
        .parts()?
        .into_iter()
        .map(|part| (part.id, part))
        .collect();

    let mut records: Vec<ExportRecord> = store
        .supplier_risks()?
        .into_iter()
        .filter(|record| record.last_assessment_date.is_some())
        .map(|record| ExportRecord {
            kind: EntityKind::Supplier,
            id: record.supplier.get(),
            code: supplier_codes.get(&record.supplier).cloned().unwrap_or_default(),
            threshold: Some(u32::from(record.alert_threshold())),
            score: record.overall_risk_score(),
            level: record.risk_level(),
        })
        .collect();

    records.extend(
        store
            .part_risks()?
            .into_iter()
            .filter(|record| record.last_assessment_date.is_some())
            .map(|record| {
                let part = parts.get(&record.part);
                ExportRecord {
                    kind: EntityKind::Part,
                    id: record.part.get(),
                    code: part.map(|p| p.code.clone()).unwrap_or_default(),
                    threshold: part.and_then(|p| p.low_stock_threshold),
                    score: f64::from(record.combined_risk()),
                    level: record.risk_level(),
                }
            }),
    );

    records.sort_by_key(|record| (record.kind, record.id));
    Ok(records)
}

pub trait ExportWriter {
    fn write_records(&mut self, records: &[ExportRecord]) -> Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ExportWriter for JsonWriter<W> {
    fn write_records(&mut self, records: &[ExportRecord]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, records)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: Write> ExportWriter for CsvWriter<W> {
    fn write_records(&mut self, records: &[ExportRecord]) -> Result<()> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
        RiskLevel::Critical => Color::Magenta,
    }
}

impl<W: Write> ExportWriter for TableWriter<W> {
    fn write_records(&mut self, records: &[ExportRecord]) -> Result<()> {
        let mut table = Table::new();
        table.set_header(vec!["Kind", "Id", "Code", "Threshold", "Score", "Level"]);
        for record in records {
            table.add_row(vec![
                Cell::new(record.kind),
                Cell::new(record.id),
                Cell::new(&record.code),
                Cell::new(record.threshold.map_or_else(|| "-".to_string(), |t| t.to_string())),
                Cell::new(format!("{:.2}", record.score)),
                Cell::new(record.level).fg(level_color(record.level)),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskConfig;
    use crate::core::FixedClock;
    use crate::orchestrator::{AssessmentOptions, Orchestrator};
    use crate::testkit::StoreBuilder;
    use chrono::NaiveDate;
    use indoc::indoc;
    use std::sync::Arc;

    fn assessed_store() -> Arc<crate::store::InMemoryStore> {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let store = Arc::new(
            StoreBuilder::new(today)
                .supplier(1, "Acme Castings", Some("DE"))
                .part(10, "Gearbox housing", None)
                .supplies(1, 10)
                .stock(10, 5.0)
                .low_stock_threshold(10, 20)
                .build(),
        );
        Orchestrator::with_defaults(store.clone(), Arc::new(RiskConfig::default()))
            .unwrap()
            .with_clock(Arc::new(FixedClock::at_date(today)))
            .run(&AssessmentOptions::default())
            .unwrap();
        store
    }

    #[test]
    fn test_export_lists_suppliers_then_parts() {
        let records = collect_export(assessed_store().as_ref()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, EntityKind::Supplier);
        assert_eq!(records[0].code, "S0001");
        assert_eq!(records[0].threshold, Some(70));
        assert_eq!(records[1].kind, EntityKind::Part);
        assert_eq!(records[1].threshold, Some(20));
    }

    #[test]
    fn test_unassessed_records_are_not_exported() {
        let store = StoreBuilder::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
            .part(10, "Gearbox housing", None)
            .high_value(10)
            .build();
        assert!(collect_export(&store).unwrap().is_empty());
    }

    #[test]
    fn test_csv_output_has_header_and_empty_threshold() {
        let records = vec![ExportRecord {
            kind: EntityKind::Part,
            id: 3,
            code: "P0003".into(),
            threshold: None,
            score: 65.0,
            level: RiskLevel::High,
        }];
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer).write_records(&records).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            indoc! {"
                kind,id,code,threshold,score,level
                part,3,P0003,,65.0,high
            "}
        );
    }

    #[test]
    fn test_table_output_mentions_every_record() {
        let records = collect_export(assessed_store().as_ref()).unwrap();
        let mut buffer = Vec::new();
        TableWriter::new(&mut buffer).write_records(&records).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("S0001"));
        assert!(output.contains("P0010"));
    }
}
