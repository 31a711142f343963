//! Binary-level tests: every subcommand against a data file in a temp dir.

use assert_cmd::Command;
use chainrisk::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TOML};
use chainrisk::core::{EntityRef, PartId, SupplierId, DEFAULT_ALERT_THRESHOLD};
use chainrisk::store::{load_snapshot, save_snapshot, RiskStore};
use chainrisk::testkit::StoreBuilder;
use indoc::indoc;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// One German supplier single-sourcing one part with no stock.
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), DEFAULT_CONFIG_TOML).unwrap();
        let today = chrono::Utc::now().date_naive();
        let store = StoreBuilder::new(today)
            .supplier(1, "Acme Castings", Some("DE"))
            .part(10, "Gearbox housing", None)
            .supplies(1, 10)
            .build();
        let workspace = Self { dir };
        save_snapshot(&store, &workspace.data()).unwrap();
        workspace
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data(&self) -> PathBuf {
        self.dir.path().join("data.json")
    }

    fn chainrisk(&self) -> Command {
        let mut cmd = Command::cargo_bin("chainrisk").unwrap();
        cmd.current_dir(self.path())
            .env_remove("CHAINRISK_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--quiet")
            .arg("--config")
            .arg(self.path().join(CONFIG_FILE_NAME))
            .arg("--data")
            .arg(self.data());
        cmd
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.chainrisk().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }
}

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("chainrisk")
        .unwrap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(written, DEFAULT_CONFIG_TOML);

    // a second init without --force refuses to overwrite
    Command::cargo_bin("chainrisk")
        .unwrap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure();
}

#[test]
fn test_assess_writes_results_back() {
    let workspace = Workspace::new();

    let stdout = workspace.stdout(&["assess", "--format", "json"]);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["suppliers_assessed"], 1);
    assert_eq!(summary["parts_high_risk"], 1);
    assert_eq!(summary["risk_events_created"], 1);

    let store = load_snapshot(&workspace.data()).unwrap();
    let part = store.get_or_create_part_risk(PartId(10)).unwrap();
    assert_eq!(part.combined_risk(), 65);
    assert_eq!(store.alerts().unwrap().len(), 2);
    assert_eq!(store.events().unwrap().len(), 1);
}

#[test]
fn test_only_flags_conflict() {
    let workspace = Workspace::new();
    workspace
        .chainrisk()
        .args(["assess", "--suppliers-only", "--parts-only"])
        .assert()
        .failure();
}

#[test]
fn test_export_csv_and_json() {
    let workspace = Workspace::new();
    workspace.stdout(&["assess"]);

    let csv = workspace.stdout(&["export", "--format", "csv"]);
    assert_eq!(
        csv,
        indoc! {"
            kind,id,code,threshold,score,level
            supplier,1,S0001,70,46.0,medium
            part,10,P0010,,65.0,high
        "}
    );

    let out = workspace.path().join("out").join("risks.json");
    workspace.stdout(&["export", "--format", "json", "--output", out.to_str().unwrap()]);
    let records: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(records.as_array().map(Vec::len), Some(2));
    assert_eq!(records[1]["level"], "high");
}

#[test]
fn test_import_applies_valid_rows_only() {
    let workspace = Workspace::new();
    let thresholds = workspace.path().join("thresholds.csv");
    std::fs::write(
        &thresholds,
        indoc! {"
            kind,id,threshold
            supplier,1,40
            supplier,1,150
            part,10,25
        "},
    )
    .unwrap();

    let stdout = workspace.stdout(&["import", thresholds.to_str().unwrap()]);
    assert!(stdout.contains("Applied 2 of 3 threshold records"), "{stdout}");

    let store = load_snapshot(&workspace.data()).unwrap();
    let supplier = store
        .get_or_create_supplier_risk(SupplierId(1), DEFAULT_ALERT_THRESHOLD)
        .unwrap();
    assert_eq!(supplier.alert_threshold(), 40);
    let part = store
        .parts()
        .unwrap()
        .into_iter()
        .find(|part| part.id == PartId(10))
        .unwrap();
    assert_eq!(part.low_stock_threshold, Some(25));
}

#[test]
fn test_alerts_list_and_resolve() {
    let workspace = Workspace::new();
    assert!(workspace.stdout(&["alerts"]).contains("No open alerts"));

    workspace.stdout(&["assess"]);
    let listing = workspace.stdout(&["alerts"]);
    assert!(listing.contains("P0010") || listing.contains("Gearbox housing"), "{listing}");

    let store = load_snapshot(&workspace.data()).unwrap();
    let alert = store
        .open_alert(EntityRef::Part(PartId(10)))
        .unwrap()
        .unwrap();
    let id = alert.id.get().to_string();
    workspace.stdout(&["alerts", "--resolve", &id, "--resolver", "buyer"]);

    let store = load_snapshot(&workspace.data()).unwrap();
    let resolved = store.alert(alert.id).unwrap();
    assert!(resolved.resolved);
    assert_eq!(resolved.resolved_by.as_deref(), Some("buyer"));
}

#[test]
fn test_resolve_event_stamps_today() {
    let workspace = Workspace::new();
    workspace.stdout(&["assess"]);

    let stdout = workspace.stdout(&["resolve-event", "1", "--notes", "second source qualified"]);
    assert!(stdout.contains("Resolved event#1"), "{stdout}");

    let store = load_snapshot(&workspace.data()).unwrap();
    let event = &store.events().unwrap()[0];
    assert!(event.is_resolved());
    assert_eq!(event.resolution_date(), Some(chrono::Utc::now().date_naive()));
    assert_eq!(event.resolution_notes(), "second source qualified");
}

#[test]
fn test_review_unknown_recommendation_fails() {
    let workspace = Workspace::new();
    workspace
        .chainrisk()
        .args(["review-recommendation", "42"])
        .assert()
        .failure();
}

#[test]
fn test_missing_data_file_fails() {
    let workspace = Workspace::new();
    std::fs::remove_file(workspace.data()).unwrap();

    let output = workspace.chainrisk().arg("assess").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("data file"));
}
