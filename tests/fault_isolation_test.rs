//! Per-entity failures, retries, timeouts and concurrent writers.

mod common;

use chainrisk::config::RetryConfig;
use chainrisk::core::{EntityRef, PartId, SupplierId, DEFAULT_ALERT_THRESHOLD};
use chainrisk::errors::{OperationType, RiskError};
use chainrisk::orchestrator::{EntityOutcome, ReassessmentListener};
use chainrisk::store::RiskStore;
use chainrisk::testkit::{FaultyStore, StoreBuilder};
use common::{orchestrator, orchestrator_with, parts_only, suppliers_only, test_config, today};
use std::sync::Arc;

fn many_suppliers(count: u64) -> StoreBuilder {
    (1..=count).fold(StoreBuilder::new(today()), |builder, id| {
        builder.supplier(id, "Supplier", Some("DE"))
    })
}

#[test]
fn test_missing_supplier_mid_run_is_isolated() {
    let store = Arc::new(FaultyStore::new(many_suppliers(20).build()).missing(SupplierId(7)));

    let summary = orchestrator(store.clone()).run(&suppliers_only()).unwrap();

    assert_eq!(summary.suppliers_assessed, 19);
    assert_eq!(summary.errors.len(), 1);
    let failure = &summary.errors[0];
    assert_eq!(failure.entity, EntityRef::Supplier(SupplierId(7)));
    assert_eq!(failure.operation, OperationType::SupplierAssessment);
    assert_eq!(failure.kind, "not_found");
    assert_eq!(store.supplier_risks().unwrap().len(), 19);
}

#[test]
fn test_conflicting_writer_is_retried() {
    let base = many_suppliers(3).build();
    let store = Arc::new(
        FaultyStore::new(base)
            .conflict_once(SupplierId(1))
            .conflict_once(SupplierId(3)),
    );

    let summary = orchestrator(store.clone()).run(&suppliers_only()).unwrap();

    assert!(summary.errors.is_empty());
    // the losing save was repeated on top of the concurrent version
    let record = store
        .get_or_create_supplier_risk(SupplierId(1), DEFAULT_ALERT_THRESHOLD)
        .unwrap();
    assert_eq!(record.version, 2);
    assert_eq!(record.last_assessment_date, Some(today()));
}

#[test]
fn test_without_retries_conflicts_are_recorded() {
    let store = Arc::new(FaultyStore::new(many_suppliers(2).build()).conflict_once(SupplierId(2)));
    let mut config = test_config();
    config.retry = RetryConfig::disabled();

    let summary = orchestrator_with(store, config).run(&suppliers_only()).unwrap();

    assert_eq!(summary.suppliers_assessed, 1);
    assert_eq!(summary.errors[0].kind, "conflict");
}

#[test]
fn test_enumeration_failure_aborts_the_run() {
    let store = Arc::new(FaultyStore::new(many_suppliers(2).build()).failing_enumeration());

    let err = orchestrator(store).run(&suppliers_only()).unwrap_err();

    assert!(matches!(err, RiskError::Enumeration { .. }));
    assert_eq!(err.code().as_str(), "E030");
}

fn single_sourced_part() -> chainrisk::store::InMemoryStore {
    StoreBuilder::new(today())
        .supplier(1, "Acme Castings", Some("DE"))
        .part(10, "Gearbox housing", None)
        .supplies(1, 10)
        .build()
}

#[test]
fn test_failed_event_insert_is_logged_on_retry() {
    let store = Arc::new(FaultyStore::new(single_sourced_part()).failing_event_once());

    let summary = orchestrator(store.clone()).run(&parts_only()).unwrap();

    assert!(summary.errors.is_empty());
    assert_eq!(summary.risk_events_created, 1);
    let events = store.events().unwrap();
    assert_eq!(events.len(), 1);
    let alert = store.open_alert(EntityRef::Part(PartId(10))).unwrap().unwrap();
    assert!(!alert.event_pending);
    assert_eq!(alert.risk_event, Some(events[0].id));
}

#[test]
fn test_unlogged_event_is_created_by_next_run() {
    let store = Arc::new(FaultyStore::new(single_sourced_part()).failing_event_once());
    let mut config = test_config();
    config.retry = RetryConfig::disabled();
    let orchestrator = orchestrator_with(store.clone(), config);

    let first = orchestrator.run(&parts_only()).unwrap();
    assert_eq!(first.errors.len(), 1);
    assert_eq!(first.errors[0].kind, "transient_store");
    assert!(store.events().unwrap().is_empty());

    // the alert is already open, so only its pending flag carries the event
    let second = orchestrator.run(&parts_only()).unwrap();
    assert!(second.errors.is_empty());
    assert_eq!(second.risk_events_created, 1);
    assert_eq!(store.events().unwrap().len(), 1);

    let third = orchestrator.run(&parts_only()).unwrap();
    assert_eq!(third.risk_events_created, 0);
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    let build = || {
        let mut builder = many_suppliers(40);
        for part in 100..160u64 {
            builder = builder
                .part(part, "Part", Some(part % 4))
                .supplies(part % 40 + 1, part);
            if part % 3 == 0 {
                builder = builder.stock(part, 50.0);
            }
        }
        Arc::new(builder.build())
    };

    let parallel_store = build();
    let parallel = orchestrator(parallel_store.clone()).run(&Default::default()).unwrap();

    let sequential_store = build();
    let mut config = test_config();
    config.parallel.enabled = false;
    let sequential = orchestrator_with(sequential_store.clone(), config)
        .run(&Default::default())
        .unwrap();

    assert_eq!(parallel.suppliers_assessed, sequential.suppliers_assessed);
    assert_eq!(parallel.parts_assessed, 60);
    assert_eq!(parallel.parts_high_risk, sequential.parts_high_risk);
    assert_eq!(parallel.risk_events_created, sequential.risk_events_created);

    let levels = |store: &chainrisk::store::InMemoryStore| {
        store
            .part_risks()
            .unwrap()
            .iter()
            .map(|r| (r.part, r.combined_risk()))
            .collect::<Vec<_>>()
    };
    assert_eq!(levels(&parallel_store), levels(&sequential_store));
    // at most one open alert per entity
    let open: Vec<_> = parallel_store
        .alerts()
        .unwrap()
        .into_iter()
        .filter(|a| a.is_open())
        .map(|a| a.entity)
        .collect();
    let mut unique = open.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), open.len());
}

#[test]
fn test_timeout_skips_remaining_entities() {
    let store = Arc::new(many_suppliers(5).build());
    let mut config = test_config();
    config.run.timeout_seconds = Some(0);

    let summary = orchestrator_with(store.clone(), config)
        .run(&suppliers_only())
        .unwrap();

    assert_eq!(summary.skipped_by_timeout, 5);
    assert_eq!(summary.suppliers_assessed, 0);
    // nothing half-written
    assert!(store.supplier_risks().unwrap().is_empty());
}

#[test]
fn test_listener_reassesses_published_entities() {
    let store = Arc::new(
        StoreBuilder::new(today())
            .supplier(1, "Acme Castings", Some("DE"))
            .part(10, "Gearbox housing", None)
            .supplies(1, 10)
            .build(),
    );
    let (listener, publisher) = ReassessmentListener::new(Arc::new(orchestrator(store.clone())));
    let handle = listener.spawn();

    let writer = {
        let publisher = publisher.clone();
        std::thread::spawn(move || {
            for _ in 0..5 {
                publisher.publish(PartId(10)).unwrap();
            }
        })
    };
    publisher.publish(SupplierId(1)).unwrap();
    writer.join().unwrap();
    drop(publisher);

    let report = handle.join().unwrap();
    assert!(report.failures.is_empty());
    assert!(report.reassessed >= 2);

    let part = store.get_or_create_part_risk(PartId(10)).unwrap();
    assert_eq!(part.combined_risk(), 65);
    assert!(store.open_alert(EntityRef::Part(PartId(10))).unwrap().is_some());
    // reassessing the same state again never duplicates the event
    assert_eq!(store.events().unwrap().len(), 1);
}

#[test]
fn test_reassess_reports_outcome() {
    let store = Arc::new(
        StoreBuilder::new(today())
            .supplier(1, "Acme Castings", Some("DE"))
            .part(10, "Gearbox housing", None)
            .supplies(1, 10)
            .stock(10, 2.0)
            .low_stock_threshold(10, 5)
            .build(),
    );
    let outcome = orchestrator(store)
        .reassess(EntityRef::Part(PartId(10)))
        .unwrap();
    assert_eq!(
        outcome,
        EntityOutcome {
            high_risk: false,
            event_created: false,
            below_stock_threshold: true,
            recommendations: 0,
        }
    );
}
