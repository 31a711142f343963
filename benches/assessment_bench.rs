use chainrisk::config::{ParallelConfig, RetryConfig, RiskConfig};
use chainrisk::core::FixedClock;
use chainrisk::orchestrator::{AssessmentOptions, Orchestrator};
use chainrisk::scoring::{FactorScore, PartRiskFlags, RiskAggregator, SupplierFactors};
use chainrisk::testkit::StoreBuilder;
use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// `suppliers` suppliers, each supplying ten parts with some order history.
fn generated_store(suppliers: u64) -> StoreBuilder {
    let mut builder = StoreBuilder::new(today()).category(1, "Castings");
    for supplier in 1..=suppliers {
        let country = ["DE", "CN", "RU", "US"][(supplier % 4) as usize];
        builder = builder.supplier(supplier, "Supplier", Some(country));
        for offset in 0..10 {
            let part = supplier * 10 + offset;
            builder = builder
                .part(part, "Part", Some(1))
                .supplies(supplier, part)
                .delivery(supplier, part, 30 + offset as i64, 10.0, offset % 3 == 0);
            if offset % 2 == 0 {
                builder = builder.stock(part, 25.0).supplies(supplier % suppliers + 1, part);
            }
        }
        builder = builder.open_order(supplier, supplier * 10, 5, 100.0, 80.0);
    }
    builder
}

fn orchestrator(store: StoreBuilder, parallel: ParallelConfig) -> Orchestrator {
    let config = RiskConfig {
        parallel,
        retry: RetryConfig::immediate(),
        ..Default::default()
    };
    Orchestrator::with_defaults(Arc::new(store.build()), Arc::new(config))
        .unwrap()
        .with_clock(Arc::new(FixedClock::at_date(today())))
}

fn benchmark_aggregator(c: &mut Criterion) {
    let aggregator = RiskAggregator::default();
    let factors: Vec<SupplierFactors> = (0..1000u32)
        .map(|i| SupplierFactors {
            financial: FactorScore::saturating(f64::from(i % 101)),
            delivery: FactorScore::saturating(f64::from((i * 7) % 101)),
            quality: FactorScore::saturating(f64::from((i * 13) % 101)),
            geographical: FactorScore::saturating(f64::from((i * 31) % 101)),
        })
        .collect();

    c.bench_function("aggregate_1000_suppliers", |b| {
        b.iter(|| {
            for f in &factors {
                black_box(aggregator.assess_supplier(black_box(*f)));
            }
        })
    });

    let flags = PartRiskFlags {
        single_source: true,
        long_lead_time: false,
        high_value: true,
    };
    c.bench_function("aggregate_part", |b| {
        b.iter(|| aggregator.assess_part(black_box(flags), black_box(FactorScore::MAX)))
    });
}

fn benchmark_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(20);

    for suppliers in [10u64, 50, 200] {
        group.bench_with_input(
            BenchmarkId::new("parallel", suppliers),
            &suppliers,
            |b, &suppliers| {
                b.iter_batched(
                    || orchestrator(generated_store(suppliers), ParallelConfig::default()),
                    |orchestrator| black_box(orchestrator.run(&AssessmentOptions::default())),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
        group.bench_with_input(
            BenchmarkId::new("sequential", suppliers),
            &suppliers,
            |b, &suppliers| {
                b.iter_batched(
                    || orchestrator(generated_store(suppliers), ParallelConfig::sequential()),
                    |orchestrator| black_box(orchestrator.run(&AssessmentOptions::default())),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_aggregator, benchmark_full_run);
criterion_main!(benches);
