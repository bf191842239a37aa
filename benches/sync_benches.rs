//! Benchmarks for planning, conversion and full backups against the simulator.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use modbus_sync::{
    BackupOrchestrator, BatchPlanner, MemoryTransport, Parameter, ParameterCatalog,
    ParameterType, ReadRequest, SyncConfig, ValueCodec,
};

fn bench_plan(c: &mut Criterion) {
    let planner = BatchPlanner::default();
    let mut group = c.benchmark_group("plan");
    for count in [10u32, 1_000, 65_536] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                planner
                    .plan(black_box(ParameterType::HoldingRegister), 0, count, None)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let scale = BigDecimal::from_str("0.1").unwrap();
    let offset = BigDecimal::from_str("-40").unwrap();
    let codec = ValueCodec::new(Some(&scale), Some(&offset));
    let value = BigDecimal::from_str("21.5").unwrap();

    c.bench_function("decode", |b| b.iter(|| codec.decode(black_box(615))));
    c.bench_function("encode", |b| b.iter(|| codec.encode(black_box(&value)).unwrap()));
}

fn bench_backup(c: &mut Criterion) {
    let words: Vec<u16> = (0..1_000).collect();
    let catalog = ParameterCatalog::from_parameters((0..1_000u16).step_by(4).map(|address| {
        Parameter::new(ParameterType::HoldingRegister, address)
            .with_scale(BigDecimal::from_str("0.5").unwrap())
    }))
    .unwrap();
    let requests = vec![ReadRequest::new(ParameterType::HoldingRegister, 0, 1_000).unwrap()];

    c.bench_function("backup_1000_registers", |b| {
        b.iter(|| {
            let mut slave = MemoryTransport::new();
            slave.set_words(ParameterType::HoldingRegister, 0, &words);
            let mut sync = BackupOrchestrator::connect(slave, &SyncConfig::default()).unwrap();
            sync.run_backup(black_box(&requests), &catalog).unwrap()
        })
    });
}

criterion_group!(benches, bench_plan, bench_codec, bench_backup);
criterion_main!(benches);
