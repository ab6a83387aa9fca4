//! Benchmarks for path handling and end-to-end mapping
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use restruct_core::path::{extract_contexts, resolve, tokenize, Context, FieldPath};
use restruct_core::{Mapper, Schema};
use serde_json::{json, Value};

fn create_report(orders: usize, tests_per_order: usize) -> Value {
    let orders: Vec<Value> = (0..orders)
        .map(|o| {
            let tests: Vec<Value> = (0..tests_per_order)
                .map(|t| {
                    json!({
                        "code": format!("T{}", t),
                        "result": format!("{}.{}", o, t),
                        "flag": if t % 3 == 0 { Value::Null } else { json!("H") }
                    })
                })
                .collect();
            json!({
                "order_id": format!("O-{}", o),
                "placed": "2024-03-01T08:30:00Z",
                "meta": {"Special!": {"tags": [{"key": "x", "value": o}]}},
                "tests": tests
            })
        })
        .collect();
    json!({"client_id": "C-1", "orders": orders})
}

fn report_schema() -> Value {
    json!({
        "code": {"path": "orders.*.tests.*.code", "transform": ["toLowerCase", "prefix:lab-"]},
        "order": {"path": "orders.*.order_id"},
        "client": {"path": "client_id"},
        "value": {"path": "orders.*.tests.*.result", "transform": "toNumber", "default": 0},
        "flag": {"path": ["orders.*.tests.*.flag", "orders.*.flag"], "default": "N"},
        "tag": {"path": "orders.*.meta.['Special!'].tags[key=x].value"},
        "placed": {"path": "orders.*.placed", "transform": "toDateTime:YYYY-MM-DD"},
        "filter": {"all": [{"path": "orders.*.tests.*.flag", "exists": true}]}
    })
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    let paths = [
        "client_id",
        "orders.*.tests.*.code",
        "orders.*.meta.['Special!'].tags[key=x].value",
    ];
    for path in paths.iter() {
        group.bench_with_input(BenchmarkId::new("tokenize", path), path, |b, path| {
            b.iter(|| tokenize(black_box(path)));
        });
    }

    group.finish();
}

fn bench_extract_and_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_and_resolve");
    let source = create_report(50, 20);
    let canonical = FieldPath::parse("orders.*.tests.*.code");
    let selector = vec![FieldPath::parse("orders.*.meta.['Special!'].tags[key=x].value")];

    group.bench_function("extract_contexts", |b| {
        b.iter(|| extract_contexts(black_box(&source), &canonical).len());
    });

    let contexts: Vec<Context> = extract_contexts(&source, &canonical)
        .into_iter()
        .map(|extracted| extracted.context)
        .collect();
    group.bench_function("resolve_selector", |b| {
        b.iter(|| {
            contexts
                .iter()
                .filter(|context| resolve(black_box(&source), &selector, context).is_some())
                .count()
        });
    });

    group.finish();
}

fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping");
    let mapper = Mapper::default();
    let schema_doc = report_schema();
    let schema = Schema::parse(&schema_doc).expect("benchmark schema parses");

    for (orders, tests) in [(1, 5), (10, 10), (100, 20)] {
        let source = create_report(orders, tests);
        let name = format!("{}x{}", orders, tests);

        group.bench_with_input(BenchmarkId::new("map", &name), &source, |b, source| {
            b.iter(|| mapper.map(black_box(source), black_box(&schema_doc)));
        });
        group.bench_with_input(BenchmarkId::new("map_schema", &name), &source, |b, source| {
            b.iter(|| mapper.map_schema(black_box(source), &schema));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_extract_and_resolve, bench_mapping);
criterion_main!(benches);
