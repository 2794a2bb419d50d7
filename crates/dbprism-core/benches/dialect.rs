//! Benchmarks for dialect rewriting: pagination, count wrapping and
//! parameter placeholder rewriting.
//!
//! These run on every user query, so regressions in the text scanning or the
//! placeholder regex show up here first.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dbprism_core::dialect::SqlServerDialect;
use dbprism_core::{dialect_for, Backend, Parameters, SqlDialect};

/// Queries of increasing size, all ending in ORDER BY.
fn sample_queries() -> Vec<(&'static str, String)> {
    let wide_select = (0..60)
        .map(|i| format!("o.column_{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        ("short", "SELECT * FROM orders ORDER BY id".to_string()),
        (
            "joined",
            "SELECT o.id, o.total, c.name\n  FROM orders AS o\n  INNER JOIN customers AS c ON c.id = o.customer_id\n WHERE o.total > @min_total AND c.region = @region\n ORDER BY o.created_at DESC, o.id"
                .to_string(),
        ),
        (
            "wide",
            format!("SELECT {wide_select} FROM orders AS o WHERE o.status = @status ORDER BY o.id"),
        ),
    ]
}

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialect/paginate");
    let queries = sample_queries();

    for backend in Backend::ALL {
        let dialect = dialect_for(backend);
        for (label, sql) in &queries {
            group.bench_with_input(
                BenchmarkId::new(backend.to_string(), label),
                sql,
                |b, sql| {
                    b.iter(|| dialect.paginate(sql, 3, 50));
                },
            );
        }
    }

    // ROW_NUMBER() wrapping does the most text surgery.
    let legacy = SqlServerDialect::legacy();
    for (label, sql) in &queries {
        group.bench_with_input(BenchmarkId::new("sqlserver_legacy", label), sql, |b, sql| {
            b.iter(|| legacy.paginate(sql, 3, 50));
        });
    }
    group.finish();
}

fn bench_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialect/count");
    let dialect = dialect_for(Backend::PostgreSql);

    for (label, sql) in sample_queries() {
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::new("postgres", label), &sql, |b, sql| {
            b.iter(|| dialect.count(sql));
        });
    }
    group.finish();
}

fn bench_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialect/parameters");

    let mut parameters = Parameters::new();
    parameters
        .add("@min_total", 100.5)
        .add("@region", "EMEA")
        .add("@status", "open");

    for backend in [Backend::PostgreSql, Backend::Sqlite, Backend::SqlServer] {
        let dialect = dialect_for(backend);
        for (label, sql) in sample_queries() {
            group.bench_with_input(
                BenchmarkId::new(format!("normalize/{backend}"), label),
                &sql,
                |b, sql| {
                    b.iter(|| dialect.normalize_sql(sql, &parameters));
                },
            );
            group.bench_with_input(
                BenchmarkId::new(format!("inline/{backend}"), label),
                &sql,
                |b, sql| {
                    b.iter(|| dialect.inline_parameters(sql, &parameters));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_paginate, bench_count, bench_parameters);
criterion_main!(benches);
