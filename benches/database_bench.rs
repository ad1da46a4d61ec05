//! Benchmarks for snapdb database operations

use criterion::{criterion_group, criterion_main, Criterion};
use snapdb::{Database, Value};
use tempfile::TempDir;

fn record(age: i64) -> Value {
    Value::record([("name", Value::from("bench")), ("age", Value::from(age))])
}

fn database_benchmarks(c: &mut Criterion) {
    // Insert throughput (every insert rewrites the full snapshot)
    c.bench_function("insert", |b| {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("bench.db")).unwrap();
        let mut i = 0u64;
        b.iter(|| {
            db.insert(&format!("key{}", i), record(i as i64 % 100)).unwrap();
            i += 1;
        });
    });

    // Point read from a populated store
    c.bench_function("get", |b| {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("bench.db")).unwrap();
        for i in 0..1000i64 {
            db.insert(&format!("key{}", i), record(i % 100)).unwrap();
        }
        b.iter(|| db.get("key500"));
    });

    // Indexed lookup vs. a full predicate scan over the same data
    c.bench_function("find_by_field", |b| {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("bench.db")).unwrap();
        for i in 0..1000i64 {
            db.insert(&format!("key{}", i), record(i % 100)).unwrap();
        }
        db.build_index("age").unwrap();
        b.iter(|| db.find_by_field("age", &Value::Int(42)));
    });

    c.bench_function("query_scan", |b| {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("bench.db")).unwrap();
        for i in 0..1000i64 {
            db.insert(&format!("key{}", i), record(i % 100)).unwrap();
        }
        b.iter(|| db.query(|v| v.field("age") == Some(&Value::Int(42))));
    });
}

criterion_group!(benches, database_benchmarks);
criterion_main!(benches);
