//! Benchmarks for payload decoding and rendering.
//!
//! The raw fallback is the slowest path since every rule is tried before
//! the payload is re-serialized; the large expense list measures the cost
//! of rendering a long query result into one turn.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use tally_chat::ResponseInterpreter;

fn expense_list(count: usize) -> Value {
    let expenses: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": i,
                "timestamp": format!("2025-01-{:02}T00:00:00", i % 28 + 1),
                "amount": (i as f64) * 1.25,
                "description": format!("item {}", i),
                "category": if i % 3 == 0 { "food" } else { "" },
            })
        })
        .collect();
    json!({"action": "query_expenses", "expenses": expenses})
}

fn bench_interpret(c: &mut Criterion) {
    let interp = ResponseInterpreter::default();
    let mut group = c.benchmark_group("interpret");

    let recorded = json!({
        "action": "parse_expense",
        "expense": {"amount": 4, "timestamp": "2025-04-20", "description": "coffee", "category": "beverage"}
    });
    group.bench_function("parse_expense", |b| {
        b.iter(|| interp.interpret(black_box(&recorded)))
    });

    let raw = json!({"unexpected": {"nested": [1, 2, 3]}, "action": "teleport"});
    group.bench_function("raw_fallback", |b| {
        b.iter(|| interp.interpret(black_box(&raw)))
    });

    let list = expense_list(500);
    group.bench_function("query_expenses_500", |b| {
        b.iter(|| interp.interpret(black_box(&list)))
    });

    group.finish();
}

criterion_group!(benches, bench_interpret);
criterion_main!(benches);
