use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use stationmap::{resolve_latest, MeasurementRecord, Variable};

const STATION: &str = "WS1";
const RECORDS: usize = 10_000;

fn catalog() -> Vec<Variable> {
    ["temp", "rh", "wind", "rain"]
        .iter()
        .map(|name| Variable {
            id: STATION.to_string(),
            name: name.to_string(),
            long_name: name.to_uppercase(),
            unit: "u".to_string(),
        })
        .collect()
}

fn flat_series() -> Vec<MeasurementRecord> {
    (0..RECORDS)
        .map(|i| {
            serde_json::from_value(json!({
                "timestamp": "2024-01-01T00:00:00Z",
                "temp": i, "rh": i, "wind": i, "rain": i,
            }))
            .unwrap()
        })
        .collect()
}

fn tuple_series() -> Vec<MeasurementRecord> {
    let names = ["temp", "rh", "wind", "rain"];
    (0..RECORDS)
        .map(|i| {
            serde_json::from_value(json!({
                "ts": format!("2024-01-{:02}T{:02}:00", 1 + (i / 24) % 28, i % 24),
                "var_id": names[i % names.len()],
                "value": i,
            }))
            .unwrap()
        })
        .collect()
}

fn bench_resolve_latest(c: &mut Criterion) {
    let variables = catalog();
    let flat = flat_series();
    let tuple = tuple_series();

    c.bench_function("resolve_latest_flat", |b| {
        b.iter(|| resolve_latest(black_box(STATION), &variables, &flat))
    });
    c.bench_function("resolve_latest_tuple", |b| {
        b.iter(|| resolve_latest(black_box(STATION), &variables, &tuple))
    });
}

criterion_group!(benches, bench_resolve_latest);
criterion_main!(benches);
