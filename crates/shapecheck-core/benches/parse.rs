use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shapecheck_core::{parse, Value};

const CONTRACTS: &[&str] = &[
    "(str,) -> str",
    "(int:str, int) -> [int]?",
    "([(int, str)], {str}, (int,) -> str) -> (str,) -> {int:[str]}",
];

fn bench_parse(c: &mut Criterion) {
    for text in CONTRACTS {
        c.bench_function(&format!("parse {}", text), |b| {
            b.iter(|| parse(black_box(text)).unwrap())
        });
    }
}

fn bench_check(c: &mut Criterion) {
    let schema = parse("([int], int:str) -> int").unwrap();
    let good = Value::tuple([
        Value::list((0..1000i64).map(Value::from)),
        Value::dict((0..100i64).map(|i| (Value::from(i), Value::from(i.to_string())))),
    ]);
    let bad = Value::tuple([
        Value::list((0..1000i64).map(Value::from).chain([Value::from("x")])),
        Value::dict([]),
    ]);
    c.bench_function("check match", |b| {
        b.iter(|| schema.check_input(black_box(&good)))
    });
    c.bench_function("check mismatch", |b| {
        b.iter(|| schema.check_input(black_box(&bad)))
    });
}

criterion_group!(benches, bench_parse, bench_check);
criterion_main!(benches);
