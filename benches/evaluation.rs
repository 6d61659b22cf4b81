use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evalexpr::{
    build_operator_tree, ContextWithMutableVariables, DefaultNumericTypes, HashMapContext,
};
use rand::distr::{Alphanumeric, SampleString};
use rand::Rng;
use std::collections::HashMap;
use threshold_eval::{Evaluator, Value, Variables};

fn random_variables(count: usize) -> Vec<Variables> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            HashMap::from([
                ("var1".to_string(), Value::from(rng.random_range(-10.0..10.0))),
                ("var2".to_string(), Value::from(rng.random_range(0.0..10.0))),
                (
                    "label".to_string(),
                    Value::from(Alphanumeric.sample_string(&mut rng, 8)),
                ),
            ])
        })
        .collect()
}

/// Benchmark evaluation of pre-parsed expressions of growing complexity
fn benchmark_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Expression Evaluation");
    let samples = random_variables(64);

    let cases = [
        ("ref_only", "var1"),
        ("simple", "var1 + 1"),
        ("add_compare", "1.0 <= var1 + var2 <= 5"),
        ("rate", "rate(var1, var2) > 0.5"),
        (
            "full",
            r#"if(regexp_match(as_string(label), "^[A-M]"), coalesce(as_numeric(var1), 10.0), rate(var1, var2)) * (5.5 + 4.5)"#,
        ),
    ];

    for (name, expression) in cases {
        let evaluator = Evaluator::new(expression).unwrap();
        group.bench_function(name, |b| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % samples.len();
                black_box(evaluator.eval(black_box(&samples[i])))
            })
        });
    }

    group.bench_function("parse_full", |b| {
        b.iter(|| Evaluator::new(black_box("1.0 <= var1 <= 5 && rate(var1, var2) > 0.5")))
    });

    group.bench_function("batch_64", |b| {
        let evaluator = Evaluator::new("(var1 + 0.5) * var2 > 3").unwrap();
        b.iter(|| black_box(evaluator.eval_batch(black_box(&samples))))
    });

    group.finish();
}

/// Compare against evalexpr on the same arithmetic
fn benchmark_evalexpr_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Baseline");

    let expr = "(var1 + 0.5) * var2";
    let evaluator = Evaluator::new(expr).unwrap();
    let variables = HashMap::from([
        ("var1".to_string(), Value::from(0.5)),
        ("var2".to_string(), Value::from(3.0)),
    ]);

    let precompiled_evalexpr = build_operator_tree::<DefaultNumericTypes>(expr).unwrap();
    let mut context = HashMapContext::<DefaultNumericTypes>::new();
    context
        .set_value("var1".to_string(), evalexpr::Value::Float(0.5))
        .unwrap();
    context
        .set_value("var2".to_string(), evalexpr::Value::Float(3.0))
        .unwrap();

    group.bench_function("threshold_eval", |b| {
        b.iter(|| evaluator.eval(black_box(&variables)).unwrap())
    });

    group.bench_function("precompiled_evalexpr", |b| {
        b.iter(|| precompiled_evalexpr.eval_with_context(black_box(&context)).unwrap())
    });

    group.bench_function("native_rust", |b| {
        b.iter(|| black_box((black_box(0.5) + 0.5) * black_box(3.0)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_expressions, benchmark_evalexpr_baseline);
criterion_main!(benches);
