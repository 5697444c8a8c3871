use criterion::{Criterion, criterion_group, criterion_main};
use matheval_core::{Context, compile};
use std::hint::black_box;

// Benchmark compiling (lex + parse + lowering) in isolation.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("compile_quadratic_formula", |b| {
        b.iter(|| compile(black_box("(-b + sqrt(b^2 - 4*a*c)) / (2*a)")))
    });

    group.bench_function("compile_option_payoff", |b| {
        b.iter(|| compile(black_box("max(spot - strike, 0) * discount")))
    });

    group.bench_function("compile_short_formula", |b| b.iter(|| compile(black_box("x + y * 2"))));

    group.finish();
}

// Benchmark single-context evaluation of a pre-compiled Program.
fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let quadratic = compile("(-b + sqrt(b^2 - 4*a*c)) / (2*a)").expect("valid formula");
    let mut ctx = Context::new();
    ctx.set("a", 1.0);
    ctx.set("b", -5.0);
    ctx.set("c", 6.0);

    group.bench_function("eval_quadratic_formula", |b| {
        b.iter(|| black_box(&quadratic).eval(black_box(&ctx)))
    });

    let payoff = compile("max(spot - strike, 0) * discount").expect("valid formula");
    let mut payoff_ctx = Context::new();
    payoff_ctx.set("spot", 105.0);
    payoff_ctx.set("strike", 100.0);
    payoff_ctx.set("discount", 0.97);

    group.bench_function("eval_option_payoff", |b| {
        b.iter(|| black_box(&payoff).eval(black_box(&payoff_ctx)))
    });

    group.finish();
}

// Benchmark batch evaluation at a few representative sizes.
fn bench_eval_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval_batch");

    let payoff = compile("max(spot - strike, 0) * discount").expect("valid formula");

    for size in [100usize, 10_000] {
        let vectors: Vec<Vec<f64>> = (0..size)
            .map(|i| vec![90.0 + (i % 30) as f64, 100.0, 0.97])
            .collect();

        group.bench_function(format!("eval_batch_option_payoff_{size}"), |b| {
            b.iter(|| black_box(&payoff).eval_batch(black_box(&vectors)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_eval, bench_eval_batch);
criterion_main!(benches);
