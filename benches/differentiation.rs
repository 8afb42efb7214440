//! Differentiation Benchmark
//!
//! Builds wide sums of mixed terms (N >= 100) and deep composition chains,
//! then measures differentiation, evaluation and rendering separately.

use criterion::{Criterion, criterion_group, criterion_main};
use diffable_fn::{Diff, Expr, add, compose, div, mul, sub};
use std::hint::black_box;

// =============================================================================
// Expression Generators
// =============================================================================

/// One term of the mixed sum; cycles through every family and operation
fn mixed_term(i: usize) -> Expr {
    let k = i as f64;
    match i % 5 {
        // k*x^(k mod 10 + 1)
        0 => {
            let mut coefficients = vec![0.0; i % 10 + 2];
            coefficients[0] = k;
            Expr::polynomial(coefficients).unwrap()
        }
        // sin(kx) * cos(x)
        1 => mul(
            Expr::sine(1.0)
                .unwrap()
                .compose(&Expr::polynomial([k, 0.0]).unwrap()),
            Expr::cosine(1.0).unwrap(),
        )
        .unwrap(),
        // e^(x/k) + ln(x^2 + k)
        2 => add(
            Expr::exponential(1.0, std::f64::consts::E)
                .unwrap()
                .compose(&Expr::polynomial([1.0 / k, 0.0]).unwrap()),
            Expr::logarithm(std::f64::consts::E)
                .unwrap()
                .compose(&Expr::polynomial([1.0, 0.0, k]).unwrap()),
        )
        .unwrap(),
        // (x^2 + k) / (x + k)
        3 => div(
            Expr::polynomial([1.0, 0.0, k]).unwrap(),
            Expr::polynomial([1.0, k]).unwrap(),
        )
        .unwrap(),
        // sin(e^x + k)
        4 => compose(
            Expr::sine(1.0).unwrap(),
            add(
                Expr::exponential(1.0, std::f64::consts::E).unwrap(),
                Expr::polynomial([k]).unwrap(),
            )
            .unwrap(),
        )
        .unwrap(),
        _ => unreachable!(),
    }
}

/// Sum/difference of `n` mixed terms
fn generate_mixed(n: usize) -> Expr {
    let mut expr = mixed_term(1);
    for i in 2..=n {
        expr = if i % 3 == 1 {
            sub(expr, mixed_term(i)).unwrap()
        } else {
            add(expr, mixed_term(i)).unwrap()
        };
    }
    expr
}

/// cos(cos(...cos(x^2 + 1)...)) with `depth` composite compose nodes
fn generate_chain(depth: usize) -> Expr {
    let mut expr = Expr::polynomial([1.0, 0.0, 1.0]).unwrap();
    for _ in 0..depth {
        expr = compose(Expr::cosine(1.0).unwrap(), expr).unwrap();
    }
    expr
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_mixed_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_sum_100");
    group.sample_size(20);

    let mixed = generate_mixed(100);
    let derivative = mixed.differentiate().unwrap();

    group.bench_function("differentiate", |b| {
        b.iter(|| black_box(&mixed).differentiate())
    });

    group.bench_function("evaluate", |b| {
        b.iter(|| black_box(&mixed).evaluate(black_box(2.5)))
    });

    group.bench_function("evaluate_derivative", |b| {
        b.iter(|| black_box(&derivative).evaluate(black_box(2.5)))
    });

    group.bench_function("render_derivative", |b| {
        b.iter(|| black_box(&derivative).render())
    });

    group.finish();
}

fn bench_composition_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("composition_chain");

    for depth in [8usize, 32, 128] {
        let chain = generate_chain(depth);

        group.bench_function(format!("differentiate_depth_{}", depth), |b| {
            b.iter(|| black_box(&chain).differentiate())
        });

        group.bench_function(format!("second_derivative_depth_{}", depth), |b| {
            b.iter(|| Diff::new().order(2).derivative_at(black_box(&chain), 0.5))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mixed_sum, bench_composition_chain);

criterion_main!(benches);
