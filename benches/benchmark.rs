use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hicmc_rs::balance;
use hicmc_rs::distance::gen_dist_mat;
use hicmc_rs::domain;
use hicmc_rs::matrix::Matrix;
use hicmc_rs::relayout::transform_diagonal;
use hicmc_rs::statistics::average;

fn sample_matrix(n: usize) -> Matrix<f64> {
    let mut m = Matrix::<f64>::new(n, n);
    for i in 0..n {
        for j in 0..n {
            let dist = (i as i64 - j as i64).unsigned_abs() as f64;
            m.set(i, j, 1.0 + dist * 0.37);
        }
    }
    m
}

fn benchmark_diagonal_relayout(c: &mut Criterion) {
    let m = sample_matrix(512);
    c.bench_function("diagonal_relayout_512", |b| {
        b.iter(|| black_box(transform_diagonal(black_box(&m))))
    });
}

fn benchmark_domain_model_build(c: &mut Criterion) {
    let n = 512;
    let balanced = sample_matrix(n);
    let dist_mat = gen_dist_mat(n);
    let boundaries: Vec<usize> = (1..8).map(|i| i * n / 8).collect();
    let d = boundaries.len() + 1;
    let mask = Matrix::<bool>::new(d, d);

    c.bench_function("domain_model_build_512", |b| {
        b.iter(|| {
            black_box(
                domain::build_model(black_box(&balanced), black_box(&dist_mat), &boundaries, average, &mask).unwrap(),
            )
        })
    });
}

fn benchmark_balance(c: &mut Criterion) {
    let n = 512;
    let c_mat = sample_matrix(n);
    let weights = vec![1.0; n];
    c.bench_function("balance_512", |b| {
        b.iter(|| black_box(balance::balance(black_box(&c_mat), black_box(&weights)).unwrap()))
    });
}

criterion_group!(benches, benchmark_diagonal_relayout, benchmark_domain_model_build, benchmark_balance);
criterion_main!(benches);
