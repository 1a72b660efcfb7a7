use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2, Axis};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tabular_trainer::training::{
    evaluate_models, LassoRegression, ModelRegistry, Regressor, RidgeRegression, TrainTestSplit,
};

fn create_regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);

    // Target as sum of features + noise
    let y = x.map_axis(Axis(1), |row| row.sum()) + Array1::from_shape_fn(n_rows, |_| rng.gen::<f64>() * 0.1);
    (x, y)
}

fn create_split(n_rows: usize, n_features: usize) -> TrainTestSplit {
    let (x, y) = create_regression_data(n_rows, n_features);
    let n_train = n_rows * 7 / 10;
    TrainTestSplit::new(
        x.slice(ndarray::s![..n_train, ..]).to_owned(),
        y.slice(ndarray::s![..n_train]).to_owned(),
        x.slice(ndarray::s![n_train.., ..]).to_owned(),
        y.slice(ndarray::s![n_train..]).to_owned(),
    )
    .unwrap()
}

fn bench_evaluate_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_models");
    group.sample_size(10);

    for n_rows in [1000, 5000, 10000].iter() {
        let split = create_split(*n_rows, 10);

        group.bench_with_input(BenchmarkId::new("all_candidates", n_rows), &split, |b, split| {
            b.iter(|| {
                let mut models = ModelRegistry::candidates();
                evaluate_models(black_box(split), &mut models).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_single_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    let (x, y) = create_regression_data(5000, 20);

    group.bench_function("ridge", |b| {
        b.iter(|| {
            let mut model = RidgeRegression::default();
            model.fit(black_box(&x), black_box(&y)).unwrap();
        })
    });

    group.bench_function("lasso", |b| {
        b.iter(|| {
            let mut model = LassoRegression::default();
            model.fit(black_box(&x), black_box(&y)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate_models, bench_single_models);
criterion_main!(benches);
