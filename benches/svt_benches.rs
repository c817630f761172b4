use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use svtarray::coo::svt_to_coo;
use svtarray::dense::{dense_to_svt, svt_to_dense, Dense};
use svtarray::dim::{Coord, Shape};
use svtarray::subassign::subassign_mindex;
use svtarray::value::{ElementKind, Value};

fn random_dense(seed: u64, shape: &Shape, density: f64) -> Dense {
    let mut rng = SmallRng::seed_from_u64(seed);
    let total = shape.total_len() as usize;
    let data: Vec<Value> = (0..total)
        .map(|_| {
            if rng.gen_bool(density) {
                Value::Integer(rng.gen_range(1..1000))
            } else {
                Value::Integer(0)
            }
        })
        .collect();
    Dense {
        shape: shape.clone(),
        kind: ElementKind::Integer,
        data,
    }
}

fn bench_nz_count(c: &mut Criterion) {
    let shape = Shape::new(vec![100, 100]).unwrap();
    let svt = dense_to_svt(random_dense(1, &shape, 0.05)).unwrap();
    c.bench_function("svt_nz_count_100x100_5pct", |b| {
        b.iter(|| black_box(svt.nz_count()))
    });
}

fn bench_svt_to_dense(c: &mut Criterion) {
    let shape = Shape::new(vec![100, 100]).unwrap();
    let svt = dense_to_svt(random_dense(2, &shape, 0.05)).unwrap();
    c.bench_function("svt_to_dense_100x100_5pct", |b| {
        b.iter(|| black_box(svt_to_dense(&svt).unwrap()))
    });
}

fn bench_svt_to_coo(c: &mut Criterion) {
    let shape = Shape::new(vec![100, 100]).unwrap();
    let svt = dense_to_svt(random_dense(3, &shape, 0.05)).unwrap();
    c.bench_function("svt_to_coo_100x100_5pct", |b| {
        b.iter(|| black_box(svt_to_coo(&svt).unwrap()))
    });
}

fn bench_subassign_lindex_small_batch(c: &mut Criterion) {
    let shape = Shape::new(vec![100, 100]).unwrap();
    let svt = dense_to_svt(random_dense(4, &shape, 0.05)).unwrap();
    let mindex: Vec<Coord> = vec![1, 1, 50, 50, 99, 99];
    let values = vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)];
    c.bench_function("subassign_mindex_3_updates_100x100", |b| {
        b.iter(|| black_box(subassign_mindex(&svt, &mindex, &values).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_nz_count,
    bench_svt_to_dense,
    bench_svt_to_coo,
    bench_subassign_lindex_small_batch
);
criterion_main!(benches);
