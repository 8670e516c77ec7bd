use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vector_index::kdtree::KDTree;
use vector_index::{SpatialIndex, Vector};

const DIM: usize = 3;

fn load_data(n: usize) -> Vec<Vector<f64>> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..n)
        .map(|_| Vector::new((0..DIM).map(|_| rng.gen_range(-1000.0..1000.0)).collect()))
        .collect()
}

fn construct_kdtree(vectors: &[Vector<f64>]) -> KDTree<usize> {
    let mut tree = KDTree::with_capacity(DIM, vectors.len());
    for (i, v) in vectors.iter().enumerate() {
        tree.add(v, i).unwrap();
    }
    tree.build();
    tree
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let vectors = load_data(100_000);

    c.bench_function("construction (kdtree)", |b| {
        b.iter(|| construct_kdtree(&vectors))
    });

    let tree = construct_kdtree(&vectors);
    let probe = Vector::from([12.5, -340.0, 77.0]);

    c.bench_function("nearest (kdtree)", |b| {
        b.iter(|| tree.nearest_neighbor(&probe).unwrap())
    });

    c.bench_function("nearest 10 (kdtree)", |b| {
        b.iter(|| tree.nearest_neighbors(&probe, 10).unwrap())
    });

    c.bench_function("nearest (brute force)", |b| {
        b.iter(|| {
            vectors
                .iter()
                .map(|v| v.distance_prefix(&probe, DIM))
                .fold(f64::INFINITY, f64::min)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
