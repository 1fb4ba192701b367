use criterion::{criterion_group, criterion_main, Criterion};
use merkle_forest::{
    config::BusTreeConfig, BusLedger, BusTree, FieldElement, Poseidon, SparseMerkleTree,
    TreeOfTrees, TAXI_ZERO_LEAF,
};
use sha2::Sha256;

pub fn generate_random_leaf() -> FieldElement {
    FieldElement::from(rand::random::<u64>())
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("Leaf Insertion");

    // Benchmark appending to a sparse tree, every append rebuilds the layers
    group.bench_function("Sparse Tree SHA-256", |b| {
        b.iter(|| {
            let mut tree = SparseMerkleTree::<Sha256>::empty(16, TAXI_ZERO_LEAF).unwrap();
            for _ in 0..100 {
                tree.add_leaf(generate_random_leaf(), false).unwrap();
            }
        })
    });

    group.bench_function("Sparse Tree Poseidon", |b| {
        b.iter(|| {
            let mut tree = SparseMerkleTree::<Poseidon>::empty(16, TAXI_ZERO_LEAF).unwrap();
            for _ in 0..100 {
                tree.add_leaf(generate_random_leaf(), false).unwrap();
            }
        })
    });

    // Benchmark tree of trees insertion
    group.bench_function("Tree Of Trees", |b| {
        b.iter(|| {
            let mut tree = TreeOfTrees::<Sha256>::new(vec![], 8, 8, TAXI_ZERO_LEAF).unwrap();
            for _ in 0..100 {
                tree.add_leaf(generate_random_leaf()).unwrap();
            }
        })
    });

    // Benchmark bus tree pack insertion
    group.bench_function("Bus Tree Packs", |b| {
        let config = BusTreeConfig::new(2, 10, 26);
        b.iter(|| {
            let mut ledger = BusLedger::new();
            for pack in 0..100 {
                let leaves = (0..4).map(|_| generate_random_leaf()).collect();
                BusTree::<Sha256>::new(pack * 4, leaves, &mut ledger, &config).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_insertion);
criterion_main!(benches);
