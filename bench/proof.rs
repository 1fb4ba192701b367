use criterion::{black_box, criterion_group, criterion_main, Criterion};
use merkle_forest::{FieldElement, Poseidon, Proof, SparseMerkleTree, TAXI_ZERO_LEAF};
use sha2::Sha256;

pub fn generate_random_leaf() -> FieldElement {
    FieldElement::from(rand::random::<u64>())
}

fn setup_trees(num_leaves: usize) -> (SparseMerkleTree<Sha256>, SparseMerkleTree<Poseidon>) {
    let leaves: Vec<_> = (0..num_leaves).map(|_| generate_random_leaf()).collect();
    let sha_tree = SparseMerkleTree::new(leaves.clone(), 20, TAXI_ZERO_LEAF).unwrap();
    let poseidon_tree = SparseMerkleTree::new(leaves, 20, TAXI_ZERO_LEAF).unwrap();
    (sha_tree, poseidon_tree)
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof Generation");

    // Setup trees with 100 leaves
    let (sha_tree, poseidon_tree) = setup_trees(100);

    group.bench_function("SHA-256 Tree", |b| {
        b.iter(|| {
            for index in 0..100 {
                black_box(sha_tree.merkle_proof(index)).unwrap();
            }
        })
    });

    group.bench_function("Poseidon Tree", |b| {
        b.iter(|| {
            for index in 0..100 {
                black_box(poseidon_tree.merkle_proof(index)).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof Verification");

    // Setup trees with 100 leaves
    let (sha_tree, poseidon_tree) = setup_trees(100);
    let sha_proofs: Vec<Proof> = (0..100).map(|i| sha_tree.merkle_proof(i).unwrap()).collect();
    let poseidon_proofs: Vec<Proof> = (0..100)
        .map(|i| poseidon_tree.merkle_proof(i).unwrap())
        .collect();

    group.bench_function("SHA-256 Tree", |b| {
        b.iter(|| {
            for (index, proof) in sha_proofs.iter().enumerate() {
                let leaf = sha_tree.leaf(index).unwrap();
                assert!(black_box(sha_tree.verify_merkle_proof(leaf, index, proof)).unwrap());
            }
        })
    });

    group.bench_function("Poseidon Tree", |b| {
        b.iter(|| {
            for (index, proof) in poseidon_proofs.iter().enumerate() {
                let leaf = poseidon_tree.leaf(index).unwrap();
                assert!(black_box(poseidon_tree.verify_merkle_proof(leaf, index, proof)).unwrap());
            }
        })
    });

    group.finish();
}

fn bench_proof_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("Proof Compression");

    let (sha_tree, _) = setup_trees(100);
    let proof = sha_tree.merkle_proof(42).unwrap();

    group.bench_function("Compress", |b| {
        b.iter(|| black_box(proof.compress(sha_tree.default_hashes())))
    });

    let compressed = proof.compress(sha_tree.default_hashes());
    group.bench_function("Decompress", |b| {
        b.iter(|| black_box(compressed.decompress(sha_tree.default_hashes())).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_proof_generation,
    bench_proof_verification,
    bench_proof_compression
);
criterion_main!(benches);
