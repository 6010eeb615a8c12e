use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use zkp_commitment_tree::{
    Accumulator, FieldElement, HashOracle, MimcSponge, ZeroTable, DEFAULT_TREE_DEPTH,
};

fn leaves(count: u64) -> Vec<FieldElement> {
    (0..count).map(FieldElement::from).collect()
}

fn bench_mimc_hash2(c: &mut Criterion) {
    let sponge = MimcSponge::new();
    let a = FieldElement::from(1);
    let b = FieldElement::from(2);

    c.bench_function("mimc_hash2", |bencher| {
        bencher.iter(|| black_box(sponge.hash2(black_box(&a), black_box(&b)).unwrap()))
    });
}

fn bench_zero_table(c: &mut Criterion) {
    let sponge = MimcSponge::new();

    c.bench_function("zero_table_default_depth", |bencher| {
        bencher.iter(|| black_box(ZeroTable::build(DEFAULT_TREE_DEPTH, &sponge).unwrap()))
    });
}

fn bench_root(c: &mut Criterion) {
    let accumulator = Accumulator::new(DEFAULT_TREE_DEPTH, Arc::new(MimcSponge::new())).unwrap();
    let mut group = c.benchmark_group("root");

    for leaf_count in [1u64, 16, 128, 1024].iter() {
        let set = leaves(*leaf_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(leaf_count),
            leaf_count,
            |bencher, _| bencher.iter(|| black_box(accumulator.root(&set).unwrap())),
        );
    }

    group.finish();
}

fn bench_root_and_path(c: &mut Criterion) {
    let accumulator = Accumulator::new(DEFAULT_TREE_DEPTH, Arc::new(MimcSponge::new())).unwrap();
    let mut group = c.benchmark_group("root_and_path");

    for leaf_count in [16u64, 128, 1024].iter() {
        let set = leaves(*leaf_count);
        let target = FieldElement::from(leaf_count - 1);
        group.bench_with_input(
            BenchmarkId::from_parameter(leaf_count),
            leaf_count,
            |bencher, _| {
                bencher.iter(|| black_box(accumulator.root_and_path(&set, &target).unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_path_verification(c: &mut Criterion) {
    let accumulator = Accumulator::new(DEFAULT_TREE_DEPTH, Arc::new(MimcSponge::new())).unwrap();
    let set = leaves(64);
    let target = FieldElement::from(17);
    let witness = accumulator.root_and_path(&set, &target).unwrap();
    let verifier = accumulator.verifier();

    c.bench_function("path_verification", |bencher| {
        bencher.iter(|| {
            black_box(
                verifier
                    .verify(&target, &witness.path, &witness.root)
                    .unwrap(),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_mimc_hash2,
    bench_zero_table,
    bench_root,
    bench_root_and_path,
    bench_path_verification
);
criterion_main!(benches);
