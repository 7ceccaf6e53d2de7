use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use inventree::{Inventory, Record};

// Utility function for creating an inventory to use with benchmarks
fn create_inventory(size: usize) -> (Inventory, Vec<String>) {
    let mut inventory = Inventory::new();
    let mut keys = Vec::with_capacity(size);
    for _i in 0..size {
        let key = format!("E{:08}", rand::thread_rng().gen_range(0..100_000_000));
        let record = Record::new("2024-06-01", "New", "Honda", key.clone(), "On-hand");
        if inventory.add(record).is_ok() {
            keys.push(key);
        }
    }
    (inventory, keys)
}

fn inventree_add_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_delete");
    for size in [64, 128, 256, 512, 1024, 2048, 4096, 8192].iter() {
        let (mut inventory, keys) = create_inventory(*size);
        group.bench_with_input(
            BenchmarkId::new("inventree add_delete", size),
            &keys,
            |b, keys| {
                b.iter(|| {
                    let key = &keys[rand::thread_rng().gen_range(0..keys.len())];
                    if let Ok(record) = inventory.delete(key) {
                        let _ = inventory.add(record);
                    }
                })
            },
        );
    }
}

fn inventree_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for size in [64, 128, 256, 512, 1024, 2048, 4096, 8192].iter() {
        let (inventory, keys) = create_inventory(*size);
        group.bench_with_input(BenchmarkId::new("inventree get", size), &keys, |b, keys| {
            b.iter(|| {
                let key = &keys[rand::thread_rng().gen_range(0..keys.len())];
                let _ = inventory.get(key);
            })
        });
    }
}

fn inventree_list_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_sorted");
    for size in [64, 512, 4096].iter() {
        let (inventory, _keys) = create_inventory(*size);
        group.bench_function(BenchmarkId::new("inventree list_sorted", size), |b| {
            b.iter(|| inventory.list_sorted().len())
        });
    }
}

criterion_group!(
    benches,
    inventree_add_delete,
    inventree_get,
    inventree_list_sorted
);
criterion_main!(benches);
