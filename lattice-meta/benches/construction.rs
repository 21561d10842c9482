//! Benchmarks for object construction and accessor dispatch.
//!
//! Run with: cargo bench -p lattice-meta

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lattice_meta::{Class, Value};
use std::hint::black_box;

/// A chain of `depth` classes, each declaring `width` properties, one alias
/// per property and one handler per notifier.
fn make_hierarchy(depth: usize, width: usize) -> Class {
    let mut class = Class::root("Level0");
    for level in 0..depth {
        if level > 0 {
            class = class.subclass(format!("Level{level}"));
        }
        for i in 0..width {
            let name = format!("p{level}_{i}");
            class.property(&name, i as i64).unwrap();
            class.alias_property(&format!("{name}_alias"), &name).unwrap();
            class.on_changed(&name, |_, _| {}).unwrap();
        }
    }
    class.seal().unwrap();
    class
}

fn bench_construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("meta/construct");

    for (depth, width) in [(1, 4), (4, 4), (8, 8)] {
        let class = make_hierarchy(depth, width);
        group.bench_with_input(
            BenchmarkId::new("instantiate", format!("{depth}x{width}")),
            &class,
            |b, class| b.iter(|| black_box(class.instantiate().unwrap())),
        );
    }

    group.finish();
}

fn bench_accessors(c: &mut Criterion) {
    let mut group = c.benchmark_group("meta/accessors");
    let class = make_hierarchy(4, 4);
    let object = class.instantiate().unwrap();

    group.bench_function("get_alias", |b| {
        b.iter(|| black_box(object.get(black_box("p0_0_alias")).unwrap()))
    });

    let mut next = 0i64;
    group.bench_function("set_notify", |b| {
        b.iter(|| {
            next += 1;
            black_box(object.set("p3_3", Value::Int(next)).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_construct, bench_accessors);
criterion_main!(benches);
