// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_partition::{
    Aabb2D, BoundingBoxElement, BoundingBoxPartitioning, FlatVec, KdTree, PartitionConfig,
};

fn gen_grid_elements(n: usize, cell: f64) -> Vec<BoundingBoxElement<u32, f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            let key = (y * n + x) as u32;
            out.push(BoundingBoxElement::new(
                key,
                Aabb2D::<f64>::from_xywh(x0, y0, cell, cell),
            ));
        }
    }
    out
}

fn gen_grid_elements_i64(n: usize, cell: i64) -> Vec<BoundingBoxElement<u32, i64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let key = (y * n + x) as u32;
            out.push(BoundingBoxElement::new(
                key,
                Aabb2D::<i64>::from_xywh(x as i64 * cell, y as i64 * cell, cell, cell),
            ));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_elements(
    count: usize,
    max_w: f64,
    max_h: f64,
    rect_w: f64,
    rect_h: f64,
    seed: u64,
) -> Vec<BoundingBoxElement<u32, f64>> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for key in 0..count {
        let x0 = rng.next_f64() * (max_w - rect_w).max(1.0);
        let y0 = rng.next_f64() * (max_h - rect_h).max(1.0);
        out.push(BoundingBoxElement::new(
            key as u32,
            Aabb2D::<f64>::from_xywh(x0, y0, rect_w, rect_h),
        ));
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[32usize, 64, 128] {
        let elements = gen_grid_elements(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("kdtree_grid_n{}", n), |b| {
            b.iter_batched(
                KdTree::<u32, f64>::new,
                |mut tree| {
                    tree.add_or_update_elements(&elements);
                    let hits = tree
                        .elements_in_region(Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0), true)
                        .len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("flatvec_grid_n{}", n), |b| {
            b.iter_batched(
                FlatVec::<u32, f64>::new,
                |mut flat| {
                    flat.add_or_update_elements(&elements);
                    let hits = flat
                        .elements_in_region(Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0), true)
                        .len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let elements = gen_random_elements(16_384, 4000.0, 4000.0, 16.0, 16.0, 0xA1B2_C3D4_E5F6_0718);
    let tree = KdTree::from_elements(PartitionConfig::default(), &elements);
    let mut flat = FlatVec::<u32, f64>::new();
    flat.add_or_update_elements(&elements);

    let mut out = Vec::new();
    group.bench_function("kdtree_region_overlap", |b| {
        b.iter(|| {
            out.clear();
            tree.elements_in_region_into(
                Aabb2D::<f64>::from_xywh(1800.0, 1800.0, 400.0, 400.0),
                true,
                &mut out,
            );
            black_box(out.len());
        })
    });
    group.bench_function("kdtree_region_contained", |b| {
        b.iter(|| {
            out.clear();
            tree.elements_in_region_into(
                Aabb2D::<f64>::from_xywh(1800.0, 1800.0, 400.0, 400.0),
                false,
                &mut out,
            );
            black_box(out.len());
        })
    });
    group.bench_function("flatvec_region_overlap", |b| {
        b.iter(|| {
            out.clear();
            flat.elements_in_region_into(
                Aabb2D::<f64>::from_xywh(1800.0, 1800.0, 400.0, 400.0),
                true,
                &mut out,
            );
            black_box(out.len());
        })
    });

    let mut rng = Rng::new(0x5EED_5EED_5EED_5EED);
    group.bench_function("kdtree_point", |b| {
        b.iter(|| {
            out.clear();
            let (x, y) = (rng.next_f64() * 4000.0, rng.next_f64() * 4000.0);
            tree.elements_at_position_into(x, y, &mut out);
            black_box(out.len());
        })
    });
    group.bench_function("flatvec_point", |b| {
        b.iter(|| {
            out.clear();
            let (x, y) = (rng.next_f64() * 4000.0, rng.next_f64() * 4000.0);
            flat.elements_at_position_into(x, y, &mut out);
            black_box(out.len());
        })
    });
    group.finish();
}

fn bench_update_heavy_kdtree_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy_kdtree_i64");
    let elements = gen_grid_elements_i64(64, 10);
    // Move 1%, 10%, and 90% of the elements one cell to the right.
    for &percent in &[1usize, 10, 90] {
        let moved: Vec<_> = elements
            .iter()
            .take(elements.len() * percent / 100)
            .map(|e| {
                let b = *e.bounding_box();
                BoundingBoxElement::new(
                    *e.key(),
                    Aabb2D::new(b.min_x + 10, b.min_y, b.max_x + 10, b.max_y),
                )
            })
            .collect();
        group.throughput(Throughput::Elements(moved.len() as u64));
        group.bench_function(format!("move_{}pct", percent), |b| {
            b.iter_batched(
                || KdTree::from_elements(PartitionConfig::default(), &elements),
                |mut tree| {
                    tree.add_or_update_elements(&moved);
                    black_box(tree.len());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_remove_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    let elements = gen_random_elements(8192, 2000.0, 2000.0, 12.0, 12.0, 0x0BAD_5EED_0BAD_5EED);
    for &percent in &[1usize, 25, 90] {
        let keys: Vec<u32> = (0..(8192 * percent / 100) as u32).collect();
        group.bench_function(format!("kdtree_{}pct", percent), |b| {
            b.iter_batched(
                || KdTree::from_elements(PartitionConfig::default(), &elements),
                |mut tree| {
                    tree.remove_elements(&keys);
                    black_box(tree.len());
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_function(format!("kdtree_always_rebuild_{}pct", percent), |b| {
            let config = PartitionConfig::default().with_remove_rebuild_threshold(f64::MIN_POSITIVE);
            b.iter_batched(
                || KdTree::from_elements(config, &elements),
                |mut tree| {
                    tree.remove_elements(&keys);
                    black_box(tree.len());
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_queries,
    bench_update_heavy_kdtree_i64,
    bench_remove_fallback,
);
criterion_main!(benches);
