// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Vec2};
use shoal_partition::{GroupMask, Object, ObjectId, PartitionConfig, SpacePartition};

const WORLD: Rect = Rect::new(0.0, 0.0, 2048.0, 2048.0);

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

fn gen_random_rects(count: usize, size: f64, seed: u64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(seed);
    for _ in 0..count {
        let x0 = rng.next_f64() * (WORLD.width() - size);
        let y0 = rng.next_f64() * (WORLD.height() - size);
        out.push(Rect::new(x0, y0, x0 + size, y0 + size));
    }
    out
}

fn gen_velocities(count: usize, speed: f64) -> Vec<Vec2> {
    let mut rng = Rng::new(0x5EED_1234_ABCD_0001);
    (0..count)
        .map(|_| Vec2::new((rng.next_f64() - 0.5) * speed, (rng.next_f64() - 0.5) * speed))
        .collect()
}

fn populated(cells: usize, rects: &[Rect]) -> (SpacePartition<u32>, Vec<ObjectId>) {
    let mut sp = SpacePartition::build(PartitionConfig::new(WORLD, cells, cells))
        .expect("valid bench config");
    let ids = rects
        .iter()
        .enumerate()
        .map(|(i, &r)| sp.insert(Object::new(r, i as u32)))
        .collect();
    (sp, ids)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1_000usize, 10_000] {
        let rects = gen_random_rects(n, 12.0, 0xBADC_F00D_1234_5678);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_n{}", n), |b| {
            b.iter_batched(
                || {
                    SpacePartition::<u32>::build(PartitionConfig::new(WORLD, 32, 32))
                        .expect("valid bench config")
                },
                |mut sp| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = sp.insert(Object::new(r, i as u32));
                    }
                    black_box(sp.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let n = 2_000usize;
    let rects = gen_random_rects(n, 16.0, 0xC1A5_7E55_9999_ABCD);
    let vel = gen_velocities(n, 8.0);
    for &cells in &[8usize, 32, 64] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("move_and_collide_cells{}", cells), |b| {
            b.iter_batched(
                || populated(cells, &rects),
                |(mut sp, ids)| {
                    let mut hits = Vec::new();
                    let mut total = 0usize;
                    for (&id, &v) in ids.iter().zip(&vel) {
                        sp.translate_object(id, v).expect("registered");
                    }
                    for &id in &ids {
                        sp.intersections(id, &mut hits).expect("live handle");
                        total += hits.len();
                    }
                    black_box(total);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let rects = gen_random_rects(5_000, 10.0, 0xFACE_FEED_CAFE_BABE);
    let (mut sp, _) = populated(32, &rects);
    let mut rng = Rng::new(0x0DDB_A11C_0FFE_E000);
    let probes: Vec<Point> = (0..256)
        .map(|_| Point::new(rng.next_f64() * 2048.0, rng.next_f64() * 2048.0))
        .collect();
    let mut out = Vec::new();

    group.bench_function("query_rect_256", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for p in &probes {
                let area = Rect::from_origin_size(*p, (128.0, 128.0));
                sp.query_rect(area, GroupMask::all(), &mut out);
                total += out.len();
            }
            black_box(total)
        });
    });
    group.bench_function("query_point_256", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for p in &probes {
                sp.query_point(*p, GroupMask::all(), &mut out);
                total += out.len();
            }
            black_box(total)
        });
    });
    group.bench_function("query_segment_chain", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for pair in probes.windows(2) {
                sp.query_segment(pair[0], pair[1], GroupMask::all(), &mut out);
                total += out.len();
            }
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_frame, bench_queries);
criterion_main!(benches);
