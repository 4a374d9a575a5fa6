// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A school of fish drifting around a tank.
//!
//! Each frame moves every fish, bounces it off the tank walls, then runs a
//! broad-phase collision pass over the grid.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p shoal_demos --example swarm_collisions`

use kurbo::{Rect, Vec2};
use shoal_partition::{Object, ObjectId, PartitionConfig, SpacePartition};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FISH: usize = 200;
const FRAMES: usize = 60;

struct Fish {
    velocity: Vec2,
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        ((x >> 11) as f64) / ((1u64 << 53) as f64)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let tank = Rect::new(0.0, 0.0, 1280.0, 720.0);
    let mut sp = SpacePartition::build(PartitionConfig::new(tank, 16, 9)).expect("valid config");
    let mut rng = Rng(0x0F15_4F15_4F15_4F15);

    let school: Vec<ObjectId> = (0..FISH)
        .map(|_| {
            let x = rng.next_f64() * (tank.width() - 24.0);
            let y = rng.next_f64() * (tank.height() - 12.0);
            let velocity = Vec2::new(rng.next_f64() * 8.0 - 4.0, rng.next_f64() * 4.0 - 2.0);
            sp.insert(Object::new(Rect::new(x, y, x + 24.0, y + 12.0), Fish { velocity }))
        })
        .collect();

    let mut hits = Vec::new();
    for frame in 0..FRAMES {
        for &id in &school {
            let Some(aabb) = sp.object(id).map(|o| o.aabb()) else {
                continue;
            };
            let Some(fish) = sp.payload_mut(id) else {
                continue;
            };
            let next = aabb + fish.velocity;
            if next.x0 < tank.x0 || next.x1 > tank.x1 {
                fish.velocity.x = -fish.velocity.x;
            }
            if next.y0 < tank.y0 || next.y1 > tank.y1 {
                fish.velocity.y = -fish.velocity.y;
            }
            let v = fish.velocity;
            sp.translate_object(id, v).expect("registered");
        }

        let mut contacts = 0;
        for &id in &school {
            sp.intersections(id, &mut hits).expect("live handle");
            contacts += hits.len();
        }
        if frame % 10 == 0 {
            // Each contact is seen from both sides.
            info!(frame, pairs = contacts / 2, "collision pass");
        }
    }
}
