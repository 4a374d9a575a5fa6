// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition basics.
//!
//! Build a grid, insert a few objects, move one, and run each query kind.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p shoal_demos --example partition_basics`

use kurbo::{Point, Rect, Vec2};
use shoal_partition::{GroupMask, Object, ObjectId, PartitionConfig, SpacePartition};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cfg = PartitionConfig::new(Rect::new(0.0, 0.0, 1024.0, 768.0), 7, 4);
    let mut sp = SpacePartition::build(cfg).expect("valid config");
    println!(
        "world {}x{}, {}x{} cells of {:.1}x{:.1}",
        sp.world_x_size(),
        sp.world_y_size(),
        sp.num_cells_x(),
        sp.num_cells_y(),
        sp.cell_x_size(),
        sp.cell_y_size()
    );

    let player = sp.insert(Object::new(Rect::new(39.0, 39.0, 41.0, 44.0), "player"));
    let wall = sp.insert(Object::new(Rect::new(40.0, 40.0, 600.0, 600.0), "wall"));
    let coin = sp.insert(Object::new(Rect::new(900.0, 100.0, 920.0, 120.0), "coin"));

    let mut hits = Vec::new();
    sp.intersections(player, &mut hits).expect("live handle");
    println!("player touches: {:?}", names(&sp, &hits));
    assert_eq!(hits, [wall]);

    // Walk the player over to the coin.
    sp.translate_object(player, Vec2::new(865.0, 70.0)).expect("registered");
    sp.intersections(player, &mut hits).expect("live handle");
    println!("player touches: {:?}", names(&sp, &hits));
    assert_eq!(hits, [coin]);

    sp.query_point(Point::new(300.0, 300.0), GroupMask::all(), &mut hits);
    println!("at (300, 300): {:?}", names(&sp, &hits));

    sp.query_segment(
        Point::new(0.0, 0.0),
        Point::new(1024.0, 120.0),
        GroupMask::all(),
        &mut hits,
    );
    println!("along the ray: {:?}", names(&sp, &hits));

    // Shove the coin off the world on both axes; it stays registered but untracked.
    sp.translate_object(coin, Vec2::new(4096.0, 4096.0)).expect("registered");
    println!(
        "coin exists: {}, tracked: {}",
        sp.exists(coin),
        sp.is_tracked(coin)
    );
}

fn names(sp: &SpacePartition<&'static str>, ids: &[ObjectId]) -> Vec<&'static str> {
    ids.iter().filter_map(|&id| sp.payload(id).copied()).collect()
}
