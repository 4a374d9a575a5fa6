// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of a 1024×768 world split into 7×4 cells.

use kurbo::{Point, Rect, Vec2};
use shoal_partition::{
    GroupMask, Object, ObjectId, PartitionConfig, PartitionError, SpacePartition,
};

const WORLD: Rect = Rect::new(0.0, 0.0, 1024.0, 768.0);

fn build() -> SpacePartition<usize> {
    SpacePartition::build(PartitionConfig::new(WORLD, 7, 4)).unwrap()
}

fn sorted(mut ids: Vec<ObjectId>) -> Vec<ObjectId> {
    ids.sort_unstable();
    ids
}

#[test]
fn build_reports_world_and_grid() {
    let sp = build();
    assert_eq!(sp.world_x_size(), 1024.0);
    assert_eq!(sp.world_y_size(), 768.0);
    assert_eq!(sp.num_cells_x(), 7);
    assert_eq!(sp.num_cells_y(), 4);
    assert!((sp.cell_y_size() - 192.0).abs() < 1e-9);
    assert_eq!(sp.matrix().len(), 28);
    assert!(sp.is_empty());
}

#[test]
fn build_rejects_bad_configs() {
    assert_eq!(
        SpacePartition::<()>::build(PartitionConfig::new(WORLD, 7, 0)).err(),
        Some(PartitionError::ZeroCellCount {
            cells_x: 7,
            cells_y: 0
        })
    );
    assert_eq!(
        SpacePartition::<()>::build(PartitionConfig::new(Rect::new(0.0, 0.0, 0.0, 5.0), 2, 2))
            .err(),
        Some(PartitionError::InvalidWorld)
    );
}

#[test]
fn add_remove_round_trip() {
    let mut sp = build();
    let ids: Vec<_> = (0..5)
        .map(|i| {
            let x = 100.0 * i as f64;
            sp.create_object(Object::new(Rect::new(x, x, x + 10.0, x + 10.0), i))
        })
        .collect();
    for &id in &ids {
        assert!(!sp.exists(id));
        sp.add_object(id).unwrap();
        assert!(sp.exists(id));
    }
    assert_eq!(sp.len(), 5);

    assert_eq!(sp.remove_object(ids[2]), Ok(true));
    assert!(!sp.exists(ids[2]));
    assert!(sp.is_alive(ids[2]), "removal keeps the object alive");
    // Removing again is a no-op.
    assert_eq!(sp.remove_object(ids[2]), Ok(false));
    assert_eq!(sp.len(), 4);

    sp.remove_all_objects();
    assert!(ids.iter().all(|&id| !sp.exists(id)));
    assert!(sp.is_empty());
    for row in 0..4 {
        for col in 0..7 {
            assert!(sp.matrix().cell(col, row).unwrap().is_empty());
        }
    }

    // Objects survive and can be re-registered.
    sp.add_object(ids[4]).unwrap();
    let mut out = Vec::new();
    sp.query_point(Point::new(405.0, 405.0), GroupMask::all(), &mut out);
    assert_eq!(out, [ids[4]]);
}

#[test]
fn move_there_and_back_restores_everything() {
    let mut sp = build();
    let mover = sp.insert(Object::new(Rect::new(100.0, 100.0, 180.0, 180.0), 0));
    let others: Vec<_> = [
        Rect::new(150.0, 150.0, 400.0, 200.0),
        Rect::new(0.0, 0.0, 110.0, 110.0),
        Rect::new(170.0, 0.0, 171.0, 768.0),
        Rect::new(700.0, 700.0, 720.0, 720.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, r)| sp.insert(Object::new(r, i + 1)))
    .collect();

    let mut before = Vec::new();
    sp.intersections(mover, &mut before).unwrap();
    let before = sorted(before);
    assert_eq!(before, sorted(others[..3].to_vec()));
    let cells_before = sp.occupied_cells(mover);

    let v = Vec2::new(537.5, 311.25);
    sp.translate_object(mover, v).unwrap();
    let mut moved = Vec::new();
    sp.intersections(mover, &mut moved).unwrap();
    assert_ne!(sorted(moved), before);

    sp.translate_object(mover, -v).unwrap();
    assert_eq!(
        sp.object(mover).unwrap().aabb(),
        Rect::new(100.0, 100.0, 180.0, 180.0)
    );
    assert_eq!(sp.occupied_cells(mover), cells_before);
    let mut after = Vec::new();
    sp.intersections(mover, &mut after).unwrap();
    assert_eq!(sorted(after), before);
}

#[test]
fn multi_cell_objects_are_reported_once() {
    let mut sp = build();
    // Both span every cell.
    let a = sp.insert(Object::new(Rect::new(10.0, 10.0, 1000.0, 750.0), 0));
    let b = sp.insert(Object::new(Rect::new(20.0, 20.0, 1010.0, 760.0), 1));
    let mut out = Vec::new();
    sp.intersections(a, &mut out).unwrap();
    assert_eq!(out, [b]);
    sp.query_rect(WORLD, GroupMask::all(), &mut out);
    assert_eq!(out.len(), 2);
    sp.query_segment(Point::new(0.0, 0.0), Point::new(1024.0, 768.0), GroupMask::all(), &mut out);
    assert_eq!(out.len(), 2);
}

#[test]
fn masks_filter_every_query() {
    let mut sp = build();
    let ships = sp.insert(
        Object::new(Rect::new(0.0, 0.0, 50.0, 50.0), 0).with_group_mask(GroupMask::GROUP_0),
    );
    let rocks = sp.insert(
        Object::new(Rect::new(0.0, 0.0, 50.0, 50.0), 1).with_group_mask(GroupMask::GROUP_1),
    );
    let both = sp.insert(Object::new(Rect::new(0.0, 0.0, 50.0, 50.0), 2));
    let area = Rect::new(10.0, 10.0, 20.0, 20.0);
    let mut out = Vec::new();

    sp.query_rect(area, GroupMask::GROUP_0, &mut out);
    assert_eq!(sorted(out.clone()), sorted(vec![ships, both]));

    sp.query_point(Point::new(5.0, 5.0), GroupMask::GROUP_1, &mut out);
    assert_eq!(sorted(out.clone()), sorted(vec![rocks, both]));

    sp.query_rect(area, GroupMask::GROUP_3, &mut out);
    assert_eq!(out, [both]);

    sp.query_rect(area, GroupMask::empty(), &mut out);
    assert!(out.is_empty());

    sp.intersections_masked(both, GroupMask::GROUP_1, &mut out).unwrap();
    assert_eq!(out, [rocks]);

    sp.set_group_mask(rocks, GroupMask::GROUP_2).unwrap();
    sp.intersections_masked(both, GroupMask::GROUP_1, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn disjoint_then_overlapping() {
    let mut sp = build();
    let small = sp.insert(Object::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0));
    let other = sp.insert(Object::new(Rect::new(500.0, 500.0, 510.0, 510.0), 1));
    let mut out = Vec::new();
    sp.intersections(small, &mut out).unwrap();
    assert!(out.is_empty());
    sp.intersections(other, &mut out).unwrap();
    assert!(out.is_empty());

    sp.update_object(small, Rect::new(39.0, 39.0, 41.0, 44.0)).unwrap();
    sp.update_object(other, Rect::new(40.0, 40.0, 600.0, 600.0)).unwrap();
    sp.intersections(small, &mut out).unwrap();
    assert_eq!(out, [other]);
    sp.intersections(other, &mut out).unwrap();
    assert_eq!(out, [small]);
}

#[test]
fn shared_edge_counts_as_intersecting() {
    let mut sp = build();
    let a = sp.insert(Object::new(Rect::new(0.0, 0.0, 40.0, 40.0), 0));
    let b = sp.insert(Object::new(Rect::new(39.0, 40.0, 60.0, 60.0), 1));
    let mut out = Vec::new();
    sp.intersections(a, &mut out).unwrap();
    assert_eq!(out, [b]);
    sp.intersections(b, &mut out).unwrap();
    assert_eq!(out, [a]);
}

#[test]
fn chain_of_thirty_spreads_and_regathers() {
    const N: usize = 30;
    let mut sp = build();
    let ids: Vec<_> = (0..N)
        .map(|i| sp.insert(Object::new(Rect::new(0.0, 0.0, 5.0, 5.0), i)))
        .collect();
    let mut out = Vec::new();

    for &id in &ids {
        sp.intersections(id, &mut out).unwrap();
        assert_eq!(out.len(), N - 1);
        assert!(!out.contains(&id));
    }

    let step = |i: usize| Vec2::new(6.0 * i as f64, 6.0 * i as f64);
    for (i, &id) in ids.iter().enumerate() {
        sp.translate_object(id, step(i)).unwrap();
    }
    for &id in &ids {
        sp.intersections(id, &mut out).unwrap();
        assert!(out.is_empty(), "chain links must not touch");
    }

    for (i, &id) in ids.iter().enumerate() {
        sp.translate_object(id, -step(i)).unwrap();
    }
    for &id in &ids {
        sp.intersections(id, &mut out).unwrap();
        assert_eq!(out.len(), N - 1);
    }
}

#[test]
fn translation_far_outside_the_world() {
    let mut sp = build();
    let id = sp.insert(Object::new(Rect::new(10.0, 20.0, 40.0, 50.0), 0));
    let anchor = sp.insert(Object::new(Rect::new(0.0, 0.0, 100.0, 100.0), 1));
    let v = Vec2::new(4.0 * 1024.0, 4.0 * 768.0);

    sp.translate_object(id, v).unwrap();
    assert_eq!(
        sp.object(id).unwrap().aabb(),
        Rect::new(4106.0, 3092.0, 4136.0, 3122.0)
    );
    assert!(sp.exists(id));
    assert!(!sp.is_tracked(id));

    let mut out = Vec::new();
    sp.intersections(id, &mut out).unwrap();
    assert!(out.is_empty());
    sp.intersections(anchor, &mut out).unwrap();
    assert!(out.is_empty());
    sp.query_rect(Rect::new(4000.0, 3000.0, 5000.0, 4000.0), GroupMask::all(), &mut out);
    assert!(out.is_empty());

    sp.translate_object(id, -v).unwrap();
    assert!(sp.is_tracked(id));
    sp.intersections(anchor, &mut out).unwrap();
    assert_eq!(out, [id]);
}

#[test]
fn overhanging_objects_use_boundary_cells() {
    let mut sp = build();
    let edge = sp.insert(Object::new(Rect::new(-50.0, 700.0, 20.0, 900.0), 0));
    assert!(sp.is_tracked(edge));
    let cells = sp.occupied_cells(edge).unwrap();
    assert_eq!((cells.col_begin, cells.col_end), (0, 0));
    assert_eq!((cells.row_begin, cells.row_end), (3, 3));

    let huge = sp.insert(Object::new(Rect::new(-1e6, -1e6, 1e6, 1e6), 1));
    assert_eq!(sp.occupied_cells(huge).unwrap().cell_count(), 28);
}

#[test]
fn point_queries_outside_the_world() {
    let mut sp = build();
    let left = sp.insert(Object::new(Rect::new(-30.0, 100.0, 10.0, 140.0), 0));
    let mut out = Vec::new();

    // Outside on x only: the clamped boundary cell is probed.
    sp.query_point(Point::new(-10.0, 120.0), GroupMask::all(), &mut out);
    assert_eq!(out, [left]);

    // Containment still filters.
    sp.query_point(Point::new(-40.0, 120.0), GroupMask::all(), &mut out);
    assert!(out.is_empty());

    // Outside on both axes: nothing.
    sp.query_point(Point::new(-10.0, -10.0), GroupMask::all(), &mut out);
    assert!(out.is_empty());

    assert!(sp.is_point_inside(Point::new(1024.0, 768.0)));
    assert!(!sp.is_point_inside(Point::new(-10.0, 120.0)));
}

#[test]
fn segment_queries() {
    let mut sp = build();
    let a = sp.insert(Object::new(Rect::new(100.0, 100.0, 120.0, 120.0), 0));
    let b = sp.insert(Object::new(Rect::new(600.0, 600.0, 620.0, 620.0), 1));
    let c = sp.insert(Object::new(Rect::new(600.0, 100.0, 620.0, 120.0), 2));
    let mut out = Vec::new();

    // Diagonal through a and b, starting and ending outside the world.
    sp.query_segment(
        Point::new(-100.0, -100.0),
        Point::new(2000.0, 2000.0),
        GroupMask::all(),
        &mut out,
    );
    assert_eq!(sorted(out.clone()), sorted(vec![a, b]));

    // Horizontal, grazing the top edge of a and c.
    sp.query_segment(
        Point::new(0.0, 100.0),
        Point::new(1024.0, 100.0),
        GroupMask::all(),
        &mut out,
    );
    assert_eq!(sorted(out.clone()), sorted(vec![a, c]));

    // Degenerate segment behaves like a point.
    sp.query_segment(Point::new(610.0, 110.0), Point::new(610.0, 110.0), GroupMask::all(), &mut out);
    assert_eq!(out, [c]);

    // Beside the world: scans column 0, but nothing there reaches x = -50.
    sp.query_segment(
        Point::new(-50.0, 0.0),
        Point::new(-50.0, 768.0),
        GroupMask::all(),
        &mut out,
    );
    assert!(out.is_empty());

    // Outside the world on both axes.
    sp.query_segment(
        Point::new(-300.0, -50.0),
        Point::new(2000.0, -50.0),
        GroupMask::all(),
        &mut out,
    );
    assert!(out.is_empty());
}

#[test]
fn out_of_world_spot_is_consistent() {
    let mut sp = build();
    let left = sp.insert(Object::new(Rect::new(-30.0, 100.0, 10.0, 140.0), 0));
    // Lies wholly beside the world, left of column 0.
    let ghost = sp.insert(Object::new(Rect::new(-20.0, 115.0, -10.0, 125.0), 1));
    // Outside the world on both axes.
    let corner = sp.insert(Object::new(Rect::new(-20.0, -20.0, -10.0, -10.0), 2));
    assert!(sp.is_tracked(ghost));
    assert!(!sp.is_tracked(corner));
    let mut out = Vec::new();

    let spot = Point::new(-15.0, 120.0);
    let both = sorted(vec![left, ghost]);
    sp.query_point(spot, GroupMask::all(), &mut out);
    assert_eq!(sorted(out.clone()), both);
    sp.query_rect(Rect::new(-20.0, 115.0, -10.0, 125.0), GroupMask::all(), &mut out);
    assert_eq!(sorted(out.clone()), both);
    sp.query_rect(Rect::from_points(spot, spot), GroupMask::all(), &mut out);
    assert_eq!(sorted(out.clone()), both);
    sp.query_segment(spot, spot, GroupMask::all(), &mut out);
    assert_eq!(sorted(out.clone()), both);

    sp.intersections(left, &mut out).unwrap();
    assert_eq!(out, [ghost]);
    sp.intersections(ghost, &mut out).unwrap();
    assert_eq!(out, [left]);

    // The corner spot maps nowhere, whichever query asks.
    let spot = Point::new(-15.0, -15.0);
    sp.query_point(spot, GroupMask::all(), &mut out);
    assert!(out.is_empty());
    sp.query_rect(Rect::from_points(spot, spot), GroupMask::all(), &mut out);
    assert!(out.is_empty());
    sp.query_segment(spot, spot, GroupMask::all(), &mut out);
    assert!(out.is_empty());
    sp.intersections(corner, &mut out).unwrap();
    assert!(out.is_empty());

    // A segment crossing the corner into the strip only sees the strip part.
    sp.query_segment(Point::new(-15.0, -200.0), Point::new(-15.0, 120.0), GroupMask::all(), &mut out);
    assert_eq!(sorted(out), both);
}

#[test]
fn rebuild_keeps_registration_and_results() {
    let mut sp = build();
    let ids: Vec<_> = (0..10)
        .map(|i| {
            let x = 90.0 * i as f64;
            sp.insert(Object::new(Rect::new(x, 50.0, x + 100.0, 150.0), i))
        })
        .collect();
    let mut before = Vec::new();
    sp.query_rect(Rect::new(200.0, 0.0, 500.0, 768.0), GroupMask::all(), &mut before);

    sp.rebuild(PartitionConfig::new(WORLD, 16, 16)).unwrap();
    assert_eq!(sp.num_cells_x(), 16);
    assert_eq!(sp.len(), 10);
    assert!(ids.iter().all(|&id| sp.exists(id)));

    let mut after = Vec::new();
    sp.query_rect(Rect::new(200.0, 0.0, 500.0, 768.0), GroupMask::all(), &mut after);
    assert_eq!(sorted(after), sorted(before));
}

#[test]
fn stale_handles_are_rejected() {
    let mut sp = build();
    let a = sp.insert(Object::new(Rect::new(0.0, 0.0, 10.0, 10.0), 7));
    assert_eq!(sp.destroy_object(a).map(|o| o.into_payload()), Some(7));
    assert!(sp.destroy_object(a).is_none());
    let b = sp.insert(Object::new(Rect::new(0.0, 0.0, 10.0, 10.0), 8));

    let mut out = Vec::new();
    assert_eq!(sp.add_object(a), Err(PartitionError::UnknownObject(a)));
    assert_eq!(
        sp.intersections(a, &mut out),
        Err(PartitionError::UnknownObject(a))
    );
    assert_eq!(
        sp.set_object_position(a, Point::ZERO),
        Err(PartitionError::UnknownObject(a))
    );
    assert!(!sp.exists(a));
    assert_eq!(sp.payload(b), Some(&8));
    *sp.payload_mut(b).unwrap() += 1;
    assert_eq!(sp.payload(b), Some(&9));
}

#[test]
fn unregistered_objects_can_still_query() {
    let mut sp = build();
    let probe = sp.create_object(Object::new(Rect::new(0.0, 0.0, 30.0, 30.0), 0));
    let target = sp.insert(Object::new(Rect::new(20.0, 20.0, 40.0, 40.0), 1));
    let mut out = Vec::new();
    sp.intersections(probe, &mut out).unwrap();
    assert_eq!(out, [target]);
    // The probe is never found by others.
    sp.intersections(target, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn set_position_moves_the_top_left_corner() {
    let mut sp = build();
    let id = sp.insert(Object::new(Rect::new(10.0, 10.0, 30.0, 25.0), 0));
    sp.set_object_position(id, Point::new(500.0, 400.0)).unwrap();
    let obj = sp.object(id).unwrap();
    assert_eq!(obj.aabb(), Rect::new(500.0, 400.0, 520.0, 415.0));
    assert_eq!(obj.position(), Point::new(500.0, 400.0));
    let mut out = Vec::new();
    sp.query_point(Point::new(510.0, 410.0), GroupMask::all(), &mut out);
    assert_eq!(out, [id]);
}
