// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single grid bucket and its per-cell collision queries.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::geom::{rect_contains_point, rects_intersect, segment_intersects_rect};
use crate::object::{Entry, GroupMask, ObjectId};

/// One bucket of the uniform grid.
///
/// Holds the arena slots of every object whose AABB overlaps the cell. Order is
/// unspecified and a slot appears at most once.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    objects: Vec<u32>,
}

impl Cell {
    /// Number of objects in this cell.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the cell holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn slots(&self) -> &[u32] {
        &self.objects
    }

    pub(crate) fn contains(&self, slot: u32) -> bool {
        self.objects.contains(&slot)
    }

    pub(crate) fn add_object(&mut self, slot: u32) {
        debug_assert!(!self.contains(slot), "object added twice to the same cell");
        self.objects.push(slot);
    }

    pub(crate) fn remove_object(&mut self, slot: u32) -> bool {
        if let Some(pos) = self.objects.iter().position(|&s| s == slot) {
            self.objects.swap_remove(pos);
            true
        } else {
            false
        }
    }

    pub(crate) fn remove_all(&mut self) {
        self.objects.clear();
    }

    /// Objects intersecting `aabb`, skipping `querying` itself.
    pub(crate) fn collisions<P>(
        &self,
        querying: u32,
        aabb: Rect,
        mask: GroupMask,
        entries: &mut [Option<Entry<P>>],
        stamp: u32,
        out: &mut Vec<ObjectId>,
    ) {
        self.gather(entries, stamp, mask, Some(querying), out, |r| {
            rects_intersect(r, aabb)
        });
    }

    pub(crate) fn query_rect<P>(
        &self,
        aabb: Rect,
        mask: GroupMask,
        entries: &mut [Option<Entry<P>>],
        stamp: u32,
        out: &mut Vec<ObjectId>,
    ) {
        self.gather(entries, stamp, mask, None, out, |r| rects_intersect(r, aabb));
    }

    pub(crate) fn query_point<P>(
        &self,
        p: Point,
        mask: GroupMask,
        entries: &mut [Option<Entry<P>>],
        stamp: u32,
        out: &mut Vec<ObjectId>,
    ) {
        self.gather(entries, stamp, mask, None, out, |r| rect_contains_point(r, p));
    }

    pub(crate) fn query_segment<P>(
        &self,
        p1: Point,
        p2: Point,
        mask: GroupMask,
        entries: &mut [Option<Entry<P>>],
        stamp: u32,
        out: &mut Vec<ObjectId>,
    ) {
        self.gather(entries, stamp, mask, None, out, |r| {
            segment_intersects_rect(p1, p2, r)
        });
    }

    /// Shared scan: report each matching object once per `stamp`.
    fn gather<P>(
        &self,
        entries: &mut [Option<Entry<P>>],
        stamp: u32,
        mask: GroupMask,
        skip: Option<u32>,
        out: &mut Vec<ObjectId>,
        hit: impl Fn(Rect) -> bool,
    ) {
        for &slot in &self.objects {
            if skip == Some(slot) {
                continue;
            }
            let Some(Some(entry)) = entries.get_mut(slot as usize) else {
                continue;
            };
            if entry.stamp == stamp || !entry.object.group_mask.admits(mask) {
                continue;
            }
            if hit(entry.object.aabb) {
                entry.stamp = stamp;
                out.push(ObjectId::new(slot, entry.generation));
            }
        }
    }
}
