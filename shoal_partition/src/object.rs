// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Objects tracked by the partition: handles, group masks, and per-object state.

use kurbo::{Point, Rect};

use crate::mapping::GridRect;

/// Handle to an object stored in a [`SpacePartition`](crate::SpacePartition).
///
/// A small, copyable slot index plus generation counter.
///
/// ## Semantics
///
/// - [`create_object`](crate::SpacePartition::create_object) allocates a slot; a fresh slot starts at generation `1`.
/// - [`destroy_object`](crate::SpacePartition::destroy_object) frees the slot; existing handles to it become stale.
/// - Reusing a freed slot increments its generation, so stale handles never alias a new object.
///   A slot that reaches the last generation is retired rather than reused.
///
/// Liveness ([`is_alive`](crate::SpacePartition::is_alive)) is separate from
/// registration ([`exists`](crate::SpacePartition::exists)): a live object may be
/// detached from the grid and re-added later.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Collision-group bitmask.
    ///
    /// Queries admit an object when `object_mask & query_mask` is non-empty. Every
    /// bit pattern is valid; the named groups are only conveniences.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GroupMask: u32 {
        /// First collision group.
        const GROUP_0 = 1 << 0;
        /// Second collision group.
        const GROUP_1 = 1 << 1;
        /// Third collision group.
        const GROUP_2 = 1 << 2;
        /// Fourth collision group.
        const GROUP_3 = 1 << 3;

        // Caller-defined groups use the remaining bits.
        const _ = !0;
    }
}

impl Default for GroupMask {
    fn default() -> Self {
        Self::all()
    }
}

impl GroupMask {
    /// Whether an object carrying `self` passes a query filtered by `query`.
    #[inline]
    pub fn admits(self, query: Self) -> bool {
        self.intersects(query)
    }
}

/// A client-side object: an AABB, a collision-group mask, and a user payload.
///
/// Build one with [`Object::new`] and hand it to
/// [`SpacePartition::create_object`](crate::SpacePartition::create_object) or
/// [`SpacePartition::insert`](crate::SpacePartition::insert). Once stored, the
/// AABB only changes through the partition's move operations so that cell
/// membership stays in sync.
#[derive(Clone, Debug, PartialEq)]
pub struct Object<P> {
    pub(crate) group_mask: GroupMask,
    pub(crate) aabb: Rect,
    pub(crate) payload: P,
}

impl<P> Object<P> {
    /// Create an object in every collision group.
    ///
    /// The AABB is normalized so that `x0 <= x1` and `y0 <= y1`.
    pub fn new(aabb: Rect, payload: P) -> Self {
        Self {
            group_mask: GroupMask::all(),
            aabb: aabb.abs(),
            payload,
        }
    }

    /// Set the collision-group mask.
    #[must_use]
    pub fn with_group_mask(mut self, group_mask: GroupMask) -> Self {
        self.group_mask = group_mask;
        self
    }

    /// Collision-group mask.
    pub fn group_mask(&self) -> GroupMask {
        self.group_mask
    }

    /// World-space AABB.
    pub fn aabb(&self) -> Rect {
        self.aabb
    }

    /// Position of the object: the top-left (minimum) corner of its AABB.
    pub fn position(&self) -> Point {
        self.aabb.origin()
    }

    /// User payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consume the object and return its payload.
    pub fn into_payload(self) -> P {
        self.payload
    }
}

/// Arena slot: the object plus the bookkeeping only the partition touches.
#[derive(Clone, Debug)]
pub(crate) struct Entry<P> {
    pub(crate) generation: u32,
    pub(crate) object: Object<P>,
    /// Position in the dense registry; `None` while unregistered.
    pub(crate) registry_slot: Option<u32>,
    /// Cells currently holding this object; `None` when in no cell.
    pub(crate) cells: Option<GridRect>,
    /// Last query pass that reported this object.
    pub(crate) stamp: u32,
}

impl<P> Entry<P> {
    pub(crate) fn new(generation: u32, object: Object<P>) -> Self {
        Self {
            generation,
            object,
            registry_slot: None,
            cells: None,
            stamp: 0,
        }
    }
}
