// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`SpacePartition`] façade: object lifecycle, moves, and queries.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use tracing::{debug, trace, warn};

use crate::config::PartitionConfig;
use crate::error::PartitionError;
use crate::geom::clip_segment;
use crate::mapping::{GridMapping, GridRect};
use crate::matrix::CellMatrix;
use crate::object::{Entry, GroupMask, Object, ObjectId};
use crate::walk::GridWalk;

/// Uniform-grid AABB index.
///
/// Objects live in an arena inside the partition and are addressed by
/// [`ObjectId`]. Registration is separate from storage: a live object can be
/// detached from the grid with [`remove_object`](Self::remove_object) and
/// re-added later with its AABB intact.
///
/// Every registered object occupies exactly the cells its AABB covers, clamped
/// into the grid. An AABB outside the world on both axes leaves the object
/// registered but in no cell ([`is_tracked`](Self::is_tracked) is false);
/// queries never report it. Points, rectangles, and segments outside the world
/// follow the same rule, so every query agrees at any given spot.
pub struct SpacePartition<P> {
    mapping: GridMapping,
    matrix: CellMatrix,
    entries: Vec<Option<Entry<P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Dense list of registered arena slots.
    registry: Vec<u32>,
    query_stamp: u32,
}

impl<P> core::fmt::Debug for SpacePartition<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("SpacePartition")
            .field("world", &self.mapping.world)
            .field("cols", &self.mapping.cols)
            .field("rows", &self.mapping.rows)
            .field("objects_alive", &alive)
            .field("registered", &self.registry.len())
            .field("query_stamp", &self.query_stamp)
            .finish_non_exhaustive()
    }
}

impl<P> SpacePartition<P> {
    /// Build a partition over `config.world` divided into
    /// `config.cells_x × config.cells_y` cells.
    ///
    /// # Errors
    ///
    /// Fails if the config does not [validate](PartitionConfig::validate).
    pub fn build(config: PartitionConfig) -> Result<Self, PartitionError> {
        config.validate()?;
        let mapping = GridMapping::new(config.world.abs(), config.cells_x, config.cells_y);
        let mut matrix = CellMatrix::new();
        matrix.create(mapping.rows, mapping.cols);
        debug!(
            world = ?mapping.world,
            cols = mapping.cols,
            rows = mapping.rows,
            scale_x = mapping.scale_x,
            scale_y = mapping.scale_y,
            "built space partition"
        );
        Ok(Self {
            mapping,
            matrix,
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            registry: Vec::new(),
            query_stamp: 0,
        })
    }

    /// Replace the grid and re-bucket every registered object.
    ///
    /// Registration and object handles survive; only cell membership is
    /// recomputed. On error the partition is left unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the config does not [validate](PartitionConfig::validate).
    pub fn rebuild(&mut self, config: PartitionConfig) -> Result<(), PartitionError> {
        config.validate()?;
        self.mapping = GridMapping::new(config.world.abs(), config.cells_x, config.cells_y);
        self.matrix.destroy();
        self.matrix.create(self.mapping.rows, self.mapping.cols);
        for &slot in &self.registry {
            let Some(entry) = self.entries[slot as usize].as_mut() else {
                continue;
            };
            entry.cells = self.mapping.cells_from_aabb(entry.object.aabb);
            if let Some(rect) = entry.cells {
                add_to_cells(&mut self.matrix, slot, rect, None);
            }
        }
        debug!(
            world = ?self.mapping.world,
            cols = self.mapping.cols,
            rows = self.mapping.rows,
            registered = self.registry.len(),
            "rebuilt space partition"
        );
        Ok(())
    }

    // --- geometry accessors ---

    /// World rectangle.
    pub fn world(&self) -> Rect {
        self.mapping.world
    }

    /// World width.
    pub fn world_x_size(&self) -> f64 {
        self.mapping.world.width()
    }

    /// World height.
    pub fn world_y_size(&self) -> f64 {
        self.mapping.world.height()
    }

    /// Width of one cell in world units.
    pub fn cell_x_size(&self) -> f64 {
        self.mapping.cell_size().0
    }

    /// Height of one cell in world units.
    pub fn cell_y_size(&self) -> f64 {
        self.mapping.cell_size().1
    }

    /// Number of grid columns.
    pub fn num_cells_x(&self) -> usize {
        self.mapping.cols
    }

    /// Number of grid rows.
    pub fn num_cells_y(&self) -> usize {
        self.mapping.rows
    }

    /// Whether `p` lies inside the world rectangle (edges included).
    pub fn is_point_inside(&self, p: Point) -> bool {
        self.mapping.contains_point(p)
    }

    /// Grid rectangle an AABB would occupy, or `None` if it is outside the
    /// world on both axes.
    pub fn cells_from_aabb(&self, aabb: Rect) -> Option<GridRect> {
        self.mapping.cells_from_aabb(aabb.abs())
    }

    /// Read-only view of the cell matrix.
    pub fn matrix(&self) -> &CellMatrix {
        &self.matrix
    }

    // --- object storage ---

    /// Store an object without registering it in the grid.
    pub fn create_object(&mut self, object: Object<P>) -> ObjectId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            self.entries[idx] = Some(Entry::new(generation, object));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(Entry::new(generation, object)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices by design."
            )]
            ((self.entries.len() - 1) as u32, generation)
        };
        ObjectId::new(idx, generation)
    }

    /// Store an object and register it in the grid.
    pub fn insert(&mut self, object: Object<P>) -> ObjectId {
        let id = self.create_object(object);
        self.register(id.idx());
        id
    }

    /// Unregister (if needed) and drop an object, returning it.
    ///
    /// The handle becomes stale. Returns `None` if it already was.
    pub fn destroy_object(&mut self, id: ObjectId) -> Option<Object<P>> {
        let idx = self.live_index(id).ok()?;
        self.unregister(idx);
        let entry = self.entries[idx].take()?;
        self.release(idx);
        Some(entry.object)
    }

    /// Drop every object and empty every cell. All handles become stale.
    pub fn clear(&mut self) {
        self.matrix.remove_all_objects();
        self.registry.clear();
        for idx in 0..self.entries.len() {
            if self.entries[idx].take().is_some() {
                self.release(idx);
            }
        }
        debug!("cleared space partition");
    }

    /// Whether `id` refers to a live object (registered or not).
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.live_index(id).is_ok()
    }

    /// Whether `id` is registered in the grid.
    ///
    /// Checks that the object's registry slot points back at the object.
    pub fn exists(&self, id: ObjectId) -> bool {
        let Ok(idx) = self.live_index(id) else {
            return false;
        };
        self.entries[idx]
            .as_ref()
            .and_then(|e| e.registry_slot)
            .is_some_and(|slot| self.registry.get(slot as usize) == Some(&id.0))
    }

    /// Whether `id` is registered and currently occupies at least one cell.
    pub fn is_tracked(&self, id: ObjectId) -> bool {
        self.occupied_cells(id).is_some()
    }

    /// Cells the object currently occupies.
    pub fn occupied_cells(&self, id: ObjectId) -> Option<GridRect> {
        let idx = self.live_index(id).ok()?;
        self.entries[idx].as_ref()?.cells
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no object is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered objects, in registry order.
    pub fn registered(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.registry.iter().filter_map(|&slot| self.id_of(slot))
    }

    /// The stored object behind `id`.
    pub fn object(&self, id: ObjectId) -> Option<&Object<P>> {
        let idx = self.live_index(id).ok()?;
        self.entries[idx].as_ref().map(|e| &e.object)
    }

    /// User payload of `id`.
    pub fn payload(&self, id: ObjectId) -> Option<&P> {
        self.object(id).map(Object::payload)
    }

    /// Mutable user payload of `id`.
    pub fn payload_mut(&mut self, id: ObjectId) -> Option<&mut P> {
        let idx = self.live_index(id).ok()?;
        self.entries[idx].as_mut().map(|e| &mut e.object.payload)
    }

    /// Change the collision-group mask of `id`.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle.
    pub fn set_group_mask(&mut self, id: ObjectId, mask: GroupMask) -> Result<(), PartitionError> {
        self.entry_mut(id)?.object.group_mask = mask;
        Ok(())
    }

    /// Objects stored in cell `(col, row)`.
    ///
    /// # Errors
    ///
    /// [`PartitionError::CellOutOfRange`] outside the grid.
    pub fn objects_in_cell(
        &self,
        col: usize,
        row: usize,
    ) -> Result<impl Iterator<Item = ObjectId> + '_, PartitionError> {
        let cell = self.matrix.cell(col, row)?;
        Ok(cell.slots().iter().filter_map(|&slot| self.id_of(slot)))
    }

    // --- registration ---

    /// Register `id` in the grid.
    ///
    /// Registering an already registered object does nothing.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle.
    pub fn add_object(&mut self, id: ObjectId) -> Result<(), PartitionError> {
        let idx = self.live_index(id)?;
        if self.entries[idx]
            .as_ref()
            .is_some_and(|e| e.registry_slot.is_some())
        {
            return Ok(());
        }
        self.register(idx);
        Ok(())
    }

    /// Remove `id` from the grid, keeping the object alive.
    ///
    /// Returns `false` (and does nothing) when it was not registered.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<bool, PartitionError> {
        let idx = self.live_index(id)?;
        Ok(self.unregister(idx))
    }

    /// Unregister every object and empty every cell. Objects stay alive.
    pub fn remove_all_objects(&mut self) {
        self.matrix.remove_all_objects();
        for &slot in &self.registry {
            if let Some(entry) = self.entries[slot as usize].as_mut() {
                entry.registry_slot = None;
                entry.cells = None;
            }
        }
        self.registry.clear();
    }

    // --- moves ---

    /// Move `id` so that the top-left corner of its AABB is at `pos`.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle,
    /// [`PartitionError::NotRegistered`] if the object is not in the grid.
    pub fn set_object_position(&mut self, id: ObjectId, pos: Point) -> Result<(), PartitionError> {
        self.move_object(id, |aabb| aabb.with_origin(pos))
    }

    /// Translate `id` by `delta`.
    ///
    /// The AABB moves exactly by `delta` even far outside the world; only cell
    /// membership is clamped.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle,
    /// [`PartitionError::NotRegistered`] if the object is not in the grid.
    pub fn translate_object(&mut self, id: ObjectId, delta: Vec2) -> Result<(), PartitionError> {
        self.move_object(id, |aabb| aabb + delta)
    }

    /// Replace the AABB of `id`.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle,
    /// [`PartitionError::NotRegistered`] if the object is not in the grid.
    pub fn update_object(&mut self, id: ObjectId, aabb: Rect) -> Result<(), PartitionError> {
        let aabb = aabb.abs();
        self.move_object(id, |_| aabb)
    }

    fn move_object(
        &mut self,
        id: ObjectId,
        apply: impl FnOnce(Rect) -> Rect,
    ) -> Result<(), PartitionError> {
        let idx = self.live_index(id)?;
        let Some(entry) = self.entries[idx].as_mut() else {
            return Err(PartitionError::UnknownObject(id));
        };
        if entry.registry_slot.is_none() {
            return Err(PartitionError::NotRegistered(id));
        }
        let before = entry.cells;
        entry.object.aabb = apply(entry.object.aabb);
        let after = self.mapping.cells_from_aabb(entry.object.aabb);
        entry.cells = after;
        reconcile(&mut self.matrix, id.0, before, after);

        trace!(?id, ?before, ?after, "moved object");
        match (before, after) {
            (Some(_), None) => debug!(?id, "object left the grid"),
            (None, Some(_)) => debug!(?id, "object entered the grid"),
            _ => {}
        }
        Ok(())
    }

    // --- queries ---

    /// Every other registered object whose AABB intersects the AABB of `id`.
    ///
    /// `out` is cleared first. Each object is reported once, in no particular
    /// order. `id` itself may be registered or merely alive.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle.
    pub fn intersections(
        &mut self,
        id: ObjectId,
        out: &mut Vec<ObjectId>,
    ) -> Result<(), PartitionError> {
        self.intersections_masked(id, GroupMask::all(), out)
    }

    /// Like [`intersections`](Self::intersections), keeping only objects that
    /// share a group with `mask`.
    ///
    /// # Errors
    ///
    /// [`PartitionError::UnknownObject`] for a stale handle.
    pub fn intersections_masked(
        &mut self,
        id: ObjectId,
        mask: GroupMask,
        out: &mut Vec<ObjectId>,
    ) -> Result<(), PartitionError> {
        out.clear();
        let idx = self.live_index(id)?;
        let Some(aabb) = self.entries[idx].as_ref().map(|e| e.object.aabb) else {
            return Err(PartitionError::UnknownObject(id));
        };
        if self.registry.is_empty() {
            return Ok(());
        }
        let Some(rect) = self.mapping.cells_from_aabb(aabb) else {
            return Ok(());
        };
        let stamp = self.next_stamp();
        for cell in self.matrix.cell_range(rect)? {
            cell.collisions(id.0, aabb, mask, &mut self.entries, stamp, out);
        }
        Ok(())
    }

    /// Registered objects in `mask` whose AABB intersects `aabb`.
    ///
    /// `out` is cleared first. An `aabb` outside the world on one axis scans
    /// the clamped boundary cells; outside on both axes yields nothing.
    pub fn query_rect(&mut self, aabb: Rect, mask: GroupMask, out: &mut Vec<ObjectId>) {
        out.clear();
        if self.registry.is_empty() {
            return;
        }
        let aabb = aabb.abs();
        let Some(rect) = self.mapping.cells_from_aabb(aabb) else {
            return;
        };
        let stamp = self.next_stamp();
        let Ok(cells) = self.matrix.cell_range(rect) else {
            return;
        };
        for cell in cells {
            cell.query_rect(aabb, mask, &mut self.entries, stamp, out);
        }
    }

    /// Registered objects in `mask` whose AABB contains `p`.
    ///
    /// `out` is cleared first. Only the cell holding `p` is scanned. A point
    /// outside the world on one axis scans the clamped boundary cell; outside
    /// on both axes yields nothing.
    pub fn query_point(&mut self, p: Point, mask: GroupMask, out: &mut Vec<ObjectId>) {
        out.clear();
        if self.registry.is_empty() {
            return;
        }
        let Some((col, row)) = self.mapping.cell_of_point(p) else {
            return;
        };
        let stamp = self.next_stamp();
        if let Ok(cell) = self.matrix.cell(col, row) {
            cell.query_point(p, mask, &mut self.entries, stamp, out);
        }
    }

    /// Registered objects in `mask` whose AABB touches the segment `p1`–`p2`.
    ///
    /// `out` is cleared first. Parts of the segment outside the world on both
    /// axes are ignored, matching [`query_point`](Self::query_point): a
    /// zero-length segment reports exactly what a point query there would.
    pub fn query_segment(&mut self, p1: Point, p2: Point, mask: GroupMask, out: &mut Vec<ObjectId>) {
        out.clear();
        if self.registry.is_empty() {
            return;
        }
        let stamp = self.next_stamp();
        if let Some((a, b)) = clip_segment(p1, p2, self.mapping.world) {
            let walk = GridWalk::new(
                self.mapping.to_grid(a),
                self.mapping.to_grid(b),
                self.mapping.cols,
                self.mapping.rows,
            );
            for (col, row) in walk {
                if let Ok(cell) = self.matrix.cell(col, row) {
                    cell.query_segment(a, b, mask, &mut self.entries, stamp, out);
                }
            }
        }
        // A piece beside the world clamps onto a single boundary column or row.
        for strip in self.mapping.side_strips() {
            let Some((a, b)) = clip_segment(p1, p2, strip) else {
                continue;
            };
            let Some(rect) = self.mapping.cells_from_aabb(Rect::from_points(a, b)) else {
                continue;
            };
            let Ok(cells) = self.matrix.cell_range(rect) else {
                continue;
            };
            for cell in cells {
                cell.query_segment(a, b, mask, &mut self.entries, stamp, out);
            }
        }
    }

    // --- internals ---

    fn live_index(&self, id: ObjectId) -> Result<usize, PartitionError> {
        match self.entries.get(id.idx()) {
            Some(Some(e)) if e.generation == id.1 => Ok(id.idx()),
            _ => Err(PartitionError::UnknownObject(id)),
        }
    }

    fn entry_mut(&mut self, id: ObjectId) -> Result<&mut Entry<P>, PartitionError> {
        let idx = self.live_index(id)?;
        self.entries[idx]
            .as_mut()
            .ok_or(PartitionError::UnknownObject(id))
    }

    fn id_of(&self, slot: u32) -> Option<ObjectId> {
        let entry = self.entries.get(slot as usize)?.as_ref()?;
        Some(ObjectId::new(slot, entry.generation))
    }

    /// Append `idx` to the registry and insert it into its covering cells.
    fn register(&mut self, idx: usize) {
        let Some(entry) = self.entries[idx].as_mut() else {
            return;
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "The registry never outgrows the 32-bit arena."
        )]
        let (slot, registry_slot) = (idx as u32, self.registry.len() as u32);
        entry.registry_slot = Some(registry_slot);
        self.registry.push(slot);
        entry.cells = self.mapping.cells_from_aabb(entry.object.aabb);
        if let Some(rect) = entry.cells {
            add_to_cells(&mut self.matrix, slot, rect, None);
        } else {
            debug!(slot, "registered object outside the world");
        }
        trace!(slot, cells = ?entry.cells, "registered object");
    }

    /// Swap-remove `idx` from the registry and from its cells.
    fn unregister(&mut self, idx: usize) -> bool {
        let Some(entry) = self.entries[idx].as_mut() else {
            return false;
        };
        let Some(registry_slot) = entry.registry_slot.take() else {
            return false;
        };
        let cells = entry.cells.take();
        let registry_slot = registry_slot as usize;
        self.registry.swap_remove(registry_slot);
        if let Some(&moved) = self.registry.get(registry_slot)
            && let Some(moved_entry) = self.entries[moved as usize].as_mut()
        {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Registry positions come from 32-bit slots."
            )]
            let pos = registry_slot as u32;
            moved_entry.registry_slot = Some(pos);
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ObjectId uses 32-bit indices by design."
        )]
        let slot = idx as u32;
        if let Some(rect) = cells {
            remove_from_cells(&mut self.matrix, slot, rect, None);
        }
        trace!(slot, "unregistered object");
        true
    }

    /// Return a freed slot to the free list.
    ///
    /// A slot whose generation is exhausted is retired instead, so a stale
    /// handle can never match a later occupant.
    fn release(&mut self, idx: usize) {
        if self.generations[idx] < u32::MAX {
            self.free_list.push(idx);
        } else {
            debug!(slot = idx, "retired slot with exhausted generation");
        }
    }

    /// Start a new query pass.
    fn next_stamp(&mut self) -> u32 {
        self.query_stamp = self.query_stamp.wrapping_add(1);
        if self.query_stamp == 0 {
            warn!("query stamp wrapped; resetting object stamps");
            for entry in self.entries.iter_mut().flatten() {
                entry.stamp = 0;
            }
            self.query_stamp = 1;
        }
        self.query_stamp
    }
}

/// Add `slot` to the cells of `rect`, skipping those also in `skip`.
fn add_to_cells(matrix: &mut CellMatrix, slot: u32, rect: GridRect, skip: Option<GridRect>) {
    for (col, row) in rect.cells() {
        if skip.is_some_and(|s| s.contains(col, row)) {
            continue;
        }
        if let Ok(cell) = matrix.cell_mut(col, row) {
            cell.add_object(slot);
        }
    }
}

/// Remove `slot` from the cells of `rect`, skipping those also in `skip`.
fn remove_from_cells(matrix: &mut CellMatrix, slot: u32, rect: GridRect, skip: Option<GridRect>) {
    for (col, row) in rect.cells() {
        if skip.is_some_and(|s| s.contains(col, row)) {
            continue;
        }
        if let Ok(cell) = matrix.cell_mut(col, row) {
            cell.remove_object(slot);
        }
    }
}

/// Move `slot` from the cells of `before` to the cells of `after`.
///
/// Cells in both rectangles are left alone.
fn reconcile(matrix: &mut CellMatrix, slot: u32, before: Option<GridRect>, after: Option<GridRect>) {
    if before == after {
        return;
    }
    if let Some(old) = before {
        remove_from_cells(matrix, slot, old, after);
    }
    if let Some(new) = after {
        add_to_cells(matrix, slot, new, before);
    }
}
