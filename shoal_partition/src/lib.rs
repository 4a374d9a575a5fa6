// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shoal Partition: a uniform-grid 2D AABB index for broad-phase queries.
//!
//! A [`SpacePartition`] divides a fixed world rectangle into `cells_x × cells_y`
//! cells and buckets every registered object into each cell its AABB overlaps.
//! It answers four kinds of query:
//!
//! - object vs. object ([`SpacePartition::intersections`]),
//! - AABB range ([`SpacePartition::query_rect`]),
//! - point ([`SpacePartition::query_point`]),
//! - segment ([`SpacePartition::query_segment`]).
//!
//! Every query reports each object at most once, filters by a [`GroupMask`],
//! and uses closed intervals: touching edges count as intersecting.
//!
//! Geometry comes from [`kurbo`]. Objects may extend past the world; their
//! cell membership is clamped to the boundary cells. An object whose AABB lies
//! outside the world on both axes stays registered but occupies no cell, and
//! queries apply the same rule to points, rectangles, and segments.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Vec2};
//! use shoal_partition::{GroupMask, Object, PartitionConfig, SpacePartition};
//!
//! let cfg = PartitionConfig::new(Rect::new(0.0, 0.0, 1024.0, 768.0), 8, 6);
//! let mut sp: SpacePartition<&str> = SpacePartition::build(cfg).unwrap();
//!
//! let ship = sp.insert(Object::new(Rect::new(10.0, 10.0, 40.0, 40.0), "ship"));
//! let rock = sp.insert(Object::new(Rect::new(60.0, 10.0, 90.0, 40.0), "rock"));
//!
//! let mut hits = Vec::new();
//! sp.intersections(ship, &mut hits).unwrap();
//! assert!(hits.is_empty());
//!
//! // Nudge the ship until it touches the rock.
//! sp.translate_object(ship, Vec2::new(20.0, 0.0)).unwrap();
//! sp.intersections(ship, &mut hits).unwrap();
//! assert_eq!(hits, [rock]);
//!
//! sp.query_point(Point::new(75.0, 25.0), GroupMask::all(), &mut hits);
//! assert_eq!(sp.payload(hits[0]), Some(&"rock"));
//! ```
//!
//! ## Handles and registration
//!
//! Objects are owned by the partition and addressed by [`ObjectId`]. Storing an
//! object ([`SpacePartition::create_object`]) and registering it in the grid
//! ([`SpacePartition::add_object`]) are separate steps, so an object can be
//! detached and re-attached without losing its state. [`SpacePartition::insert`]
//! does both.
//!
//! ## Float semantics
//!
//! Coordinates are assumed finite. Debug builds may assert.

#![no_std]

extern crate alloc;

mod cell;
mod config;
mod error;
mod geom;
mod mapping;
mod matrix;
mod object;
mod partition;
mod walk;

pub use cell::Cell;
pub use config::PartitionConfig;
pub use error::PartitionError;
pub use geom::{clip_segment, rect_contains_point, rects_intersect, segment_intersects_rect};
pub use mapping::{GridRect, map_axis};
pub use matrix::{CellMatrix, MatrixShape};
pub use object::{GroupMask, Object, ObjectId};
pub use partition::SpacePartition;
pub use walk::GridWalk;
