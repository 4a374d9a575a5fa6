// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-to-grid coordinate mapping.
//!
//! Coordinates outside the world are clamped into the boundary cells rather
//! than rejected; each axis reports whether its value was already inside.
//! Only a region outside the world on both axes maps to no cell at all.

use kurbo::{Point, Rect};

use crate::geom::rect_contains_point;

/// Inclusive rectangle of grid cells, `[col_begin, col_end] × [row_begin, row_end]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridRect {
    /// First column.
    pub col_begin: usize,
    /// First row.
    pub row_begin: usize,
    /// Last column (inclusive).
    pub col_end: usize,
    /// Last row (inclusive).
    pub row_end: usize,
}

impl GridRect {
    /// A rectangle covering a single cell.
    pub const fn cell(col: usize, row: usize) -> Self {
        Self {
            col_begin: col,
            row_begin: row,
            col_end: col,
            row_end: row,
        }
    }

    /// Whether the cell `(col, row)` lies in this rectangle.
    #[inline]
    pub fn contains(&self, col: usize, row: usize) -> bool {
        (self.col_begin..=self.col_end).contains(&col)
            && (self.row_begin..=self.row_end).contains(&row)
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.col_end - self.col_begin + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.row_end - self.row_begin + 1
    }

    /// Number of cells covered.
    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Iterate `(col, row)` pairs in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.row_begin..=self.row_end)
            .flat_map(move |row| (self.col_begin..=self.col_end).map(move |col| (col, row)))
    }
}

/// Map one world coordinate onto a grid axis.
///
/// `value` is clamped into `[origin, origin + extent]`; the returned flag is
/// `true` when no clamping was needed. The index is
/// `floor((value - origin) * scale)`, clamped to `[0, cell_count - 1]` so that a
/// value on the upper bound lands in the last cell.
pub fn map_axis(value: f64, origin: f64, extent: f64, cell_count: usize, scale: f64) -> (usize, bool) {
    debug_assert!(!value.is_nan(), "coordinates must not be NaN");
    debug_assert!(cell_count > 0, "cell count must be positive");
    let end = origin + extent;
    let (clamped, inside) = if value < origin {
        (origin, false)
    } else if value > end {
        (end, false)
    } else {
        (value, true)
    };
    // Non-negative after clamping, so truncation is floor.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid indices are bounded by the cell count right below."
    )]
    let index = ((clamped - origin) * scale) as usize;
    (index.min(cell_count - 1), inside)
}

/// Grid geometry: the world rectangle and how it divides into cells.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct GridMapping {
    pub(crate) world: Rect,
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    /// Cells per world unit along x.
    pub(crate) scale_x: f64,
    /// Cells per world unit along y.
    pub(crate) scale_y: f64,
}

impl GridMapping {
    /// Callers validate the inputs (positive counts, finite non-empty world).
    pub(crate) fn new(world: Rect, cols: usize, rows: usize) -> Self {
        Self {
            world,
            cols,
            rows,
            scale_x: cols as f64 / world.width(),
            scale_y: rows as f64 / world.height(),
        }
    }

    #[inline]
    pub(crate) fn map_x(&self, x: f64) -> (usize, bool) {
        map_axis(x, self.world.x0, self.world.width(), self.cols, self.scale_x)
    }

    #[inline]
    pub(crate) fn map_y(&self, y: f64) -> (usize, bool) {
        map_axis(y, self.world.y0, self.world.height(), self.rows, self.scale_y)
    }

    /// Cells covered by `aabb`, or `None` when it is outside the world on both
    /// axes.
    ///
    /// An AABB that hangs over the edge, lies beside the world on one axis, or
    /// encloses the whole world is clamped into the boundary cells.
    pub(crate) fn cells_from_aabb(&self, aabb: Rect) -> Option<GridRect> {
        let w = self.world;
        let in_x = aabb.x1 >= w.x0 && aabb.x0 <= w.x1;
        let in_y = aabb.y1 >= w.y0 && aabb.y0 <= w.y1;
        if !in_x && !in_y {
            return None;
        }
        let (col_begin, _) = self.map_x(aabb.x0);
        let (col_end, _) = self.map_x(aabb.x1);
        let (row_begin, _) = self.map_y(aabb.y0);
        let (row_end, _) = self.map_y(aabb.y1);
        Some(GridRect {
            col_begin,
            row_begin,
            col_end,
            row_end,
        })
    }

    /// Cell holding `p`, or `None` when `p` is outside the world on both axes.
    ///
    /// A point outside on a single axis maps to the clamped boundary cell.
    pub(crate) fn cell_of_point(&self, p: Point) -> Option<(usize, usize)> {
        let (col, in_x) = self.map_x(p.x);
        let (row, in_y) = self.map_y(p.y);
        if !in_x && !in_y {
            return None;
        }
        Some((col, row))
    }

    /// The four unbounded strips beside the world that are outside it on
    /// exactly one axis: left, right, above and below.
    ///
    /// Together with the world itself they cover every point that maps to a
    /// cell. Edges are shared with the world.
    pub(crate) fn side_strips(&self) -> [Rect; 4] {
        let w = self.world;
        let inf = f64::INFINITY;
        [
            Rect::new(-inf, w.y0, w.x0, w.y1),
            Rect::new(w.x1, w.y0, inf, w.y1),
            Rect::new(w.x0, -inf, w.x1, w.y0),
            Rect::new(w.x0, w.y1, w.x1, inf),
        ]
    }

    /// Continuous grid coordinates of a world point (cell `(c, r)` spans `[c, c + 1)`).
    #[inline]
    pub(crate) fn to_grid(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.world.x0) * self.scale_x,
            (p.y - self.world.y0) * self.scale_y,
        )
    }

    #[inline]
    pub(crate) fn contains_point(&self, p: Point) -> bool {
        rect_contains_point(self.world, p)
    }

    #[inline]
    pub(crate) fn cell_size(&self) -> (f64, f64) {
        (1.0 / self.scale_x, 1.0 / self.scale_y)
    }
}
