// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid traversal along a segment (Amanatides–Woo DDA).
//!
//! Works in continuous grid coordinates, where cell `(c, r)` spans
//! `[c, c + 1] × [r, r + 1]`. Crossing a cell corner visits both side cells as
//! well as the diagonal one, so a segment passing exactly through a corner
//! still reaches every cell that touches that corner on its path.

use kurbo::Point;

/// Slack on the parametric end and on corner ties, in units of `t`.
const T_EPSILON: f64 = 1e-9;

/// Iterator over the `(col, row)` cells crossed by a grid-space segment.
///
/// Cells outside `[0, cols) × [0, rows)` are never yielded. The start cell is
/// clamped into the grid. A cell may be yielded more than once around corner
/// crossings; callers de-duplicate results, not cells.
#[derive(Clone, Debug)]
pub struct GridWalk {
    col: i64,
    row: i64,
    step_x: i64,
    step_y: i64,
    t_max_x: f64,
    t_max_y: f64,
    t_delta_x: f64,
    t_delta_y: f64,
    cols: i64,
    rows: i64,
    pending: [(i64, i64); 3],
    pending_len: usize,
    started: bool,
    done: bool,
    budget: usize,
}

impl GridWalk {
    /// Walk from `from` to `to`, both in grid coordinates.
    pub fn new(from: Point, to: Point, cols: usize, rows: usize) -> Self {
        let (cols_i, rows_i) = (cols as i64, rows as i64);
        let col = floor_to_i64(from.x).clamp(0, (cols_i - 1).max(0));
        let row = floor_to_i64(from.y).clamp(0, (rows_i - 1).max(0));
        let d = to - from;
        let (step_x, t_max_x, t_delta_x) = axis_setup(from.x, d.x, col);
        let (step_y, t_max_y, t_delta_y) = axis_setup(from.y, d.y, row);
        Self {
            col,
            row,
            step_x,
            step_y,
            t_max_x,
            t_max_y,
            t_delta_x,
            t_delta_y,
            cols: cols_i,
            rows: rows_i,
            pending: [(0, 0); 3],
            pending_len: 0,
            started: false,
            done: cols == 0 || rows == 0,
            budget: cols + rows + 2,
        }
    }

    fn in_grid(&self, (col, row): (i64, i64)) -> bool {
        (0..self.cols).contains(&col) && (0..self.rows).contains(&row)
    }

    fn push(&mut self, cell: (i64, i64)) {
        self.pending[self.pending_len] = cell;
        self.pending_len += 1;
    }

    /// Advance across the next cell boundary, queueing the cells entered.
    fn advance(&mut self) {
        let tie = (self.t_max_x - self.t_max_y).abs() <= T_EPSILON;
        if tie && self.step_x != 0 && self.step_y != 0 {
            let (nc, nr) = (self.col + self.step_x, self.row + self.step_y);
            self.push((nc, nr));
            self.push((nc, self.row));
            self.push((self.col, nr));
            self.col = nc;
            self.row = nr;
            self.t_max_x += self.t_delta_x;
            self.t_max_y += self.t_delta_y;
        } else if self.t_max_x < self.t_max_y {
            self.col += self.step_x;
            self.t_max_x += self.t_delta_x;
            self.push((self.col, self.row));
        } else {
            self.row += self.step_y;
            self.t_max_y += self.t_delta_y;
            self.push((self.col, self.row));
        }
        if !self.in_grid((self.col, self.row)) {
            self.done = true;
        }
    }
}

impl Iterator for GridWalk {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pending_len > 0 {
                self.pending_len -= 1;
                let cell = self.pending[self.pending_len];
                if self.in_grid(cell) {
                    return Some(to_usize(cell));
                }
                continue;
            }
            if !self.started {
                self.started = true;
                if self.done {
                    return None;
                }
                return Some(to_usize((self.col, self.row)));
            }
            if self.done || self.budget == 0 {
                return None;
            }
            if self.t_max_x.min(self.t_max_y) > 1.0 + T_EPSILON {
                self.done = true;
                return None;
            }
            self.budget -= 1;
            self.advance();
        }
    }
}

/// Step direction, parametric distance to the first boundary, and per-cell step.
fn axis_setup(origin: f64, delta: f64, cell: i64) -> (i64, f64, f64) {
    let cell_f = cell as f64;
    if delta > 0.0 {
        (1, (cell_f + 1.0 - origin) / delta, 1.0 / delta)
    } else if delta < 0.0 {
        (-1, (origin - cell_f) / -delta, 1.0 / -delta)
    } else {
        (0, f64::INFINITY, f64::INFINITY)
    }
}

#[inline]
fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid coordinates are clipped to the world before walking."
    )]
    let i = v as i64;
    if (i as f64) > v { i - 1 } else { i }
}

#[inline]
fn to_usize((col, row): (i64, i64)) -> (usize, usize) {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Only called on cells already checked to be inside the grid."
    )]
    (col as usize, row as usize)
}
