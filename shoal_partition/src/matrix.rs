// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-major matrix of grid cells.

use alloc::vec::Vec;

use crate::cell::Cell;
use crate::error::PartitionError;
use crate::mapping::GridRect;

/// Shape of a created matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixShape {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

/// Flat row-major storage of [`Cell`]s.
///
/// The matrix is either unset (no shape, no cells) or holds exactly
/// `rows * cols` cells. Cell `(col, row)` lives at `row * cols + col`.
#[derive(Clone, Debug, Default)]
pub struct CellMatrix {
    cells: Vec<Cell>,
    shape: Option<MatrixShape>,
}

impl CellMatrix {
    /// An unset matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)allocate `rows * cols` empty cells, dropping any previous contents.
    pub fn create(&mut self, rows: usize, cols: usize) {
        self.cells.clear();
        self.cells.resize_with(rows * cols, Cell::default);
        self.shape = Some(MatrixShape { rows, cols });
    }

    /// Release the cells and return to the unset state.
    pub fn destroy(&mut self) {
        self.cells = Vec::new();
        self.shape = None;
    }

    /// Empty every cell without deallocating the matrix.
    pub fn remove_all_objects(&mut self) {
        for cell in &mut self.cells {
            cell.remove_all();
        }
    }

    /// Shape, or `None` while unset.
    pub fn shape(&self) -> Option<MatrixShape> {
        self.shape
    }

    /// Number of rows (0 while unset).
    pub fn rows(&self) -> usize {
        self.shape.map_or(0, |s| s.rows)
    }

    /// Number of columns (0 while unset).
    pub fn cols(&self) -> usize {
        self.shape.map_or(0, |s| s.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the matrix holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds-checked access to cell `(col, row)`.
    pub fn cell(&self, col: usize, row: usize) -> Result<&Cell, PartitionError> {
        let idx = self.index_of(col, row)?;
        Ok(&self.cells[idx])
    }

    /// Bounds-checked mutable access to cell `(col, row)`.
    pub fn cell_mut(&mut self, col: usize, row: usize) -> Result<&mut Cell, PartitionError> {
        let idx = self.index_of(col, row)?;
        Ok(&mut self.cells[idx])
    }

    /// Every cell of the closed rectangle `rect`, in row-major order.
    ///
    /// Iteration is strictly per row: cells outside the rectangle's columns are
    /// never visited, even when the rectangle does not span full rows.
    pub fn cell_range(
        &self,
        rect: GridRect,
    ) -> Result<impl Iterator<Item = &Cell> + '_, PartitionError> {
        let cols = self.check_range(rect)?;
        Ok(self
            .cells
            .chunks(cols)
            .skip(rect.row_begin)
            .take(rect.height())
            .flat_map(move |row| &row[rect.col_begin..=rect.col_end]))
    }

    /// Mutable counterpart of [`cell_range`](Self::cell_range).
    pub fn cell_range_mut(
        &mut self,
        rect: GridRect,
    ) -> Result<impl Iterator<Item = &mut Cell> + '_, PartitionError> {
        let cols = self.check_range(rect)?;
        Ok(self
            .cells
            .chunks_mut(cols)
            .skip(rect.row_begin)
            .take(rect.height())
            .flat_map(move |row| &mut row[rect.col_begin..=rect.col_end]))
    }

    fn index_of(&self, col: usize, row: usize) -> Result<usize, PartitionError> {
        let MatrixShape { rows, cols } = self.shape.ok_or(PartitionError::MatrixUnset)?;
        if col >= cols || row >= rows {
            return Err(PartitionError::CellOutOfRange {
                col,
                row,
                cols,
                rows,
            });
        }
        Ok(row * cols + col)
    }

    /// Validate `rect` against the shape and return the column count.
    fn check_range(&self, rect: GridRect) -> Result<usize, PartitionError> {
        debug_assert!(
            rect.col_begin <= rect.col_end && rect.row_begin <= rect.row_end,
            "inverted grid rect"
        );
        self.index_of(rect.col_end, rect.row_end)?;
        Ok(self.cols())
    }
}
