// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by the partition, its cell matrix, and configuration.

use thiserror::Error;

use crate::object::ObjectId;

/// Errors reported by [`SpacePartition`](crate::SpacePartition) and
/// [`CellMatrix`](crate::CellMatrix).
///
/// Out-of-world coordinates are never an error; they are clamped to the
/// boundary cells instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// The grid was configured with zero columns or zero rows.
    #[error("cell counts must be at least 1 (got {cells_x}x{cells_y})")]
    ZeroCellCount {
        /// Requested number of columns.
        cells_x: usize,
        /// Requested number of rows.
        cells_y: usize,
    },
    /// The world rectangle is not finite or has no area.
    #[error("world rectangle must be finite with positive width and height")]
    InvalidWorld,
    /// The handle is stale or was never issued by this partition.
    #[error("unknown object {0:?}")]
    UnknownObject(ObjectId),
    /// The object is alive but not registered in the grid.
    #[error("object {0:?} is not registered")]
    NotRegistered(ObjectId),
    /// The cell matrix has no shape (never created, or destroyed).
    #[error("cell matrix is not created")]
    MatrixUnset,
    /// A cell coordinate lies outside the matrix.
    #[error("cell ({col}, {row}) is outside a {cols}x{rows} matrix")]
    CellOutOfRange {
        /// Requested column.
        col: usize,
        /// Requested row.
        row: usize,
        /// Matrix column count.
        cols: usize,
        /// Matrix row count.
        rows: usize,
    },
}
