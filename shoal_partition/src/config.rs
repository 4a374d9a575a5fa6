// Copyright 2025 the Shoal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction-time parameters for a [`SpacePartition`](crate::SpacePartition).

use kurbo::Rect;

use crate::error::PartitionError;
use crate::geom::rect_is_finite;

/// World rectangle and grid resolution.
///
/// ```
/// use kurbo::Rect;
/// use shoal_partition::PartitionConfig;
///
/// let cfg = PartitionConfig::new(Rect::new(0.0, 0.0, 1024.0, 768.0), 8, 6);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.cell_size(), (128.0, 128.0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartitionConfig {
    /// World rectangle covered by the grid. Objects may extend past it.
    pub world: Rect,
    /// Number of grid columns. Must be at least 1.
    pub cells_x: usize,
    /// Number of grid rows. Must be at least 1.
    pub cells_y: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            world: Rect::new(0.0, 0.0, 1024.0, 768.0),
            cells_x: 8,
            cells_y: 6,
        }
    }
}

impl PartitionConfig {
    /// Create a config. The world rect is normalized.
    pub fn new(world: Rect, cells_x: usize, cells_y: usize) -> Self {
        Self {
            world: world.abs(),
            cells_x,
            cells_y,
        }
    }

    /// Check the parameters without building anything.
    ///
    /// # Errors
    ///
    /// [`PartitionError::ZeroCellCount`] if either count is zero, and
    /// [`PartitionError::InvalidWorld`] if the world is not finite or has no area.
    pub fn validate(&self) -> Result<(), PartitionError> {
        if self.cells_x == 0 || self.cells_y == 0 {
            return Err(PartitionError::ZeroCellCount {
                cells_x: self.cells_x,
                cells_y: self.cells_y,
            });
        }
        let world = self.world.abs();
        if !rect_is_finite(world) || world.width() <= 0.0 || world.height() <= 0.0 {
            return Err(PartitionError::InvalidWorld);
        }
        Ok(())
    }

    /// World-space size of one cell, `(width, height)`.
    pub fn cell_size(&self) -> (f64, f64) {
        let world = self.world.abs();
        (
            world.width() / self.cells_x as f64,
            world.height() / self.cells_y as f64,
        )
    }
}
