use thiserror::Error;

use crate::{CellCoord, GridDimensions, OccupiedBounds};

/// Reasons a cell could not be cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The cell lies outside the configured grid.
    #[error("cell {0:?} lies outside the enemy grid")]
    OutOfBounds(CellCoord),
    /// The cell was already empty.
    #[error("cell {0:?} is already empty")]
    AlreadyEmpty(CellCoord),
}

/// Dense occupancy arena for a rows×columns enemy grid.
///
/// Cells are stored row-major with row 0 at the bottom. The arena is
/// allocated once per [`GridOccupancy::new`] and never resized afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridOccupancy {
    dimensions: GridDimensions,
    cells: Vec<bool>,
    occupied: usize,
}

impl GridOccupancy {
    /// Creates a fully occupied grid with the provided dimensions.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        let capacity = dimensions.cell_count();
        Self {
            dimensions,
            cells: vec![true; capacity],
            occupied: capacity,
        }
    }

    /// Marks every cell as occupied again.
    pub fn populate(&mut self) {
        self.cells.fill(true);
        self.occupied = self.cells.len();
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of occupied cells.
    #[must_use]
    pub const fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Reports whether the cell holds a live enemy. Cells outside the grid are
    /// never occupied.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Empties the provided cell.
    ///
    /// Invalid requests leave the grid untouched so that a repeated
    /// destruction can never be counted twice.
    pub fn clear(&mut self, cell: CellCoord) -> Result<(), GridError> {
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(GridError::OutOfBounds(cell))?;
        if !*slot {
            return Err(GridError::AlreadyEmpty(cell));
        }
        *slot = false;
        self.occupied -= 1;
        Ok(())
    }

    /// Computes the extremes of the occupied cells with a full scan.
    ///
    /// Returns `None` when the grid is empty.
    #[must_use]
    pub fn bounds(&self) -> Option<OccupiedBounds> {
        let mut bounds: Option<OccupiedBounds> = None;
        for cell in self.dimensions.cells() {
            if !self.is_occupied(cell) {
                continue;
            }
            let current = bounds.get_or_insert(OccupiedBounds {
                left_column: cell.column(),
                right_column: cell.column(),
                lowest_row: cell.row(),
            });
            current.left_column = current.left_column.min(cell.column());
            current.right_column = current.right_column.max(cell.column());
            current.lowest_row = current.lowest_row.min(cell.row());
        }
        bounds
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.dimensions.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.dimensions.columns()).ok()?;
        Some(row * width + column)
    }
}
