//! Grid coordinates and inclusive cell bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer position of a cell in the grid. Rows increase upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub col: i32,
    pub row: i32,
}

impl CellCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Inclusive rectangle of grid coordinates.
///
/// A `CellBounds` always covers at least one cell; an empty grid has no
/// bounds at all (`Option<CellBounds>::None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBounds {
    pub min_col: i32,
    pub max_col: i32,
    pub min_row: i32,
    pub max_row: i32,
}

impl CellBounds {
    /// Bounds covering exactly one cell.
    pub fn single(coord: CellCoord) -> Self {
        Self {
            min_col: coord.col,
            max_col: coord.col,
            min_row: coord.row,
            max_row: coord.row,
        }
    }

    /// Build bounds from two corners in any order.
    pub fn from_corners(a: CellCoord, b: CellCoord) -> Self {
        Self {
            min_col: a.col.min(b.col),
            max_col: a.col.max(b.col),
            min_row: a.row.min(b.row),
            max_row: a.row.max(b.row),
        }
    }

    /// Smallest bounds containing every coordinate, or `None` when empty.
    pub fn enclosing<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        coords
            .into_iter()
            .fold(None, |acc: Option<CellBounds>, coord| match acc {
                None => Some(Self::single(coord)),
                Some(bounds) => Some(bounds.expanded_to(coord)),
            })
    }

    /// Number of columns covered (saturating at `u32::MAX`).
    pub fn columns(&self) -> u32 {
        span(self.min_col, self.max_col)
    }

    /// Number of rows covered (saturating at `u32::MAX`).
    pub fn rows(&self) -> u32 {
        span(self.min_row, self.max_row)
    }

    /// Total number of coordinates covered.
    pub fn area(&self) -> u64 {
        self.columns() as u64 * self.rows() as u64
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.col >= self.min_col
            && coord.col <= self.max_col
            && coord.row >= self.min_row
            && coord.row <= self.max_row
    }

    /// Grow the bounds so they include `coord`.
    pub fn expanded_to(&self, coord: CellCoord) -> Self {
        Self {
            min_col: self.min_col.min(coord.col),
            max_col: self.max_col.max(coord.col),
            min_row: self.min_row.min(coord.row),
            max_row: self.max_row.max(coord.row),
        }
    }

    /// Smallest bounds containing both rectangles.
    pub fn union(&self, other: &CellBounds) -> Self {
        Self {
            min_col: self.min_col.min(other.min_col),
            max_col: self.max_col.max(other.max_col),
            min_row: self.min_row.min(other.min_row),
            max_row: self.max_row.max(other.max_row),
        }
    }

    /// Iterate every coordinate, column-major (all rows of the first column
    /// before moving to the next).
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.min_col..=self.max_col)
            .flat_map(move |col| (self.min_row..=self.max_row).map(move |row| CellCoord { col, row }))
    }
}

fn span(min: i32, max: i32) -> u32 {
    (max as i64 - min as i64 + 1).min(u32::MAX as i64) as u32
}

impl fmt::Display for CellBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cols {}..={}, rows {}..={} ({}x{})",
            self.min_col,
            self.max_col,
            self.min_row,
            self.max_row,
            self.columns(),
            self.rows()
        )
    }
}
