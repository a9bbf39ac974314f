//! Sparse tile grid.
//!
//! The grid maps integer coordinates to cells and tracks a bounding
//! rectangle. Bounds grow as cells are placed but never shrink on their own;
//! [`TileGrid::compress_bounds`] trims them to the occupied rectangle.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{CellBounds, CellCoord};
use crate::transform::CellTransform;

/// Identifier of a tile definition, as referenced by a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileRef(pub String);

impl TileRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An occupied grid position: which tile it shows and how it is oriented.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub tile: TileRef,
    pub transform: CellTransform,
}

impl Cell {
    pub fn new(tile: TileRef, transform: CellTransform) -> Self {
        Self { tile, transform }
    }
}

/// Read access to a tile grid, plus bounds compression.
pub trait TileGrid {
    /// Current bounds, or `None` when the grid has never held a cell.
    fn cell_bounds(&self) -> Option<CellBounds>;

    /// The cell at `coord`, if occupied.
    fn cell_at(&self, coord: CellCoord) -> Option<Cell>;

    /// Number of occupied cells.
    fn occupied_count(&self) -> usize;

    /// Shrink the bounds to the minimal rectangle of occupied cells.
    fn compress_bounds(&mut self);
}

/// Sparse in-memory grid backing a tilemap document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "GridFile", into = "GridFile")]
pub struct Grid {
    cells: BTreeMap<CellCoord, Cell>,
    bounds: Option<CellBounds>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a tile, growing the bounds to include it.
    pub fn set_tile(&mut self, coord: CellCoord, tile: TileRef, transform: CellTransform) {
        self.cells.insert(coord, Cell::new(tile, transform));
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.expanded_to(coord),
            None => CellBounds::single(coord),
        });
    }

    /// Remove a tile. Bounds are left as they were.
    pub fn clear_tile(&mut self, coord: CellCoord) -> Option<Cell> {
        self.cells.remove(&coord)
    }

    /// Extend the stored bounds without placing any cell.
    pub fn reserve_bounds(&mut self, extra: CellBounds) {
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(&extra),
            None => extra,
        });
    }

    /// Occupied cells in coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        self.cells.iter().map(|(coord, cell)| (*coord, cell))
    }

    /// Minimal rectangle of occupied cells, regardless of stored bounds.
    pub fn occupied_bounds(&self) -> Option<CellBounds> {
        CellBounds::enclosing(self.cells.keys().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl TileGrid for Grid {
    fn cell_bounds(&self) -> Option<CellBounds> {
        self.bounds
    }

    fn cell_at(&self, coord: CellCoord) -> Option<Cell> {
        self.cells.get(&coord).cloned()
    }

    fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    fn compress_bounds(&mut self) {
        self.bounds = self.occupied_bounds();
    }
}

/// On-disk form of a grid: explicit bounds plus a flat cell list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GridFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<CellBounds>,

    #[serde(default)]
    cells: Vec<CellEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellEntry {
    col: i32,
    row: i32,
    tile: TileRef,
    #[serde(default, skip_serializing_if = "CellTransform::is_identity")]
    transform: CellTransform,
}

impl From<GridFile> for Grid {
    fn from(file: GridFile) -> Self {
        let mut grid = Grid::new();
        for entry in file.cells {
            grid.set_tile(
                CellCoord::new(entry.col, entry.row),
                entry.tile,
                entry.transform,
            );
        }
        if let Some(bounds) = file.bounds {
            grid.reserve_bounds(bounds);
        }
        grid
    }
}

impl From<Grid> for GridFile {
    fn from(grid: Grid) -> Self {
        GridFile {
            bounds: grid.bounds,
            cells: grid
                .cells
                .into_iter()
                .map(|(coord, cell)| CellEntry {
                    col: coord.col,
                    row: coord.row,
                    tile: cell.tile,
                    transform: cell.transform,
                })
                .collect(),
        }
    }
}
