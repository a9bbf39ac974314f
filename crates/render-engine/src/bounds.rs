//! Output bounds: which cells are drawn and how large the image is.

use tilebake_common::error::{TilebakeError, TilebakeResult};
use tilebake_tilemap_model::{CellBounds, CellCoord, TileGrid};

/// Grid bounds together with the pixel size they produce.
///
/// Only built by [`OutputBounds::from_cells`], so `width` and `height` are
/// always the cell counts times `cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputBounds {
    cells: CellBounds,
    cell_size: u32,
    width: u32,
    height: u32,
}

impl OutputBounds {
    /// Compute pixel dimensions for a cell range.
    pub fn from_cells(cells: CellBounds, cell_size: u32) -> TilebakeResult<Self> {
        if cell_size == 0 {
            return Err(TilebakeError::invalid_settings(
                "pixel resolution must be greater than zero",
            ));
        }

        let too_large = || {
            TilebakeError::invalid_settings(format!(
                "output for {cells} at {cell_size}px per cell is too large"
            ))
        };
        let width = cells.columns().checked_mul(cell_size).ok_or_else(too_large)?;
        let height = cells.rows().checked_mul(cell_size).ok_or_else(too_large)?;

        let bytes = (width as u64)
            .checked_mul(height as u64)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(too_large)?;
        if usize::try_from(bytes).is_err() {
            return Err(too_large());
        }

        Ok(Self {
            cells,
            cell_size,
            width,
            height,
        })
    }

    /// Inclusive cell range that is drawn.
    pub fn cells(&self) -> CellBounds {
        self.cells
    }

    /// Edge length of one cell in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel offset of a cell from the output origin, before the vertical
    /// flip: `((x - min_col) * size, (y - min_row) * size)`.
    pub fn cell_origin(&self, coord: CellCoord) -> (u32, u32) {
        let dx = (coord.col as i64 - self.cells.min_col as i64) as u32;
        let dy = (coord.row as i64 - self.cells.min_row as i64) as u32;
        (dx * self.cell_size, dy * self.cell_size)
    }

    /// Image row (top-down) receiving source row `i` of a cell whose
    /// un-flipped origin is at `dest_y`.
    pub fn image_row(&self, dest_y: u32, i: u32) -> u32 {
        self.height - self.cell_size - dest_y + i
    }
}

/// Resolve the cells to draw and the output size.
///
/// With `compress` set the grid's bounds are first shrunk to the occupied
/// rectangle. A grid without occupied cells fails with `EmptyGrid` before
/// any size is computed.
pub fn resolve_bounds<G>(grid: &mut G, compress: bool, cell_size: u32) -> TilebakeResult<OutputBounds>
where
    G: TileGrid + ?Sized,
{
    if compress {
        grid.compress_bounds();
    }

    if grid.occupied_count() == 0 {
        return Err(TilebakeError::EmptyGrid);
    }
    let cells = grid.cell_bounds().ok_or(TilebakeError::EmptyGrid)?;

    let bounds = OutputBounds::from_cells(cells, cell_size)?;
    tracing::debug!(
        cells = %bounds.cells,
        width = bounds.width,
        height = bounds.height,
        compress,
        "Resolved output bounds"
    );
    Ok(bounds)
}
