//! Tile compositor: flattens grid cells into one pixel buffer.
//!
//! Each occupied cell's source region is oriented and copied into the
//! output. Grid rows grow upward while image rows grow downward, so cells
//! are written bottom-up: the cell at `min_row` fills the last image rows.

use tilebake_common::error::{TilebakeError, TilebakeResult};
use tilebake_tilemap_model::{CellCoord, ExportSettings, TileGrid};

use crate::bounds::{resolve_bounds, OutputBounds};
use crate::pixels::{PixelBuffer, CHANNELS};
use crate::source::TileSource;
use crate::transform::Orientation;

/// Finished output buffer plus per-cell statistics.
#[derive(Debug, Clone)]
pub struct Composition {
    /// The composited image.
    pub buffer: PixelBuffer,

    /// Cells whose pixels were written.
    pub cells_drawn: usize,

    /// Coordinates inside the bounds without a cell.
    pub cells_empty: usize,

    /// Cells skipped because their source could not be fetched.
    pub cells_failed: usize,

    /// Cells drawn without rotation because their angle was unsupported.
    pub unsupported_rotations: usize,
}

/// Resolve bounds from `settings` and compose the grid.
pub fn compose_tilemap<G, S>(
    grid: &mut G,
    source: &S,
    settings: &ExportSettings,
) -> TilebakeResult<Composition>
where
    G: TileGrid + ?Sized,
    S: TileSource + ?Sized,
{
    let bounds = resolve_bounds(grid, settings.compress_bounds, settings.pixel_resolution)?;
    compose(grid, source, &bounds)
}

/// Draw every occupied cell within `bounds` into a new buffer.
///
/// Cells whose source cannot be fetched are left transparent and counted
/// in `cells_failed`. A source whose size differs from the bounds' cell size
/// aborts the composition.
pub fn compose<G, S>(grid: &G, source: &S, bounds: &OutputBounds) -> TilebakeResult<Composition>
where
    G: TileGrid + ?Sized,
    S: TileSource + ?Sized,
{
    let mut composition = Composition {
        buffer: PixelBuffer::new(bounds.width(), bounds.height()),
        cells_drawn: 0,
        cells_empty: 0,
        cells_failed: 0,
        unsupported_rotations: 0,
    };

    for coord in bounds.cells().iter() {
        let Some(cell) = grid.cell_at(coord) else {
            composition.cells_empty += 1;
            continue;
        };

        let mut region = match source.fetch(&cell.tile) {
            Ok(region) => region,
            Err(e) => {
                let err = TilebakeError::source_fetch(coord, e.to_string());
                tracing::warn!(cell = %coord, tile = %cell.tile, "Skipping cell: {err}");
                composition.cells_failed += 1;
                continue;
            }
        };

        if region.width() != bounds.cell_size() || region.height() != bounds.cell_size() {
            return Err(TilebakeError::TileSizeMismatch {
                tile: cell.tile.to_string(),
                expected: bounds.cell_size(),
                width: region.width(),
                height: region.height(),
            });
        }

        let resolved = Orientation::resolve(&cell.transform);
        if let Some(angle) = resolved.unsupported_angle {
            tracing::warn!(
                cell = %coord,
                tile = %cell.tile,
                angle,
                "Unsupported rotation, drawing cell unrotated"
            );
            composition.unsupported_rotations += 1;
        }
        resolved.orientation.apply(&mut region);

        blit(&mut composition.buffer, &region, bounds, coord);
        composition.cells_drawn += 1;
        tracing::trace!(cell = %coord, tile = %cell.tile, "Drew cell");
    }

    tracing::debug!(
        drawn = composition.cells_drawn,
        empty = composition.cells_empty,
        failed = composition.cells_failed,
        "Composition finished"
    );
    Ok(composition)
}

/// Copy a square region into the output at the cell's position, flipping the
/// cell's placement vertically so grid rows stack upward.
fn blit(out: &mut PixelBuffer, region: &PixelBuffer, bounds: &OutputBounds, coord: CellCoord) {
    let (dest_x, dest_y) = bounds.cell_origin(coord);
    let row_bytes = region.width() as usize * CHANNELS;

    for i in 0..region.height() {
        let dst = out.offset(dest_x, bounds.image_row(dest_y, i));
        let src = region.offset(0, i);
        out.data[dst..dst + row_bytes].copy_from_slice(&region.data[src..src + row_bytes]);
    }
}
