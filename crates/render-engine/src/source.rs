//! Tile sources: where each cell's pixels come from.
//!
//! The compositor only sees the [`TileSource`] trait. [`AtlasTileSource`]
//! cuts tiles out of the atlas images a tilemap document references;
//! [`MemoryTileSource`] serves pre-built regions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use image::RgbaImage;
use tilebake_tilemap_model::{LoadedTilemap, TileRect, TileRef};

use crate::pixels::PixelBuffer;

/// Provides the source pixels of a tile.
pub trait TileSource {
    /// Fetch a fresh copy of the tile's pixels.
    fn fetch(&self, tile: &TileRef) -> Result<PixelBuffer, SourceError>;
}

/// Why a tile's pixels could not be produced.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("unknown tile '{tile}'")]
    UnknownTile { tile: TileRef },

    #[error("tile '{tile}' references unknown tileset '{tileset}'")]
    UnknownTileset { tile: TileRef, tileset: String },

    #[error("failed to decode atlas {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("tile '{tile}' rect {rect:?} lies outside its {width}x{height} atlas")]
    RectOutOfBounds {
        tile: TileRef,
        rect: TileRect,
        width: u32,
        height: u32,
    },
}

/// Cuts tiles out of the atlas images of a loaded tilemap.
///
/// Decoded atlases are kept for the lifetime of the source; every `fetch`
/// returns a newly cropped region.
pub struct AtlasTileSource<'a> {
    tilemap: &'a LoadedTilemap,
    atlases: RefCell<HashMap<String, Result<Rc<RgbaImage>, SourceError>>>,
}

impl<'a> AtlasTileSource<'a> {
    pub fn new(tilemap: &'a LoadedTilemap) -> Self {
        Self {
            tilemap,
            atlases: RefCell::new(HashMap::new()),
        }
    }

    fn atlas(&self, tile: &TileRef, tileset_name: &str) -> Result<Rc<RgbaImage>, SourceError> {
        if let Some(cached) = self.atlases.borrow().get(tileset_name) {
            return cached.clone();
        }

        let decoded = match self.tilemap.document.tileset(tileset_name) {
            None => Err(SourceError::UnknownTileset {
                tile: tile.clone(),
                tileset: tileset_name.to_string(),
            }),
            Some(set) => {
                let path = self.tilemap.atlas_path(set);
                tracing::debug!(tileset = %set.name, path = %path.display(), "Decoding atlas");
                image::open(&path)
                    .map(|img| Rc::new(img.into_rgba8()))
                    .map_err(|e| SourceError::Decode {
                        path,
                        message: e.to_string(),
                    })
            }
        };

        self.atlases
            .borrow_mut()
            .insert(tileset_name.to_string(), decoded.clone());
        decoded
    }
}

impl TileSource for AtlasTileSource<'_> {
    fn fetch(&self, tile: &TileRef) -> Result<PixelBuffer, SourceError> {
        let def = self
            .tilemap
            .document
            .tile_def(tile)
            .ok_or_else(|| SourceError::UnknownTile { tile: tile.clone() })?;

        let atlas = self.atlas(tile, &def.tileset)?;
        let (width, height) = atlas.dimensions();
        let rect = def.rect;
        if !rect.fits_within(width, height) {
            return Err(SourceError::RectOutOfBounds {
                tile: tile.clone(),
                rect,
                width,
                height,
            });
        }

        let region =
            image::imageops::crop_imm(&*atlas, rect.x, rect.y, rect.width, rect.height).to_image();
        Ok(PixelBuffer::from_rgba_image(region))
    }
}

/// Serves tiles from pre-built pixel regions.
#[derive(Debug, Clone, Default)]
pub struct MemoryTileSource {
    tiles: HashMap<TileRef, PixelBuffer>,
}

impl MemoryTileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tile: TileRef, pixels: PixelBuffer) {
        self.tiles.insert(tile, pixels);
    }

    pub fn with_tile(mut self, tile: impl Into<String>, pixels: PixelBuffer) -> Self {
        self.insert(TileRef::new(tile), pixels);
        self
    }
}

impl TileSource for MemoryTileSource {
    fn fetch(&self, tile: &TileRef) -> Result<PixelBuffer, SourceError> {
        self.tiles
            .get(tile)
            .cloned()
            .ok_or_else(|| SourceError::UnknownTile { tile: tile.clone() })
    }
}
