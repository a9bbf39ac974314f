//! Tile atlases and the tile regions cut from them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::grid::TileRef;

/// A named atlas image. The path is relative to the tilemap document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tileset {
    pub name: String,
    pub image: PathBuf,
}

/// Pixel rectangle inside an atlas image, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the rectangle lies entirely inside an image of the given size.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;
        right <= image_width as u64 && bottom <= image_height as u64
    }

    pub fn is_square(&self, size: u32) -> bool {
        self.width == size && self.height == size
    }
}

/// A tile definition: where a tile's pixels live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDef {
    pub id: TileRef,
    pub tileset: String,
    pub rect: TileRect,
}
