//! Tilebake Render Engine
//!
//! Flattens a tile grid into a single raster image.
//!
//! # Pipeline Architecture
//!
//! ```text
//! tilemap.json ──┐
//!                ├── Resolve bounds (optional compress)
//! grid ──────────┘         │
//!                          ├── Fetch cell source (atlas crop)
//! atlas.png ───────────────┘         │
//!                                    ├── Orient (rotate / mirror)
//!                                    │
//!                                    ├── Blit (grid rows stack upward)
//!                                    ▼
//!                              Encode (png / bmp / jpg)
//!                                    │
//!                                    ▼
//!                     Tilemap Images/<name>.<ext>
//! ```

pub mod bounds;
pub mod compositor;
pub mod encode;
pub mod export;
pub mod pixels;
pub mod source;
pub mod transform;

pub use bounds::{resolve_bounds, OutputBounds};
pub use compositor::{compose, compose_tilemap, Composition};
pub use encode::{encode_to_bytes, encode_to_file};
pub use export::*;
pub use pixels::{PixelBuffer, TRANSPARENT};
pub use source::{AtlasTileSource, MemoryTileSource, SourceError, TileSource};
pub use transform::{Orientation, Rotation};
