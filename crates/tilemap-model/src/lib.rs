//! Tilebake Tilemap Model
//!
//! Defines the core data contracts for tilemap documents:
//! - **Cells:** Integer grid coordinates and inclusive cell bounds
//! - **Transforms:** Per-cell rotation/scale as the grid stores it
//! - **Grid:** Sparse cell storage with compressible bounds
//! - **Tilesets:** Atlas images and the tile regions cut from them
//! - **Tilemap:** The on-disk document with persisted export settings
//!
//! Grid rows increase upward; image rows increase downward. The conversion
//! between the two happens at render time, never in the model.

pub mod cell;
pub mod grid;
pub mod tilemap;
pub mod tileset;
pub mod transform;

pub use cell::*;
pub use grid::*;
pub use tilemap::*;
pub use tileset::*;
pub use transform::*;
