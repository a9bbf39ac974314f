//! Error types shared across tilebake crates.

use std::path::PathBuf;

use tilebake_tilemap_model::{CellCoord, TilemapError};

/// Top-level error type for tilebake operations.
#[derive(Debug, thiserror::Error)]
pub enum TilebakeError {
    #[error("Tilemap '{name}' has no grid to export")]
    NoGridComponent { name: String },

    #[error("Grid has no occupied cells, nothing to export")]
    EmptyGrid,

    #[error("Failed to fetch source for cell {coord}: {message}")]
    SourceFetch { coord: CellCoord, message: String },

    #[error(
        "Tile '{tile}' is {width}x{height} pixels but the pixel resolution is {expected}"
    )]
    TileSizeMismatch {
        tile: String,
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("Invalid export settings: {message}")]
    InvalidSettings { message: String },

    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tilemap(#[from] TilemapError),
}

/// Result type alias using TilebakeError.
pub type TilebakeResult<T> = Result<T, TilebakeError>;

impl TilebakeError {
    pub fn no_grid(name: impl Into<String>) -> Self {
        Self::NoGridComponent { name: name.into() }
    }

    pub fn source_fetch(coord: CellCoord, msg: impl Into<String>) -> Self {
        Self::SourceFetch {
            coord,
            message: msg.into(),
        }
    }

    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: msg.into(),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_reports_path() {
        let err = TilebakeError::io(
            "/tmp/Tilemap Images/level.png",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/Tilemap Images/level.png"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_no_grid_names_tilemap() {
        assert_eq!(
            TilebakeError::no_grid("level").to_string(),
            "Tilemap 'level' has no grid to export"
        );
    }

    #[test]
    fn test_tilemap_error_is_transparent() {
        let err: TilebakeError = TilemapError::ValidationError {
            message: "Unknown format: gif".to_string(),
        }
        .into();
        assert!(matches!(err, TilebakeError::Tilemap(_)));
        assert_eq!(err.to_string(), "Invalid tilemap: Unknown format: gif");
    }

    #[test]
    fn test_source_fetch_message_names_cell() {
        let err = TilebakeError::source_fetch(CellCoord::new(-3, 4), "unknown tile 'x'");
        assert_eq!(
            err.to_string(),
            "Failed to fetch source for cell (-3, 4): unknown tile 'x'"
        );
    }
}
