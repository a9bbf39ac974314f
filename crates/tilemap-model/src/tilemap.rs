//! Tilemap documents and their persisted export settings.
//!
//! A tilemap document (`<name>.tilemap.json`) ties together the tile grid,
//! the atlases its tiles are cut from, and the settings used when the map is
//! flattened into an image.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, TileGrid, TileRef};
use crate::tileset::{TileDef, Tileset};

/// File suffix used for tilemap documents.
pub const TILEMAP_FILE_SUFFIX: &str = ".tilemap.json";

/// Current document schema version.
pub const TILEMAP_VERSION: &str = "1.0";

/// Top-level tilemap document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilemapDocument {
    /// Schema version.
    pub version: String,

    /// Human-readable map name. Used as the output file name by default.
    pub name: String,

    /// Atlas images.
    #[serde(default)]
    pub tilesets: Vec<Tileset>,

    /// Tile definitions referenced by grid cells.
    #[serde(default)]
    pub tiles: Vec<TileDef>,

    /// The tile grid. A document without one cannot be exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<Grid>,

    /// Export settings persisted with the map.
    #[serde(default)]
    pub export: ExportSettings,
}

/// Settings that control how a tilemap is flattened into an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Output file name without extension. Empty means "use the map name".
    #[serde(default)]
    pub file_name: String,

    /// Shrink grid bounds to the occupied region before export.
    #[serde(default = "default_compress_bounds")]
    pub compress_bounds: bool,

    /// Edge length of one grid cell in output pixels.
    #[serde(default = "default_pixel_resolution")]
    pub pixel_resolution: u32,

    /// Output image format.
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_compress_bounds() -> bool {
    true
}

fn default_pixel_resolution() -> u32 {
    32
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            compress_bounds: default_compress_bounds(),
            pixel_resolution: default_pixel_resolution(),
            format: OutputFormat::default(),
        }
    }
}

impl ExportSettings {
    /// File name to write, falling back to `map_name` when unset.
    pub fn effective_file_name<'a>(&'a self, map_name: &'a str) -> &'a str {
        if self.file_name.trim().is_empty() {
            map_name
        } else {
            &self.file_name
        }
    }
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Bmp,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Bmp, OutputFormat::Jpg];

    /// File extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Jpg => "jpg",
        }
    }

    /// Whether encoding keeps every pixel value exactly.
    pub fn is_lossless(self) -> bool {
        !matches!(self, OutputFormat::Jpg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = TilemapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            other => Err(TilemapError::ValidationError {
                message: format!("Unknown format: {other}. Use: png, bmp, jpg"),
            }),
        }
    }
}

impl TilemapDocument {
    /// Create a document with an empty grid and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: TILEMAP_VERSION.to_string(),
            name: name.into(),
            tilesets: vec![],
            tiles: vec![],
            grid: Some(Grid::new()),
            export: ExportSettings::default(),
        }
    }

    pub fn tile_def(&self, tile: &TileRef) -> Option<&TileDef> {
        self.tiles.iter().find(|def| &def.id == tile)
    }

    pub fn tileset(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.iter().find(|set| set.name == name)
    }
}

/// A tilemap document together with where it lives on disk.
#[derive(Debug, Clone)]
pub struct LoadedTilemap {
    /// Path of the document file.
    pub path: PathBuf,

    /// Directory that relative atlas paths resolve against.
    pub root: PathBuf,

    pub document: TilemapDocument,
}

impl LoadedTilemap {
    /// Load a tilemap document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TilemapError> {
        let path = path.as_ref().to_path_buf();

        let json = std::fs::read_to_string(&path).map_err(|e| TilemapError::IoError {
            path: path.clone(),
            source: e,
        })?;

        let document: TilemapDocument =
            serde_json::from_str(&json).map_err(|e| TilemapError::ParseError {
                path: path.clone(),
                source: e,
            })?;

        Ok(Self {
            root: document_root(&path),
            path,
            document,
        })
    }

    /// Save the document back to its file.
    pub fn save(&self) -> Result<(), TilemapError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TilemapError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json =
            serde_json::to_string_pretty(&self.document).map_err(|e| TilemapError::ParseError {
                path: self.path.clone(),
                source: e,
            })?;
        std::fs::write(&self.path, json).map_err(|e| TilemapError::IoError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Create a new, empty tilemap document at `<dir>/<name>.tilemap.json`.
    pub fn create(dir: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, TilemapError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TilemapError::ValidationError {
                message: "Tilemap name must not be empty".to_string(),
            });
        }

        let path = dir
            .as_ref()
            .join(format!("{name}{TILEMAP_FILE_SUFFIX}"));
        let loaded = Self {
            root: document_root(&path),
            path,
            document: TilemapDocument::new(name),
        };
        loaded.save()?;
        Ok(loaded)
    }

    /// Absolute (root-joined) path of a tileset's atlas image.
    pub fn atlas_path(&self, tileset: &Tileset) -> PathBuf {
        self.root.join(&tileset.image)
    }

    /// Check that every reference in the document resolves.
    ///
    /// Returns one human-readable message per problem found.
    pub fn validate_references(&self) -> Vec<String> {
        let doc = &self.document;
        let mut errors = vec![];

        let mut seen = HashSet::new();
        for set in &doc.tilesets {
            if !seen.insert(set.name.as_str()) {
                errors.push(format!("Duplicate tileset name: {}", set.name));
            }
            if !self.atlas_path(set).exists() {
                errors.push(format!(
                    "Tileset '{}' image missing: {}",
                    set.name,
                    set.image.display()
                ));
            }
        }

        let resolution = doc.export.pixel_resolution;
        if resolution == 0 {
            errors.push("Pixel resolution must be greater than zero".to_string());
        }

        let mut seen = HashSet::new();
        for def in &doc.tiles {
            if !seen.insert(&def.id) {
                errors.push(format!("Duplicate tile id: {}", def.id));
            }
            if doc.tileset(&def.tileset).is_none() {
                errors.push(format!(
                    "Tile '{}' references unknown tileset '{}'",
                    def.id, def.tileset
                ));
            }
            if resolution > 0 && !def.rect.is_square(resolution) {
                errors.push(format!(
                    "Tile '{}' is {}x{} but pixel resolution is {}",
                    def.id, def.rect.width, def.rect.height, resolution
                ));
            }
        }

        match &doc.grid {
            None => errors.push("Document has no grid".to_string()),
            Some(grid) => {
                if grid.occupied_count() == 0 {
                    errors.push("Grid has no occupied cells".to_string());
                }
                let mut reported = HashSet::new();
                for (coord, cell) in grid.cells() {
                    if doc.tile_def(&cell.tile).is_none() && reported.insert(&cell.tile) {
                        errors.push(format!(
                            "Cell {coord} references unknown tile '{}'",
                            cell.tile
                        ));
                    }
                }
            }
        }

        errors
    }
}

fn document_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Errors that can occur when working with tilemap documents.
#[derive(Debug, thiserror::Error)]
pub enum TilemapError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid tilemap: {message}")]
    ValidationError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellCoord;
    use crate::tileset::TileRect;
    use crate::transform::CellTransform;

    #[test]
    fn test_export_settings_defaults() {
        let settings = ExportSettings::default();
        assert!(settings.file_name.is_empty());
        assert!(settings.compress_bounds);
        assert_eq!(settings.pixel_resolution, 32);
        assert_eq!(settings.format, OutputFormat::Png);
    }

    #[test]
    fn test_effective_file_name_falls_back_to_map_name() {
        let mut settings = ExportSettings::default();
        assert_eq!(settings.effective_file_name("dungeon"), "dungeon");
        settings.file_name = "  ".to_string();
        assert_eq!(settings.effective_file_name("dungeon"), "dungeon");
        settings.file_name = "dungeon-baked".to_string();
        assert_eq!(settings.effective_file_name("dungeon"), "dungeon-baked");
    }

    #[test]
    fn test_format_extension_matches_format() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Bmp.extension(), "bmp");
        assert_eq!(OutputFormat::Jpg.extension(), "jpg");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert!("gif".parse::<OutputFormat>().is_err());

        let parsed: OutputFormat = serde_json::from_str(r#""jpeg""#).unwrap();
        assert_eq!(parsed, OutputFormat::Jpg);
    }

    #[test]
    fn test_document_without_export_section_uses_defaults() {
        let json = r#"{"version": "1.0", "name": "legacy", "grid": {"cells": []}}"#;
        let doc: TilemapDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.export, ExportSettings::default());
        assert!(doc.grid.is_some());
        assert!(doc.tiles.is_empty());
    }

    #[test]
    fn test_document_without_grid() {
        let json = r#"{"version": "1.0", "name": "props"}"#;
        let doc: TilemapDocument = serde_json::from_str(json).unwrap();
        assert!(doc.grid.is_none());
    }

    #[test]
    fn test_create_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let created = LoadedTilemap::create(dir.path(), "overworld").unwrap();
        assert!(created.path.ends_with("overworld.tilemap.json"));

        let loaded = LoadedTilemap::load(&created.path).unwrap();
        assert_eq!(loaded.document.name, "overworld");
        assert_eq!(loaded.document.version, TILEMAP_VERSION);
        assert_eq!(loaded.root, dir.path());
        assert!(loaded.document.grid.unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LoadedTilemap::create(dir.path(), "").is_err());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = LoadedTilemap::load("/nonexistent/map.tilemap.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/map.tilemap.json"));
    }

    #[test]
    fn test_validate_references_reports_problems() {
        let dir = tempfile::tempdir().unwrap();
        let mut loaded = LoadedTilemap::create(dir.path(), "broken").unwrap();
        let doc = &mut loaded.document;
        doc.export.pixel_resolution = 16;
        doc.tilesets.push(Tileset {
            name: "terrain".to_string(),
            image: PathBuf::from("terrain.png"),
        });
        doc.tiles.push(TileDef {
            id: TileRef::new("grass"),
            tileset: "terrain".to_string(),
            rect: TileRect::new(0, 0, 16, 8),
        });
        doc.tiles.push(TileDef {
            id: TileRef::new("rock"),
            tileset: "missing".to_string(),
            rect: TileRect::new(0, 0, 16, 16),
        });
        if let Some(grid) = doc.grid.as_mut() {
            grid.set_tile(CellCoord::new(0, 0), TileRef::new("grass"), CellTransform::IDENTITY);
            grid.set_tile(CellCoord::new(1, 0), TileRef::new("lava"), CellTransform::IDENTITY);
        }

        let errors = loaded.validate_references();
        assert!(errors.iter().any(|e| e.contains("image missing: terrain.png")));
        assert!(errors.iter().any(|e| e.contains("'grass' is 16x8")));
        assert!(errors.iter().any(|e| e.contains("unknown tileset 'missing'")));
        assert!(errors.iter().any(|e| e.contains("unknown tile 'lava'")));
    }

    #[test]
    fn test_validate_references_flags_missing_grid() {
        let dir = tempfile::tempdir().unwrap();
        let mut loaded = LoadedTilemap::create(dir.path(), "nogrid").unwrap();
        loaded.document.grid = None;
        let errors = loaded.validate_references();
        assert!(errors.iter().any(|e| e == "Document has no grid"));
    }
}
