//! Export jobs: tilemap document in, image file out.

use std::path::{Path, PathBuf};

use tilebake_common::config::{AppConfig, DEFAULT_OUTPUT_SUBDIR};
use tilebake_common::error::{TilebakeError, TilebakeResult};
use tilebake_tilemap_model::{ExportSettings, LoadedTilemap, OutputFormat};

use crate::bounds::resolve_bounds;
use crate::compositor::compose;
use crate::encode::encode_to_file;
use crate::source::AtlasTileSource;

/// An export job ready to be run against a tilemap.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Directory that receives the output subdirectory. `None` writes next
    /// to the tilemap document.
    pub base_dir: Option<PathBuf>,

    /// Subdirectory below `base_dir` for generated images.
    pub output_subdir: String,

    /// Per-run changes to the tilemap's persisted settings.
    pub overrides: SettingsOverrides,
}

impl ExportJob {
    /// Job writing into `<base_dir>/Tilemap Images` with no overrides.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::beside_tilemap()
        }
    }

    /// Job writing into `Tilemap Images` next to the tilemap document.
    pub fn beside_tilemap() -> Self {
        Self {
            base_dir: None,
            output_subdir: DEFAULT_OUTPUT_SUBDIR.to_string(),
            overrides: SettingsOverrides::default(),
        }
    }

    /// Job using the configured output location. `explicit_base` wins over
    /// the configured base directory.
    pub fn from_config(config: &AppConfig, explicit_base: Option<&Path>) -> Self {
        Self {
            base_dir: config.base_dir_override(explicit_base),
            output_subdir: config.output_subdir.clone(),
            overrides: SettingsOverrides::default(),
        }
    }
}

/// Optional replacements for individual export settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub file_name: Option<String>,
    pub compress_bounds: Option<bool>,
    pub pixel_resolution: Option<u32>,
    pub format: Option<OutputFormat>,
}

impl SettingsOverrides {
    /// Layer these overrides on top of `base`.
    pub fn apply(&self, base: &ExportSettings) -> ExportSettings {
        ExportSettings {
            file_name: self
                .file_name
                .clone()
                .unwrap_or_else(|| base.file_name.clone()),
            compress_bounds: self.compress_bounds.unwrap_or(base.compress_bounds),
            pixel_resolution: self.pixel_resolution.unwrap_or(base.pixel_resolution),
            format: self.format.unwrap_or(base.format),
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub cells_drawn: usize,
    pub cells_failed: usize,
}

/// `<base_dir>/<subdir>/<file_name>.<ext>`, with the extension taken from
/// the format.
pub fn output_path(base_dir: &Path, subdir: &str, file_name: &str, format: OutputFormat) -> PathBuf {
    base_dir
        .join(subdir)
        .join(format!("{file_name}.{}", format.extension()))
}

/// Resolve the settings and output path a job would use for `tilemap`.
pub fn plan_output(tilemap: &LoadedTilemap, job: &ExportJob) -> TilebakeResult<(ExportSettings, PathBuf)> {
    let settings = job.overrides.apply(&tilemap.document.export);
    let file_name = settings.effective_file_name(&tilemap.document.name).trim();
    check_file_name(file_name)?;
    let base_dir = job.base_dir.as_deref().unwrap_or(&tilemap.root);
    let path = output_path(base_dir, &job.output_subdir, file_name, settings.format);
    Ok((settings, path))
}

/// The file name must name a single entry inside the output subdirectory.
fn check_file_name(file_name: &str) -> TilebakeResult<()> {
    if file_name.is_empty() {
        return Err(TilebakeError::invalid_settings(
            "no file name set and the tilemap has no name",
        ));
    }
    if file_name == "." || file_name == ".." || file_name.contains(['/', '\\']) {
        return Err(TilebakeError::invalid_settings(format!(
            "file name '{file_name}' must not contain path separators or be '.' or '..'"
        )));
    }
    Ok(())
}

/// Load the tilemap at `path` and export it.
pub fn export_tilemap_file(path: &Path, job: &ExportJob) -> TilebakeResult<ExportReport> {
    let mut tilemap = LoadedTilemap::load(path)?;
    export_tilemap(&mut tilemap, job)
}

/// Flatten a tilemap into an image file.
///
/// This is the main entry point for exporting. With `compress_bounds` set
/// the in-memory grid's bounds are shrunk as a side effect.
pub fn export_tilemap(tilemap: &mut LoadedTilemap, job: &ExportJob) -> TilebakeResult<ExportReport> {
    let (settings, output_path) = plan_output(tilemap, job)?;

    tracing::info!(
        tilemap = %tilemap.document.name,
        output = %output_path.display(),
        format = %settings.format,
        pixel_resolution = settings.pixel_resolution,
        "Starting export"
    );

    let name = tilemap.document.name.clone();
    let bounds = {
        let grid = tilemap
            .document
            .grid
            .as_mut()
            .ok_or_else(|| TilebakeError::no_grid(&name))?;
        resolve_bounds(grid, settings.compress_bounds, settings.pixel_resolution)?
    };

    let tilemap: &LoadedTilemap = tilemap;
    let grid = tilemap
        .document
        .grid
        .as_ref()
        .ok_or_else(|| TilebakeError::no_grid(&name))?;
    let source = AtlasTileSource::new(tilemap);
    let composition = compose(grid, &source, &bounds)?;

    if composition.cells_failed > 0 {
        tracing::warn!(
            failed = composition.cells_failed,
            "Some cells could not be drawn and were left transparent"
        );
    }

    encode_to_file(composition.buffer, &output_path, settings.format)?;

    tracing::info!(
        output = %output_path.display(),
        width = bounds.width(),
        height = bounds.height(),
        "Export complete"
    );

    Ok(ExportReport {
        output_path,
        format: settings.format,
        width: bounds.width(),
        height: bounds.height(),
        cells_drawn: composition.cells_drawn,
        cells_failed: composition.cells_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_extension_follows_format() {
        let base = Path::new("/project");
        for format in OutputFormat::ALL {
            let path = output_path(base, "Tilemap Images", "level", format);
            assert_eq!(
                path,
                PathBuf::from(format!("/project/Tilemap Images/level.{}", format.extension()))
            );
        }
    }

    #[test]
    fn test_overrides_apply_selectively() {
        let base = ExportSettings::default();
        let overrides = SettingsOverrides {
            format: Some(OutputFormat::Jpg),
            pixel_resolution: Some(16),
            ..SettingsOverrides::default()
        };
        let merged = overrides.apply(&base);
        assert_eq!(merged.format, OutputFormat::Jpg);
        assert_eq!(merged.pixel_resolution, 16);
        assert!(merged.compress_bounds);
        assert!(merged.file_name.is_empty());

        assert_eq!(SettingsOverrides::default().apply(&base), base);
    }

    #[test]
    fn test_plan_output_uses_map_name_when_file_name_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tilemap = LoadedTilemap::create(dir.path(), "caves").unwrap();
        let job = ExportJob::new(dir.path());

        let (settings, path) = plan_output(&tilemap, &job).unwrap();
        assert_eq!(settings.format, OutputFormat::Png);
        assert_eq!(path, dir.path().join("Tilemap Images").join("caves.png"));
    }

    #[test]
    fn test_plan_output_without_base_dir_writes_beside_tilemap() {
        let dir = tempfile::tempdir().unwrap();
        let tilemap = LoadedTilemap::create(dir.path(), "caves").unwrap();

        let (_, path) = plan_output(&tilemap, &ExportJob::beside_tilemap()).unwrap();
        assert_eq!(path, tilemap.root.join("Tilemap Images").join("caves.png"));
    }

    #[test]
    fn test_from_config_prefers_explicit_base() {
        let config = AppConfig {
            output_base_dir: Some(PathBuf::from("/configured")),
            output_subdir: "Baked".to_string(),
            ..AppConfig::default()
        };
        let job = ExportJob::from_config(&config, None);
        assert_eq!(job.base_dir, Some(PathBuf::from("/configured")));
        assert_eq!(job.output_subdir, "Baked");

        let job = ExportJob::from_config(&config, Some(Path::new("/explicit")));
        assert_eq!(job.base_dir, Some(PathBuf::from("/explicit")));
    }

    #[test]
    fn test_file_name_cannot_escape_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut tilemap = LoadedTilemap::create(dir.path(), "caves").unwrap();

        for name in ["../../x", "nested/level", "..\\level", "..", "."] {
            let job = ExportJob {
                overrides: SettingsOverrides {
                    file_name: Some(name.to_string()),
                    ..SettingsOverrides::default()
                },
                ..ExportJob::new(dir.path())
            };
            let err = plan_output(&tilemap, &job).unwrap_err();
            assert!(
                matches!(err, TilebakeError::InvalidSettings { .. }),
                "{name} was accepted"
            );
        }

        // Dots inside a name are fine.
        tilemap.document.export.file_name = "level..v2".to_string();
        let (_, path) = plan_output(&tilemap, &ExportJob::new(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("Tilemap Images").join("level..v2.png"));
    }

    #[test]
    fn test_export_from_unparsable_file_reports_tilemap_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.tilemap.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = export_tilemap_file(&path, &ExportJob::new(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            TilebakeError::Tilemap(tilebake_tilemap_model::TilemapError::ParseError { .. })
        ));
        assert!(!dir.path().join("Tilemap Images").exists());
    }

    #[test]
    fn test_missing_grid_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut tilemap = LoadedTilemap::create(dir.path(), "props").unwrap();
        tilemap.document.grid = None;

        let err = export_tilemap(&mut tilemap, &ExportJob::new(dir.path())).unwrap_err();
        assert!(matches!(err, TilebakeError::NoGridComponent { .. }));
        assert!(!dir.path().join("Tilemap Images").exists());
    }
}
