//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TilebakeError, TilebakeResult};

/// Subdirectory that receives generated images, relative to the base path.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Tilemap Images";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base directory for generated images. When unset the directory of the
    /// tilemap document is used.
    #[serde(default)]
    pub output_base_dir: Option<PathBuf>,

    /// Subdirectory below the base directory that receives images.
    #[serde(default = "default_output_subdir")]
    pub output_subdir: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tilebake=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_base_dir: None,
            output_subdir: default_output_subdir(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: impl AsRef<Path>) -> Self {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Change where generated images go. Returns whether anything changed.
    pub fn set_output_location(
        &mut self,
        base_dir: Option<PathBuf>,
        subdir: Option<String>,
    ) -> TilebakeResult<bool> {
        let mut changed = false;
        if let Some(subdir) = subdir {
            let subdir = subdir.trim();
            if subdir.is_empty() || subdir == ".." || subdir.contains(['/', '\\']) {
                return Err(TilebakeError::invalid_settings(format!(
                    "output subdirectory '{subdir}' must be a single directory name"
                )));
            }
            changed |= self.output_subdir != subdir;
            self.output_subdir = subdir.to_string();
        }
        if let Some(base_dir) = base_dir {
            changed |= self.output_base_dir.as_ref() != Some(&base_dir);
            self.output_base_dir = Some(base_dir);
        }
        Ok(changed)
    }

    /// Base directory for output: the explicit override, then the configured
    /// base. `None` means the tilemap's own directory.
    pub fn base_dir_override(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.output_base_dir.clone())
    }
}

fn default_output_subdir() -> String {
    DEFAULT_OUTPUT_SUBDIR.to_string()
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tilebake").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.output_subdir, "Tilemap Images");
        assert!(config.output_base_dir.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig {
            output_base_dir: Some(PathBuf::from("/srv/maps")),
            output_subdir: "Baked".to_string(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: true,
            },
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.output_base_dir, Some(PathBuf::from("/srv/maps")));
        assert_eq!(loaded.output_subdir, "Baked");
        assert!(loaded.logging.json);
    }

    #[test]
    fn test_unparsable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.output_subdir, DEFAULT_OUTPUT_SUBDIR);
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"output_base_dir": "/maps"}"#).unwrap();
        assert_eq!(parsed.output_subdir, DEFAULT_OUTPUT_SUBDIR);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_set_output_location() {
        let mut config = AppConfig::default();
        assert!(!config.set_output_location(None, None).unwrap());

        let changed = config
            .set_output_location(Some(PathBuf::from("/srv/maps")), Some("Baked".into()))
            .unwrap();
        assert!(changed);
        assert_eq!(config.output_base_dir, Some(PathBuf::from("/srv/maps")));
        assert_eq!(config.output_subdir, "Baked");

        assert!(!config
            .set_output_location(Some(PathBuf::from("/srv/maps")), None)
            .unwrap());
    }

    #[test]
    fn test_output_subdir_must_be_single_name() {
        let mut config = AppConfig::default();
        for bad in ["", "  ", "..", "a/b", "a\\b"] {
            assert!(matches!(
                config.set_output_location(None, Some(bad.to_string())),
                Err(TilebakeError::InvalidSettings { .. })
            ));
        }
        assert_eq!(config.output_subdir, DEFAULT_OUTPUT_SUBDIR);
    }

    #[test]
    fn test_base_dir_override_precedence() {
        let mut config = AppConfig::default();
        assert_eq!(config.base_dir_override(None), None);

        config.output_base_dir = Some(PathBuf::from("/configured"));
        assert_eq!(
            config.base_dir_override(None),
            Some(PathBuf::from("/configured"))
        );
        assert_eq!(
            config.base_dir_override(Some(Path::new("/explicit"))),
            Some(PathBuf::from("/explicit"))
        );
    }
}
