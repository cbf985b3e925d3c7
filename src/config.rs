//! Game configuration, optionally read from a JSON file.

use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use micromegas_tracing::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::STATUS_LINE_WIDTH;

pub const CONFIG_FILE: &str = "ananas.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub max_boxes: u32,
    pub message_log_lines: usize,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    /// On-screen size of one glyph cell, in pixels.
    pub cell_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            map_width: 80,
            map_height: 22,
            max_boxes: 10,
            message_log_lines: 3,
            seed: None,
            cell_size: 18.0,
        }
    }
}

impl GameConfig {
    /// Panel rows: the map, one status line, then the message log.
    pub fn display_height(&self) -> usize {
        self.map_height.max(0) as usize + 1 + self.message_log_lines
    }

    /// Panel columns: the map, widened if needed so the status line fits.
    pub fn display_width(&self) -> usize {
        (self.map_width.max(0) as usize).max(STATUS_LINE_WIDTH)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists, otherwise defaults. A broken file is
    /// reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return GameConfig::default();
        }
        match GameConfig::load(path) {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                GameConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "map_width": 40, "seed": 7 }"#).unwrap();
        assert_eq!(config.map_width, 40);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.map_height, 22);
        assert_eq!(config.max_boxes, 10);
    }

    #[test]
    fn display_height_adds_status_and_log() {
        let config = GameConfig::default();
        assert_eq!(config.display_height(), 22 + 1 + 3);
        assert_eq!(config.display_width(), 80);

        let narrow = GameConfig { map_width: 6, ..Default::default() };
        assert_eq!(narrow.display_width(), STATUS_LINE_WIDTH);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = GameConfig::load_or_default(Path::new("does/not/exist.json"));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn broken_file_is_a_parse_error() {
        let path = std::env::temp_dir().join("ananas_broken_config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = GameConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());
        let _ = std::fs::remove_file(&path);
    }
}
