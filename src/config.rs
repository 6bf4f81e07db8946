// src/config.rs

//! Render settings, deserializable from an optional JSON file.
//!
//! Every field has a default, so a partial configuration file (or none at
//! all) is fine. The density histogram's bin count and smoothing sigma are
//! fixed constants in `crate::density`, not configuration.

use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The process-wide default configuration, used when no file is given.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::default);

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
}

/// Settings for the rasterized views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Square pixel block painted per grid cell.
    pub cell_size: u32,
    /// Upsampling factor of the interpolated view.
    pub upscale: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            cell_size: 4,
            upscale: 10,
        }
    }
}

impl Config {
    /// Loads a configuration from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.cell_size, 4);
        assert_eq!(config.render.upscale, 10);
    }

    #[test]
    fn partial_files_override_only_their_fields() {
        let config: Config = serde_json::from_str(r#"{"render":{"cell_size":8}}"#).unwrap();
        assert_eq!(config.render.cell_size, 8);
        assert_eq!(config.render.upscale, 10);
    }
}
