//! Galaxy configuration.
//!
//! Every field has a default; a config file only needs the keys it changes.

use std::path::Path;

use serde::Deserialize;

use crate::error::GalaxyError;
use crate::render::camera::CameraConfig;
use crate::render::clock::SpinRates;
use crate::render::scene::SceneStyle;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub camera: CameraConfig,
    pub spin: SpinRates,
    pub style: SceneStyle,
}

impl GalaxyConfig {
    /// Parse and check a config. Camera limits that would break the view
    /// (inverted zoom range, unusable field of view) are rejected here.
    pub fn from_json_str(src: &str, path: &Path) -> Result<Self, GalaxyError> {
        let config: Self = serde_json::from_str(src).map_err(|source| GalaxyError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.camera.check().map_err(|reason| GalaxyError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, GalaxyError> {
        let src = std::fs::read_to_string(path).map_err(|source| GalaxyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&src, path)?;
        log::info!("config loaded from {}", path.display());
        Ok(config)
    }
}
