use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    render::RenderOptions,
};

/// Main configuration for opera-face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file replacing the built-in styles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Default per-frame render options
    pub render: RenderOptions,

    /// Layout engine settings
    pub engine: EngineConfig,

    /// Output surface settings
    pub canvas: CanvasConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.engine.validate()?;
        self.canvas.validate()?;
        Ok(())
    }
}

/// Layout engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of cached gradients before the cache is emptied
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { cache_capacity: 256 }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.cache_capacity".to_string(),
                value: self.cache_capacity.to_string()
            }.into());
        }
        Ok(())
    }
}

/// Raster output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Width in pixels when no background image sets it
    pub width: u32,

    /// Height in pixels when no background image sets it
    pub height: u32,

    /// Smooth shape edges
    pub anti_aliasing: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            anti_aliasing: true,
        }
    }
}

impl CanvasConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "canvas.size".to_string(),
                value: format!("{}x{}", self.width, self.height)
            }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CompositeMode, ShadowQuality};
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.catalog = Some(PathBuf::from("styles.toml"));
        original_config.render.blend_mode = CompositeMode::Multiply;
        original_config.render.shadow_quality = ShadowQuality::None;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [render]
            opacity = 0.5
            blend_mode = "soft-light"

            [canvas]
            width = 1280
            "#,
        )
        .unwrap();

        assert_eq!(config.render.opacity, 0.5);
        assert_eq!(config.render.blend_mode, CompositeMode::SoftLight);
        assert!(config.render.edge_smoothing);
        assert_eq!(config.canvas.width, 1280);
        assert_eq!(config.canvas.height, 480);
        assert_eq!(config.engine.cache_capacity, 256);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/opera-face.toml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.render.opacity = 1.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.engine.cache_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.canvas.height = 0;
        assert!(config.validate().is_err());
    }
}
