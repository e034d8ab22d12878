use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::render::primitive::CompositeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowQuality {
    None,
    Low,
    #[default]
    Medium,
    High,
}

impl ShadowQuality {
    pub fn is_enabled(self) -> bool {
        !matches!(self, ShadowQuality::None)
    }
}

/// Per-call knobs supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Global alpha multiplied into every primitive (0.0-1.0)
    pub opacity: f32,

    /// Composite mode for feature primitives; post effects pick their own
    pub blend_mode: CompositeMode,

    /// Feather the outer edge of the face wash
    pub edge_smoothing: bool,

    /// Simulated directional light over the face
    pub color_adaptation: bool,

    /// Offset drop shadow; `none` disables it
    pub shadow_quality: ShadowQuality,

    /// Multiplier on every stroke width (0.0-2.0, exclusive of 0)
    pub intensity: f32,

    /// Draw the detected mesh on top for debugging
    pub show_landmarks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            opacity: 0.8,
            blend_mode: CompositeMode::SourceOver,
            edge_smoothing: true,
            color_adaptation: false,
            shadow_quality: ShadowQuality::Medium,
            intensity: 1.0,
            show_landmarks: false,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::InvalidValue {
                key: "render.opacity".to_string(),
                value: self.opacity.to_string(),
            }
            .into());
        }

        if !(self.intensity > 0.0 && self.intensity <= 2.0) {
            return Err(ConfigError::InvalidValue {
                key: "render.intensity".to_string(),
                value: self.intensity.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(RenderOptions::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values() {
        let options = RenderOptions { opacity: 1.5, ..Default::default() };
        assert!(options.validate().is_err());

        let options = RenderOptions { intensity: 0.0, ..Default::default() };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_shadow_quality() {
        assert!(!ShadowQuality::None.is_enabled());
        assert!(ShadowQuality::Low.is_enabled());
    }
}
