use thiserror::Error;

/// Main error type for the opera-face library
#[derive(Error, Debug)]
pub enum OperaError {
    #[error("Style catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Landmark error: {0}")]
    Landmark(#[from] LandmarkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Style catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Category not found: {key}")]
    CategoryNotFound { key: String },

    #[error("Character not found: {key}")]
    CharacterNotFound { key: String },

    #[error("Character {character} refers to missing base category {base}")]
    BaseCategoryMissing { character: String, base: String },

    #[error("Invalid color value: {value}")]
    InvalidColor { value: String },

    #[error("Catalog loading failed: {path} - {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Errors raised by a render sink while executing primitives
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid geometry in {primitive}: {reason}")]
    InvalidGeometry { primitive: String, reason: String },

    #[error("Drawing state restored without a matching save")]
    UnbalancedState,

    #[error("Render sink failed: {reason}")]
    SinkFailed { reason: String },
}

/// Landmark input errors
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("Failed to parse landmark frame: {reason}")]
    ParseFailed { reason: String },

    #[error("Landmark frame is empty")]
    Empty,
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using OperaError
pub type Result<T> = std::result::Result<T, OperaError>;

impl OperaError {
    /// Check if this error only affects the current frame
    ///
    /// Sink failures abort a single frame; the next frame starts from clean state.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Render(_) => true,
            Self::Landmark(_) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(CatalogError::CategoryNotFound { key })
            | Self::Catalog(CatalogError::CharacterNotFound { key }) => {
                format!(
                    "Style '{}' not found. Run `opera-face styles` to list categories and characters.",
                    key
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Landmark(LandmarkError::Empty) => {
                "No face was detected in the landmark input.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_are_recoverable() {
        let err: OperaError = RenderError::UnbalancedState.into();
        assert!(err.is_recoverable());

        let err: OperaError = CatalogError::CategoryNotFound { key: "xiao".into() }.into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_user_message_names_missing_style() {
        let err: OperaError = CatalogError::CharacterNotFound { key: "zhangfei".into() }.into();
        assert!(err.user_message().contains("zhangfei"));
    }
}
