//! Error types for Ember

use thiserror::Error;

/// The main error type for Ember operations
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("Malformed config: {0}")]
    MalformedConfig(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },

    #[error("Invalid lifespan: {0} (emission disabled)")]
    InvalidLifespan(f32),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Texture load error: {0}")]
    TextureLoadError(String),

    #[error("Markup parse error: {0}")]
    MarkupError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

impl EmberError {
    /// True for every variant that means the descriptor itself is unusable.
    pub fn is_malformed_config(&self) -> bool {
        matches!(
            self,
            EmberError::MalformedConfig(_)
                | EmberError::MissingRequiredField(_)
                | EmberError::InvalidNumber { .. }
                | EmberError::InvalidEnumValue { .. }
                | EmberError::MarkupError(_)
                | EmberError::TomlParseError(_)
        )
    }
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;

impl From<toml::de::Error> for EmberError {
    fn from(err: toml::de::Error) -> Self {
        EmberError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for EmberError {
    fn from(err: toml::ser::Error) -> Self {
        EmberError::TomlSerError(err.to_string())
    }
}
