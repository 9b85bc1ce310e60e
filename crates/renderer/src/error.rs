//! Error types for rendering and encoding.

use std::path::PathBuf;

use field_common::FieldError;
use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Canvas {width}x{height} leaves no room for the plot area")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Invalid colour '{0}': expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Invalid level count {0}: at least one level is required")]
    InvalidLevels(usize),

    #[error("Font could not be loaded: {0}")]
    Font(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<RenderError> for FieldError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Write { path, source } => FieldError::io(path, source),
            other => FieldError::Render(other.to_string()),
        }
    }
}
