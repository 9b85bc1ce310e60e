//! Error types for the temperature-field pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::bbox::Axis;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// Primary error type for parsing, interpolation and rendering.
#[derive(Debug, Error)]
pub enum FieldError {
    // === Input Errors ===
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row at line {line}: expected 3 fields, found {tokens}")]
    MalformedRow { line: usize, tokens: usize },

    #[error("Invalid number '{token}' at line {line}, column {column}")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("Invalid decimal separator '{0}': expected '.' or ','")]
    InvalidSeparator(String),

    // === Geometry Errors ===
    #[error("No samples to interpolate")]
    NoSamples,

    #[error(
        "Degenerate geometry: all samples share {axis} = {value}, \
         the bounding box has zero extent along {axis}"
    )]
    DegenerateGeometry { axis: Axis, value: f64 },

    #[error("Extent along {axis} from {min} to {max} is too large to grid")]
    ExtentOverflow { axis: Axis, min: f64, max: f64 },

    #[error("Invalid grid resolution {nx}x{ny}: each axis needs at least 2 points")]
    InvalidResolution { nx: usize, ny: usize },

    #[error("Invalid clamp range [{min}, {max}]: min must not exceed max")]
    InvalidClampRange { min: f64, max: f64 },

    #[error("Unknown interpolation method '{0}': expected nearest, linear or cubic")]
    UnknownMethod(String),

    #[error("Triangulation failed: {0}")]
    Triangulation(String),

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),
}

impl FieldError {
    /// Wrap an IO error with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FieldError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error comes from the input file rather than the geometry.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FieldError::Io { .. }
                | FieldError::MalformedRow { .. }
                | FieldError::InvalidNumber { .. }
                | FieldError::InvalidSeparator(_)
        )
    }
}
