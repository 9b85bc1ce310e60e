//! Configuration for scattered-data interpolation.

use std::fmt;
use std::str::FromStr;

use field_common::{FieldError, FieldResult, DEFAULT_RESOLUTION};
use serde::{Deserialize, Serialize};

/// Scattered-data interpolation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Value of the closest sample (piecewise constant, defined everywhere).
    #[default]
    Nearest,
    /// Barycentric interpolation on a Delaunay triangulation.
    Linear,
    /// Cubic Bezier patches on a Delaunay triangulation.
    Cubic,
}

impl InterpolationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Linear => "linear",
            Self::Cubic => "cubic",
        }
    }

    /// Whether the method leaves cells outside the convex hull as `NaN`.
    pub fn needs_triangulation(&self) -> bool {
        !matches!(self, Self::Nearest)
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterpolationMethod {
    type Err = FieldError;

    /// Parse from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            "cubic" => Ok(Self::Cubic),
            other => Err(FieldError::UnknownMethod(other.to_string())),
        }
    }
}

/// Closed interval that interpolated values are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    /// Lower bound of the default range.
    pub const DEFAULT_MIN: f64 = 0.0;
    /// Upper bound of the default range.
    ///
    /// Older tooling described this range as "0 to 500 degrees" while
    /// clamping at 300. The value below keeps the 300 behaviour.
    pub const DEFAULT_MAX: f64 = 300.0;

    pub fn new(min: f64, max: f64) -> FieldResult<Self> {
        if !(min <= max) {
            return Err(FieldError::InvalidClampRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Clamp a value, leaving `NaN` untouched.
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            value
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ClampRange {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

/// Configuration for building a field from scattered samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Interpolation method.
    pub method: InterpolationMethod,

    /// Grid points along X.
    pub nx: usize,

    /// Grid points along Y.
    pub ny: usize,

    /// Range the interpolated values are clamped to.
    pub clamp: ClampRange,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::default(),
            nx: DEFAULT_RESOLUTION,
            ny: DEFAULT_RESOLUTION,
            clamp: ClampRange::default(),
        }
    }
}

impl InterpolationConfig {
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_resolution(mut self, nx: usize, ny: usize) -> Self {
        self.nx = nx;
        self.ny = ny;
        self
    }

    pub fn with_clamp(mut self, clamp: ClampRange) -> Self {
        self.clamp = clamp;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> FieldResult<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(FieldError::InvalidResolution {
                nx: self.nx,
                ny: self.ny,
            });
        }
        ClampRange::new(self.clamp.min, self.clamp.max)?;
        Ok(())
    }
}
