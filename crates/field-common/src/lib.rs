//! Common types shared across the temperature-field workspace.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod sample;

pub use bbox::{Axis, BoundingBox};
pub use error::{FieldError, FieldResult};
pub use grid::{FieldGrid, FieldStatistics, GridPoint, GridSpec, DEFAULT_RESOLUTION};
pub use sample::{Sample, SampleSet};
