//! Scattered-data gridding for temperature fields.
//!
//! Turns an unordered [`SampleSet`](field_common::SampleSet) into a regular
//! [`FieldGrid`](field_common::FieldGrid) spanning the samples' bounding box.
//!
//! # Pipeline
//!
//! ```text
//! SampleSet
//!      │
//!      ├─► build_grid_spec (bounding box, nx x ny)
//!      │
//!      ├─► build_interpolator(method)
//!      │         ├─► nearest: sorted sweep, defined everywhere
//!      │         └─► linear / cubic: Delaunay triangulation, NaN outside hull
//!      │
//!      ├─► evaluate rows in parallel
//!      │
//!      └─► clamp_field (default 0..300)
//!               │
//!               ▼
//!          FieldGrid
//! ```
//!
//! # Example
//!
//! ```
//! use field_common::{Sample, SampleSet};
//! use grid_processor::{interpolate, InterpolationConfig};
//!
//! let samples = SampleSet::new(vec![
//!     Sample::new(0.0, 0.0, 10.0),
//!     Sample::new(1.0, 0.0, 20.0),
//!     Sample::new(0.0, 1.0, 30.0),
//! ]);
//! let field = interpolate(&samples, &InterpolationConfig::default()).unwrap();
//! assert_eq!((field.width(), field.height()), (100, 100));
//! ```

pub mod config;
pub mod gridding;
pub mod interpolation;

// Re-export commonly used types at crate root
pub use config::{ClampRange, InterpolationConfig, InterpolationMethod};
pub use gridding::{
    build_grid_spec, clamp_field, interpolate, interpolate_with_stats, GriddingOutcome,
    GriddingStats,
};
pub use interpolation::{build_interpolator, ScatteredInterpolator};
