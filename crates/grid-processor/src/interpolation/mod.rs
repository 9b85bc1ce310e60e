//! Scattered-data interpolators.
//!
//! Each interpolator is built once from a [`SampleSet`] and then queried at
//! arbitrary points. Queries are read-only, so grid rows can be evaluated in
//! parallel.

pub mod cubic;
pub mod delaunay;
pub mod linear;
pub mod nearest;

pub use cubic::CubicInterpolator;
pub use delaunay::Triangulation;
pub use linear::LinearInterpolator;
pub use nearest::NearestInterpolator;

use field_common::{FieldResult, SampleSet};

use crate::config::InterpolationMethod;

/// Estimates a field value at a query point from scattered samples.
pub trait ScatteredInterpolator: Send + Sync {
    /// Value at `(x, y)`, or `NaN` where the method has no estimate.
    fn interpolate_at(&self, x: f64, y: f64) -> f64;
}

/// Build the interpolator for `method`.
pub fn build_interpolator(
    samples: &SampleSet,
    method: InterpolationMethod,
) -> FieldResult<Box<dyn ScatteredInterpolator>> {
    Ok(match method {
        InterpolationMethod::Nearest => Box::new(NearestInterpolator::new(samples)?),
        InterpolationMethod::Linear => Box::new(LinearInterpolator::new(samples)?),
        InterpolationMethod::Cubic => Box::new(CubicInterpolator::new(samples)?),
    })
}
