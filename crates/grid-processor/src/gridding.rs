//! Gridding: scattered samples to a clamped regular field.

use std::time::Instant;

use field_common::{Axis, FieldError, FieldGrid, FieldResult, GridSpec, SampleSet};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ClampRange, InterpolationConfig};
use crate::interpolation::build_interpolator;

/// Counters collected while building a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GriddingStats {
    /// Cells whose interpolated value fell outside the clamp range.
    pub clamped_cells: usize,
    /// Cells with no estimate (outside the convex hull).
    pub nan_cells: usize,
}

/// Result of [`interpolate_with_stats`].
#[derive(Debug, Clone)]
pub struct GriddingOutcome {
    pub field: FieldGrid,
    pub stats: GriddingStats,
}

/// Grid geometry for `samples`: the sample bounding box at `nx` x `ny`.
///
/// Fails with [`FieldError::NoSamples`] for an empty set and with
/// [`FieldError::DegenerateGeometry`] when every sample shares one x or one y.
pub fn build_grid_spec(samples: &SampleSet, nx: usize, ny: usize) -> FieldResult<GridSpec> {
    let bbox = samples.bbox().ok_or(FieldError::NoSamples)?;
    if let Some(axis) = bbox.zero_extent_axis() {
        let value = match axis {
            Axis::X => bbox.min_x,
            Axis::Y => bbox.min_y,
        };
        return Err(FieldError::DegenerateGeometry { axis, value });
    }
    GridSpec::new(bbox, nx, ny)
}

/// Clamp every finite cell into `clamp`, returning how many changed.
pub fn clamp_field(values: &mut [f64], clamp: ClampRange) -> usize {
    values
        .iter_mut()
        .filter(|v| !v.is_nan())
        .map(|v| {
            let clamped = clamp.apply(*v);
            let changed = clamped != *v;
            *v = clamped;
            changed
        })
        .filter(|&changed| changed)
        .count()
}

/// Interpolate `samples` onto a regular grid and clamp the result.
pub fn interpolate(samples: &SampleSet, config: &InterpolationConfig) -> FieldResult<FieldGrid> {
    interpolate_with_stats(samples, config).map(|outcome| outcome.field)
}

/// Like [`interpolate`], also reporting clamp and hull counters.
pub fn interpolate_with_stats(
    samples: &SampleSet,
    config: &InterpolationConfig,
) -> FieldResult<GriddingOutcome> {
    config.validate()?;
    let spec = build_grid_spec(samples, config.nx, config.ny)?;

    let start = Instant::now();
    let interpolator = build_interpolator(samples, config.method)?;
    debug!(
        method = %config.method,
        samples = samples.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Interpolator ready"
    );

    let xs = spec.x_coords();
    let mut values = vec![f64::NAN; spec.len()];
    values
        .par_chunks_mut(spec.nx)
        .enumerate()
        .for_each(|(j, row)| {
            let y = spec.y_at(j);
            for (cell, &x) in row.iter_mut().zip(&xs) {
                *cell = interpolator.interpolate_at(x, y);
            }
        });

    let clamped_cells = clamp_field(&mut values, config.clamp);
    let nan_cells = values.iter().filter(|v| v.is_nan()).count();
    if nan_cells == values.len() {
        warn!(method = %config.method, "Interpolation produced no finite cells");
    }

    info!(
        method = %config.method,
        nx = spec.nx,
        ny = spec.ny,
        clamped_cells,
        nan_cells,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Interpolated temperature field"
    );

    Ok(GriddingOutcome {
        field: FieldGrid::new(spec, values)?,
        stats: GriddingStats {
            clamped_cells,
            nan_cells,
        },
    })
}
