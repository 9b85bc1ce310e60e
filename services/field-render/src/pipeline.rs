//! End-to-end rendering: sample file in, PNG out.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use field_common::BoundingBox;
use grid_processor::{interpolate_with_stats, ClampRange, InterpolationConfig, InterpolationMethod};
use renderer::{render_field, save_png, PlotStyle};
use sample_parser::{read_samples_with_report, ParseOptions};
use serde::Serialize;
use tracing::{info, warn};

use crate::viewer;

/// Everything needed for one render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub input: PathBuf,
    pub parse: ParseOptions,
    pub interpolation: InterpolationConfig,
    pub style: PlotStyle,
    pub output: PathBuf,
    /// Open the written PNG in the system viewer.
    pub show: bool,
}

impl RenderRequest {
    /// Request with default parsing, gridding and style.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            parse: ParseOptions::default(),
            interpolation: InterpolationConfig::default(),
            style: PlotStyle::default(),
            output: output.into(),
            show: false,
        }
    }
}

/// What a render produced, printable as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub samples: usize,
    pub skipped_rows: usize,
    pub bbox: BoundingBox,
    pub nx: usize,
    pub ny: usize,
    pub method: InterpolationMethod,
    pub clamp: ClampRange,
    pub clamped_cells: usize,
    pub nan_cells: usize,
    /// Finite value range of the gridded field, if any.
    pub value_range: Option<(f64, f64)>,
    pub elapsed_ms: u64,
}

/// Parse, grid, render and save according to `request`.
pub fn run(request: &RenderRequest) -> Result<RenderSummary> {
    let start = Instant::now();

    let (samples, report) = read_samples_with_report(&request.input, &request.parse)
        .with_context(|| format!("Failed to read samples from {}", request.input.display()))?;

    let outcome = interpolate_with_stats(&samples, &request.interpolation)
        .context("Failed to interpolate temperature field")?;
    let field = outcome.field;

    let image = render_field(&field, &request.style, Some(&samples))
        .context("Failed to render temperature field")?;

    save_png(&image, &request.output)
        .with_context(|| format!("Failed to write {}", request.output.display()))?;

    let spec = field.spec();
    let summary = RenderSummary {
        input: request.input.clone(),
        output: request.output.clone(),
        samples: samples.len(),
        skipped_rows: report.skipped_rows,
        bbox: spec.bbox,
        nx: spec.nx,
        ny: spec.ny,
        method: request.interpolation.method,
        clamp: request.interpolation.clamp,
        clamped_cells: outcome.stats.clamped_cells,
        nan_cells: outcome.stats.nan_cells,
        value_range: field.finite_range(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        input = %summary.input.display(),
        output = %summary.output.display(),
        samples = summary.samples,
        method = %summary.method,
        elapsed_ms = summary.elapsed_ms,
        "Render complete"
    );

    if request.show {
        if let Err(e) = viewer::open_in_viewer(&request.output) {
            warn!(error = %e, "Could not display the rendered image");
        }
    }

    Ok(summary)
}
