//! Filled contour rendering.
//!
//! The value range is split into evenly spaced bands. Every pixel samples the
//! field bilinearly, falls into one band and takes that band's colour, which
//! produces the stepped look of a filled contour plot.

use field_common::FieldGrid;
use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use tracing::warn;

use crate::colormap::{Color, Colormap};
use crate::error::{RenderError, RenderResult};

/// Number of colour bands used when nothing else is configured.
pub const DEFAULT_LEVEL_COUNT: usize = 100;

/// Evenly spaced band edges over a value range.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevels {
    min: f64,
    max: f64,
    count: usize,
}

impl ContourLevels {
    /// `count` bands spanning `[min, max]`.
    ///
    /// A constant range is widened to `[min, min + 1]` so the bands still
    /// have non-zero width.
    pub fn new(min: f64, max: f64, count: usize) -> RenderResult<Self> {
        if count == 0 {
            return Err(RenderError::InvalidLevels(count));
        }
        let max = if max > min { max } else { min + 1.0 };
        Ok(Self { min, max, count })
    }

    /// Bands spanning the finite values of `field`.
    pub fn for_field(field: &FieldGrid, count: usize) -> RenderResult<Self> {
        match field.finite_range() {
            Some((lo, hi)) => Self::new(lo, hi, count),
            None => {
                warn!("Field has no finite values, using a unit colour scale");
                Self::new(0.0, 1.0, count)
            }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn step(&self) -> f64 {
        (self.max - self.min) / self.count as f64
    }

    /// All `count + 1` band edges from `min` to `max`.
    pub fn edges(&self) -> Vec<f64> {
        let step = self.step();
        (0..=self.count)
            .map(|k| {
                if k == self.count {
                    self.max
                } else {
                    self.min + k as f64 * step
                }
            })
            .collect()
    }

    /// Band index of `value`. Values outside the range saturate to the first
    /// or last band; `NaN` has no band.
    pub fn band_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let pos = ((value - self.min) / self.step()).floor();
        Some(pos.clamp(0.0, (self.count - 1) as f64) as usize)
    }

    /// Colour of a band: the colormap at the band's midpoint.
    pub fn band_color(&self, band: usize, colormap: Colormap) -> Color {
        let band = band.min(self.count - 1);
        colormap.sample((band as f64 + 0.5) / self.count as f64)
    }

    pub fn color_for(&self, value: f64, colormap: Colormap) -> Option<Color> {
        self.band_of(value).map(|band| self.band_color(band, colormap))
    }

    /// Pre-computed colours for every band.
    pub fn palette(&self, colormap: Colormap) -> Vec<Rgba<u8>> {
        (0..self.count)
            .map(|band| self.band_color(band, colormap).to_rgba())
            .collect()
    }
}

/// Rasterise `field` as a filled contour of `width` x `height` pixels.
///
/// Column 0 maps to the grid's minimum x and the bottom row to its minimum y.
/// Pixels whose bilinear sample is `NaN` take `no_data`.
pub fn render_filled_contours(
    field: &FieldGrid,
    levels: &ContourLevels,
    colormap: Colormap,
    width: u32,
    height: u32,
    no_data: Color,
) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return img;
    }

    let palette = levels.palette(colormap);
    let no_data = no_data.to_rgba();
    let max_i = (field.width() - 1) as f64;
    let max_j = (field.height() - 1) as f64;
    let row_bytes = width as usize * 4;

    img.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(py, row)| {
            // Image rows run top to bottom, grid rows bottom to top.
            let fy = 1.0 - (py as f64 + 0.5) / height as f64;
            let fj = fy * max_j;
            for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
                let fi = (px as f64 + 0.5) / width as f64 * max_i;
                let value = field.sample_bilinear(fi, fj);
                let color = levels
                    .band_of(value)
                    .map(|band| palette[band])
                    .unwrap_or(no_data);
                pixel.copy_from_slice(&color.0);
            }
        });

    img
}
