//! Chart composition: plot area, axes, colour bar, title and sample markers.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Temperature Field            │
//! │      ┌──────────────────────────┐  ┌──┐      │
//! │   Y  │                          │  │  │ 300  │
//! │      │     filled contours      │  │  │   T  │
//! │      │                          │  │  │      │
//! │      └──────────────────────────┘  └──┘ 0    │
//! │                X Coordinate                  │
//! └──────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use field_common::{BoundingBox, FieldGrid, SampleSet};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_line_segment_mut,
};
use imageproc::rect::Rect;
use tracing::{debug, info, warn};

use crate::colormap::Color;
use crate::contour::{render_filled_contours, ContourLevels};
use crate::error::{RenderError, RenderResult};
use crate::style::PlotStyle;
use crate::text::{Anchor, TextRenderer};

const MARGIN_LEFT: u32 = 80;
const MARGIN_TOP: u32 = 50;
const MARGIN_BOTTOM: u32 = 60;
const COLORBAR_GAP: u32 = 25;
const COLORBAR_WIDTH: u32 = 20;
const COLORBAR_LABELS: u32 = 85;
const MIN_PLOT_SIZE: u32 = 20;

const TICK_LENGTH: i32 = 5;
const TARGET_TICKS: usize = 6;
const MARKER_RADIUS: i32 = 4;

const TITLE_SIZE: f32 = 20.0;
const LABEL_SIZE: f32 = 15.0;
const TICK_SIZE: f32 = 12.0;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    fn to_rect(self) -> Rect {
        Rect::at(self.x as i32, self.y as i32).of_size(self.width, self.height)
    }
}

/// Placement of the plot area and colour bar on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotLayout {
    pub width: u32,
    pub height: u32,
    pub plot: PixelRect,
    pub colorbar: PixelRect,
}

impl PlotLayout {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let reserved_x = MARGIN_LEFT + COLORBAR_GAP + COLORBAR_WIDTH + COLORBAR_LABELS;
        let reserved_y = MARGIN_TOP + MARGIN_BOTTOM;
        let plot_w = width.saturating_sub(reserved_x);
        let plot_h = height.saturating_sub(reserved_y);
        if plot_w < MIN_PLOT_SIZE || plot_h < MIN_PLOT_SIZE {
            return Err(RenderError::InvalidCanvas { width, height });
        }

        let plot = PixelRect {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: plot_w,
            height: plot_h,
        };
        let colorbar = PixelRect {
            x: plot.right() + COLORBAR_GAP,
            y: plot.y,
            width: COLORBAR_WIDTH,
            height: plot_h,
        };
        Ok(Self {
            width,
            height,
            plot,
            colorbar,
        })
    }

    /// Pixel position of data coordinates `(x, y)` within the plot area.
    pub fn to_pixel(&self, bbox: &BoundingBox, x: f64, y: f64) -> (f32, f32) {
        let fx = (x - bbox.min_x) / bbox.width();
        let fy = (y - bbox.min_y) / bbox.height();
        let px = self.plot.x as f64 + fx * (self.plot.width - 1) as f64;
        let py = self.plot.y as f64 + (1.0 - fy) * (self.plot.height - 1) as f64;
        (px as f32, py as f32)
    }
}

/// Tick values at 1, 2 or 5 times a power of ten covering `[min, max]`.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }
    if max == min {
        return vec![min];
    }

    let step = nice_step(max - min, target);
    let first = (min / step).ceil();
    let last = (max / step).floor();
    let eps = step * 1e-9;
    let mut ticks: Vec<f64> = (0..=((last - first).max(0.0) as usize))
        .map(|k| (first + k as f64) * step)
        .filter(|t| *t >= min - eps && *t <= max + eps)
        .map(|t| if t.abs() < eps { 0.0 } else { t })
        .collect();
    ticks.dedup();
    ticks
}

fn nice_step(span: f64, target: usize) -> f64 {
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Format a tick with just enough decimals for its spacing.
pub fn format_tick(value: f64, ticks: &[f64]) -> String {
    let step = ticks
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(f64::INFINITY, f64::min);
    let decimals = if step.is_finite() && step < 1.0 {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    format!("{value:.decimals$}")
}

/// Render a temperature field as a complete chart.
///
/// `samples` are drawn as markers when `style.show_samples` is set.
pub fn render_field(
    field: &FieldGrid,
    style: &PlotStyle,
    samples: Option<&SampleSet>,
) -> RenderResult<RgbaImage> {
    let start = Instant::now();
    let layout = PlotLayout::new(style.width, style.height)?;
    let background = style.background_color()?;
    let foreground = style.foreground_color()?.to_rgba();
    let no_data = style.no_data_color()?;
    let levels = ContourLevels::for_field(field, style.levels)?;
    let text = TextRenderer::load(&style.font)?;

    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, background.to_rgba());

    let raster = render_filled_contours(
        field,
        &levels,
        style.colormap,
        layout.plot.width,
        layout.plot.height,
        no_data,
    );
    imageops::replace(&mut canvas, &raster, layout.plot.x as i64, layout.plot.y as i64);

    let bbox = field.spec().bbox;
    if style.show_samples {
        match samples {
            Some(samples) if !samples.is_empty() => {
                draw_samples(&mut canvas, &layout, &bbox, samples, &levels, style, foreground)
            }
            _ => warn!("Sample overlay requested but no samples were provided"),
        }
    }

    draw_hollow_rect_mut(&mut canvas, layout.plot.to_rect(), foreground);
    draw_axes(&mut canvas, &layout, &bbox, &text, foreground);
    draw_colorbar(&mut canvas, &layout, &levels, style, &text, foreground);

    let plot = layout.plot;
    text.draw(
        &mut canvas,
        &style.title,
        (plot.x + plot.width / 2) as i32,
        15,
        TITLE_SIZE,
        Anchor::Center,
        foreground,
    );
    text.draw(
        &mut canvas,
        &style.x_label,
        (plot.x + plot.width / 2) as i32,
        plot.bottom() as i32 + 28,
        LABEL_SIZE,
        Anchor::Center,
        foreground,
    );
    text.draw_vertical(
        &mut canvas,
        &style.y_label,
        18,
        (plot.y + plot.height / 2) as i32,
        LABEL_SIZE,
        foreground,
    );

    info!(
        width = layout.width,
        height = layout.height,
        levels = levels.count(),
        value_min = levels.min(),
        value_max = levels.max(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Rendered temperature field"
    );
    Ok(canvas)
}

fn draw_axes(
    canvas: &mut RgbaImage,
    layout: &PlotLayout,
    bbox: &BoundingBox,
    text: &TextRenderer,
    color: Rgba<u8>,
) {
    let plot = layout.plot;
    let bottom = (plot.bottom() - 1) as f32;
    let left = plot.x as f32;

    let x_ticks = nice_ticks(bbox.min_x, bbox.max_x, TARGET_TICKS);
    for &t in &x_ticks {
        let (px, _) = layout.to_pixel(bbox, t, bbox.min_y);
        draw_line_segment_mut(canvas, (px, bottom), (px, bottom + TICK_LENGTH as f32), color);
        text.draw(
            canvas,
            &format_tick(t, &x_ticks),
            px.round() as i32,
            bottom as i32 + TICK_LENGTH + 3,
            TICK_SIZE,
            Anchor::Center,
            color,
        );
    }

    let y_ticks = nice_ticks(bbox.min_y, bbox.max_y, TARGET_TICKS);
    for &t in &y_ticks {
        let (_, py) = layout.to_pixel(bbox, bbox.min_x, t);
        draw_line_segment_mut(canvas, (left - TICK_LENGTH as f32, py), (left, py), color);
        let label = format_tick(t, &y_ticks);
        let (_, h) = text.measure(&label, TICK_SIZE);
        text.draw(
            canvas,
            &label,
            plot.x as i32 - TICK_LENGTH - 3,
            py.round() as i32 - h / 2,
            TICK_SIZE,
            Anchor::Right,
            color,
        );
    }
    debug!(x_ticks = x_ticks.len(), y_ticks = y_ticks.len(), "Drew axes");
}

fn draw_colorbar(
    canvas: &mut RgbaImage,
    layout: &PlotLayout,
    levels: &ContourLevels,
    style: &PlotStyle,
    text: &TextRenderer,
    color: Rgba<u8>,
) {
    let bar = layout.colorbar;
    let span = levels.max() - levels.min();
    let rows = bar.height.max(2) - 1;

    for row in 0..bar.height {
        // Top row is the maximum.
        let value = levels.max() - span * row as f64 / rows as f64;
        let band = levels.band_color(levels.band_of(value).unwrap_or(0), style.colormap);
        draw_filled_rect_mut(
            canvas,
            Rect::at(bar.x as i32, (bar.y + row) as i32).of_size(bar.width, 1),
            band.to_rgba(),
        );
    }
    draw_hollow_rect_mut(canvas, bar.to_rect(), color);

    let ticks = nice_ticks(levels.min(), levels.max(), TARGET_TICKS);
    let right = bar.right() as f32;
    for &t in &ticks {
        let py = bar.y as f32 + ((levels.max() - t) / span * rows as f64) as f32;
        draw_line_segment_mut(canvas, (right, py), (right + TICK_LENGTH as f32, py), color);
        let label = format_tick(t, &ticks);
        let (_, h) = text.measure(&label, TICK_SIZE);
        text.draw(
            canvas,
            &label,
            bar.right() as i32 + TICK_LENGTH + 3,
            py.round() as i32 - h / 2,
            TICK_SIZE,
            Anchor::Left,
            color,
        );
    }

    text.draw_vertical(
        canvas,
        &style.colorbar_label,
        (bar.right() + COLORBAR_LABELS - 15) as i32,
        (bar.y + bar.height / 2) as i32,
        LABEL_SIZE,
        color,
    );
}

fn draw_samples(
    canvas: &mut RgbaImage,
    layout: &PlotLayout,
    bbox: &BoundingBox,
    samples: &SampleSet,
    levels: &ContourLevels,
    style: &PlotStyle,
    edge: Rgba<u8>,
) {
    let fill_default = Color::BLACK;
    for s in samples {
        let (px, py) = layout.to_pixel(bbox, s.x, s.y);
        let center = (px.round() as i32, py.round() as i32);
        let fill = levels
            .color_for(s.temperature, style.colormap)
            .unwrap_or(fill_default);
        draw_filled_circle_mut(canvas, center, MARKER_RADIUS, fill.to_rgba());
        draw_hollow_circle_mut(canvas, center, MARKER_RADIUS, edge);
    }
    debug!(markers = samples.len(), "Drew sample overlay");
}
