//! Tests for full chart rendering.

use field_common::{BoundingBox, FieldGrid, GridSpec, Sample, SampleSet};
use image::{Rgba, RgbaImage};
use renderer::{render_field, Colormap, ContourLevels, PlotLayout, PlotStyle, RenderError};

// ============================================================================
// Helper functions
// ============================================================================

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 50x50 field over [0, 10] x [0, 5] rising from 0 on the left to 300 on the right.
fn ramp_field() -> FieldGrid {
    let spec = GridSpec::new(BoundingBox::new(0.0, 0.0, 10.0, 5.0), 50, 50).unwrap();
    let values = (0..spec.len())
        .map(|k| (k % spec.nx) as f64 / (spec.nx - 1) as f64 * 300.0)
        .collect();
    FieldGrid::new(spec, values).unwrap()
}

fn is_bluish(p: &Rgba<u8>) -> bool {
    p.0[2] > p.0[0]
}

fn is_reddish(p: &Rgba<u8>) -> bool {
    p.0[0] > p.0[2]
}

fn dark_pixels(img: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    (y0..y1)
        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
        .filter(|&(x, y)| img.get_pixel(x, y).0[0] < 100)
        .count()
}

// ============================================================================
// Layout and decorations
// ============================================================================

#[test]
fn test_default_canvas_size() {
    let img = render_field(&ramp_field(), &PlotStyle::default(), None).unwrap();
    assert_eq!(img.dimensions(), (800, 600));
    assert_eq!(*img.get_pixel(0, 0), WHITE);
    assert_eq!(*img.get_pixel(799, 599), WHITE);
}

#[test]
fn test_plot_area_runs_cool_to_warm() {
    let img = render_field(&ramp_field(), &PlotStyle::default(), None).unwrap();
    let layout = PlotLayout::new(800, 600).unwrap();
    let mid_y = layout.plot.y + layout.plot.height / 2;

    assert!(is_bluish(img.get_pixel(layout.plot.x + 5, mid_y)));
    assert!(is_reddish(img.get_pixel(layout.plot.right() - 6, mid_y)));
}

#[test]
fn test_colorbar_top_warm_bottom_cool() {
    let img = render_field(&ramp_field(), &PlotStyle::default(), None).unwrap();
    let bar = PlotLayout::new(800, 600).unwrap().colorbar;
    let cx = bar.x + bar.width / 2;

    assert!(is_reddish(img.get_pixel(cx, bar.y + 3)));
    assert!(is_bluish(img.get_pixel(cx, bar.bottom() - 4)));
}

#[test]
fn test_text_is_drawn() {
    let img = render_field(&ramp_field(), &PlotStyle::default(), None).unwrap();
    let layout = PlotLayout::new(800, 600).unwrap();

    // Title above the plot.
    assert!(dark_pixels(&img, layout.plot.x, 5, layout.plot.right(), layout.plot.y - 5) > 20);
    // X label and tick labels below it.
    assert!(dark_pixels(&img, layout.plot.x, layout.plot.bottom() + 2, layout.plot.right(), 600) > 20);
    // Y label and tick labels to the left.
    assert!(dark_pixels(&img, 0, layout.plot.y, layout.plot.x - 2, layout.plot.bottom()) > 20);
    // Colour bar ticks and label to the right.
    assert!(dark_pixels(&img, layout.colorbar.right() + 2, layout.plot.y, 800, layout.plot.bottom()) > 20);
}

#[test]
fn test_blank_labels_leave_margins_empty() {
    let style = PlotStyle {
        title: String::new(),
        ..PlotStyle::default()
    };
    let img = render_field(&ramp_field(), &style, None).unwrap();
    let layout = PlotLayout::new(800, 600).unwrap();
    assert_eq!(dark_pixels(&img, layout.plot.x, 0, layout.plot.right(), layout.plot.y - 10), 0);
}

// ============================================================================
// Field content
// ============================================================================

#[test]
fn test_nan_cells_show_background() {
    let spec = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 10, 10).unwrap();
    let values = (0..100)
        .map(|k| if k % 10 < 5 { 100.0 + k as f64 } else { f64::NAN })
        .collect();
    let field = FieldGrid::new(spec, values).unwrap();

    let img = render_field(&field, &PlotStyle::default(), None).unwrap();
    let layout = PlotLayout::new(800, 600).unwrap();
    let mid_y = layout.plot.y + layout.plot.height / 2;

    assert_eq!(*img.get_pixel(layout.plot.right() - 10, mid_y), WHITE);
    assert_ne!(*img.get_pixel(layout.plot.x + 10, mid_y), WHITE);
}

#[test]
fn test_constant_field_renders() {
    let spec = GridSpec::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 4, 4).unwrap();
    let field = FieldGrid::new(spec, vec![150.0; 16]).unwrap();
    let img = render_field(&field, &PlotStyle::default(), None).unwrap();

    let layout = PlotLayout::new(800, 600).unwrap();
    let levels = ContourLevels::new(150.0, 150.0, 100).unwrap();
    let expected = levels.band_color(0, Colormap::Coolwarm).to_rgba();
    assert_eq!(*img.get_pixel(layout.plot.x + 100, layout.plot.y + 100), expected);
}

#[test]
fn test_sample_markers_have_black_edge() {
    let samples = SampleSet::new(vec![Sample::new(5.0, 2.5, 150.0)]);
    let style = PlotStyle::default().with_samples(true);
    let img = render_field(&ramp_field(), &style, Some(&samples)).unwrap();

    let layout = PlotLayout::new(800, 600).unwrap();
    let (px, py) = layout.to_pixel(&BoundingBox::new(0.0, 0.0, 10.0, 5.0), 5.0, 2.5);
    let (cx, cy) = (px.round() as u32, py.round() as u32);
    assert_eq!(*img.get_pixel(cx + 4, cy), BLACK);
    assert_ne!(*img.get_pixel(cx, cy), BLACK);

    let plain = render_field(&ramp_field(), &PlotStyle::default(), Some(&samples)).unwrap();
    assert_ne!(*plain.get_pixel(cx + 4, cy), BLACK);
}

#[test]
fn test_custom_size() {
    let style = PlotStyle::default().with_size(400, 300);
    let img = render_field(&ramp_field(), &style, None).unwrap();
    assert_eq!(img.dimensions(), (400, 300));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_tiny_canvas_rejected() {
    let style = PlotStyle::default().with_size(100, 100);
    assert!(matches!(
        render_field(&ramp_field(), &style, None),
        Err(RenderError::InvalidCanvas { .. })
    ));
}

#[test]
fn test_bad_color_rejected() {
    let style = PlotStyle {
        no_data: "grey".to_string(),
        ..PlotStyle::default()
    };
    assert!(matches!(
        render_field(&ramp_field(), &style, None),
        Err(RenderError::InvalidColor(_))
    ));
}
