//! Integration tests for gridding scattered temperature samples.

use field_common::{Axis, FieldError, Sample, SampleSet};
use grid_processor::{
    interpolate, interpolate_with_stats, ClampRange, InterpolationConfig, InterpolationMethod,
};
use sample_parser::{parse_samples, DecimalSeparator, ParseOptions};
use test_utils::{
    assert_approx_eq, create_hot_spot_samples, create_linear_field_samples,
    create_scattered_samples, END_TO_END_COMMA, VERTICAL_LINE,
};

fn three_samples() -> SampleSet {
    parse_samples(END_TO_END_COMMA, &ParseOptions::new(DecimalSeparator::Comma)).unwrap()
}

// =============================================================================
// GRID SHAPE AND BOUNDS
// =============================================================================

#[test]
fn test_default_grid_is_100_by_100() {
    let field = interpolate(&three_samples(), &InterpolationConfig::default()).unwrap();
    assert_eq!(field.width(), 100);
    assert_eq!(field.height(), 100);
    assert_eq!(field.values().len(), 10_000);
}

#[test]
fn test_grid_spans_sample_bounds() {
    let samples = create_scattered_samples(40, 12.0, 3.0, 11, |x, y| x * y);
    let field = interpolate(&samples, &InterpolationConfig::default()).unwrap();
    let spec = field.spec();
    assert_eq!(spec.x_at(0), 0.0);
    assert_eq!(spec.x_at(99), 12.0);
    assert_eq!(spec.y_at(0), 0.0);
    assert_eq!(spec.y_at(99), 3.0);
}

// =============================================================================
// NEAREST NEIGHBOUR
// =============================================================================

#[test]
fn test_end_to_end_nearest_values() {
    let field = interpolate(&three_samples(), &InterpolationConfig::default()).unwrap();

    assert_eq!(field.value(0, 0), Some(10.0));
    assert_eq!(field.value(99, 0), Some(20.0));
    assert_eq!(field.value(0, 99), Some(30.0));
    assert!(field
        .values()
        .iter()
        .all(|v| [10.0, 20.0, 30.0].contains(v)));
}

#[test]
fn test_nearest_matches_samples_on_grid_nodes() {
    // Every other node of a 9x9 grid coincides with a 5x5 sample lattice.
    let samples = create_linear_field_samples(5, 0.0, 10.0, 20.0);
    let config = InterpolationConfig::default().with_resolution(9, 9);
    let field = interpolate(&samples, &config).unwrap();

    for s in &samples {
        let (i, j) = field.spec().nearest_index(s.x, s.y).unwrap();
        assert_eq!(field.value(i, j), Some(s.temperature));
    }
}

#[test]
fn test_nearest_defined_everywhere() {
    let samples = create_scattered_samples(30, 5.0, 5.0, 3, |x, _| x * 10.0);
    let outcome = interpolate_with_stats(&samples, &InterpolationConfig::default()).unwrap();
    assert_eq!(outcome.stats.nan_cells, 0);
    assert!(outcome.field.values().iter().all(|v| v.is_finite()));
}

// =============================================================================
// CLAMPING
// =============================================================================

#[test]
fn test_values_clamped_to_default_range() {
    let samples = create_hot_spot_samples(11);
    for method in [
        InterpolationMethod::Nearest,
        InterpolationMethod::Linear,
        InterpolationMethod::Cubic,
    ] {
        let config = InterpolationConfig::default().with_method(method);
        let outcome = interpolate_with_stats(&samples, &config).unwrap();
        assert!(outcome.stats.clamped_cells > 0, "{method}: nothing clamped");

        let (lo, hi) = outcome.field.finite_range().unwrap();
        assert_eq!(lo, 0.0, "{method}");
        assert_eq!(hi, 300.0, "{method}");
    }
}

#[test]
fn test_custom_clamp_range() {
    let samples = create_hot_spot_samples(11);
    let config =
        InterpolationConfig::default().with_clamp(ClampRange::new(50.0, 100.0).unwrap());
    let field = interpolate(&samples, &config).unwrap();
    assert!(field
        .values()
        .iter()
        .all(|v| (50.0..=100.0).contains(v)));
}

// =============================================================================
// TRIANGULATED METHODS
// =============================================================================

#[test]
fn test_linear_leaves_outside_hull_nan() {
    let field = interpolate(
        &three_samples(),
        &InterpolationConfig::default().with_method(InterpolationMethod::Linear),
    )
    .unwrap();

    // The hull is the lower-left triangle of the unit square.
    assert!(field.value(99, 99).unwrap().is_nan());
    assert_approx_eq!(field.value(0, 0).unwrap(), 10.0, 1e-9);
    assert_approx_eq!(field.value(99, 0).unwrap(), 20.0, 1e-9);
    assert_approx_eq!(field.value(0, 99).unwrap(), 30.0, 1e-9);

    let stats = field.statistics().unwrap();
    assert!(stats.nan_count > 0);
    assert!(stats.finite_count > 0);
}

#[test]
fn test_linear_and_cubic_follow_affine_field() {
    let samples = create_linear_field_samples(6, 20.0, 50.0, 80.0);
    for method in [InterpolationMethod::Linear, InterpolationMethod::Cubic] {
        let config = InterpolationConfig::default()
            .with_method(method)
            .with_resolution(21, 21);
        let field = interpolate(&samples, &config).unwrap();
        for j in 0..21 {
            for i in 0..21 {
                let p = field.spec().point(i, j).unwrap();
                let expected = 20.0 + 50.0 * p.x + 80.0 * p.y;
                assert_approx_eq!(field.value(i, j).unwrap(), expected, 1e-8);
            }
        }
    }
}

#[test]
fn test_collinear_samples_fail_triangulation() {
    let samples = SampleSet::new(vec![
        Sample::new(0.0, 0.0, 1.0),
        Sample::new(1.0, 1.0, 2.0),
        Sample::new(2.0, 2.0, 3.0),
    ]);
    let config = InterpolationConfig::default().with_method(InterpolationMethod::Linear);
    assert!(matches!(
        interpolate(&samples, &config),
        Err(FieldError::Triangulation(_))
    ));

    // Nearest has no such restriction.
    assert!(interpolate(&samples, &InterpolationConfig::default()).is_ok());
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_vertical_line_is_degenerate() {
    let samples = parse_samples(VERTICAL_LINE, &ParseOptions::default()).unwrap();
    match interpolate(&samples, &InterpolationConfig::default()) {
        Err(FieldError::DegenerateGeometry { axis, value }) => {
            assert_eq!(axis, Axis::X);
            assert_eq!(value, 2.0);
        }
        other => panic!("expected degenerate geometry, got {other:?}"),
    }
}

#[test]
fn test_overflowing_extent_rejected() {
    let samples = SampleSet::new(vec![
        Sample::new(-1e308, 0.0, 10.0),
        Sample::new(1e308, 0.0, 20.0),
        Sample::new(0.0, 1.0, 30.0),
    ]);
    for method in [InterpolationMethod::Nearest, InterpolationMethod::Linear] {
        let config = InterpolationConfig::default().with_method(method);
        assert!(matches!(
            interpolate(&samples, &config),
            Err(FieldError::ExtentOverflow { axis: Axis::X, .. })
        ));
    }
}

#[test]
fn test_invalid_resolution_rejected() {
    let config = InterpolationConfig::default().with_resolution(100, 1);
    assert!(matches!(
        interpolate(&three_samples(), &config),
        Err(FieldError::InvalidResolution { nx: 100, ny: 1 })
    ));
}
