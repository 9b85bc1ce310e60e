//! Tests for bounding boxes and grid specifications built from samples.

use field_common::{Axis, BoundingBox, GridSpec, Sample, SampleSet, DEFAULT_RESOLUTION};

// ============================================================================
// BoundingBox tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(-5.0, -2.5, 5.0, 2.5);
    assert_eq!(bbox.width(), 10.0);
    assert_eq!(bbox.height(), 5.0);
    assert_eq!(bbox.center(), (0.0, 0.0));
}

#[test]
fn test_bbox_contains_edges() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    assert!(bbox.contains_point(0.0, 0.0));
    assert!(bbox.contains_point(10.0, 10.0));
    assert!(!bbox.contains_point(10.001, 5.0));
}

#[test]
fn test_bbox_single_point_is_degenerate() {
    let bbox = BoundingBox::from_points([(3.0, 4.0)]).unwrap();
    assert_eq!(bbox.zero_extent_axis(), Some(Axis::X));
}

#[test]
fn test_bbox_serializes_fields() {
    let bbox = BoundingBox::new(0.0, 1.0, 2.0, 3.0);
    let json = serde_json::to_value(bbox).unwrap();
    assert_eq!(json["min_x"], 0.0);
    assert_eq!(json["max_y"], 3.0);
}

// ============================================================================
// GridSpec from samples
// ============================================================================

#[test]
fn test_grid_bounds_match_samples() {
    let samples: SampleSet = [
        Sample::new(1.5, -2.0, 10.0),
        Sample::new(7.25, 3.0, 20.0),
        Sample::new(4.0, 9.5, 30.0),
        Sample::new(2.0, 0.0, 40.0),
    ]
    .into_iter()
    .collect();

    let spec = GridSpec::with_default_resolution(samples.bbox().unwrap());
    let xs = spec.x_coords();
    let ys = spec.y_coords();

    assert_eq!(xs.len(), DEFAULT_RESOLUTION);
    assert_eq!(ys.len(), DEFAULT_RESOLUTION);
    assert_eq!(xs[0], 1.5);
    assert_eq!(xs[DEFAULT_RESOLUTION - 1], 7.25);
    assert_eq!(ys[0], -2.0);
    assert_eq!(ys[DEFAULT_RESOLUTION - 1], 9.5);
}

#[test]
fn test_grid_coords_are_monotonic() {
    let spec = GridSpec::with_default_resolution(BoundingBox::new(0.0, 0.0, 3.0, 7.0));
    for pair in spec.x_coords().windows(2) {
        assert!(pair[1] > pair[0]);
    }
    for pair in spec.y_coords().windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn test_grid_point_lookup() {
    let spec = GridSpec::new(BoundingBox::new(0.0, 0.0, 4.0, 2.0), 5, 3).unwrap();
    let p = spec.point(2, 1).unwrap();
    assert_eq!((p.x, p.y), (2.0, 1.0));
    assert_eq!(spec.flat_index(2, 1), 7);
    assert!(spec.point(5, 0).is_none());
}
