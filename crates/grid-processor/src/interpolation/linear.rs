//! Piecewise-linear interpolation on a Delaunay triangulation.

use field_common::{FieldResult, SampleSet};

use super::delaunay::Triangulation;
use super::ScatteredInterpolator;

/// Barycentric interpolation inside the convex hull, `NaN` outside it.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    triangulation: Triangulation,
}

impl LinearInterpolator {
    pub fn new(samples: &SampleSet) -> FieldResult<Self> {
        Ok(Self {
            triangulation: Triangulation::new(samples)?,
        })
    }

    pub fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }
}

impl ScatteredInterpolator for LinearInterpolator {
    fn interpolate_at(&self, x: f64, y: f64) -> f64 {
        let Some((t, w)) = self.triangulation.locate(x, y) else {
            return f64::NAN;
        };
        let vertices = self.triangulation.vertices();
        self.triangulation.triangles()[t]
            .iter()
            .zip(w)
            .map(|(&v, weight)| vertices[v].value * weight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_common::{FieldError, Sample};

    #[test]
    fn test_reproduces_affine_field() {
        let f = |x: f64, y: f64| 12.0 + 3.0 * x - 7.5 * y;
        let samples: SampleSet = (0..5)
            .flat_map(|j| (0..5).map(move |i| (i as f64 * 2.5, j as f64 * 1.5)))
            .map(|(x, y)| Sample::new(x, y, f(x, y)))
            .collect();
        let interp = LinearInterpolator::new(&samples).unwrap();

        for qj in 0..=12 {
            for qi in 0..=12 {
                let (x, y) = (qi as f64 * 10.0 / 12.0, qj as f64 * 6.0 / 12.0);
                let v = interp.interpolate_at(x, y);
                assert!((v - f(x, y)).abs() < 1e-9, "at ({x}, {y}): {v}");
            }
        }
    }

    #[test]
    fn test_nan_outside_hull() {
        let samples = SampleSet::new(vec![
            Sample::new(0.0, 0.0, 10.0),
            Sample::new(1.0, 0.0, 20.0),
            Sample::new(0.0, 1.0, 30.0),
        ]);
        let interp = LinearInterpolator::new(&samples).unwrap();
        assert!((interp.interpolate_at(0.25, 0.25) - 17.5).abs() < 1e-12);
        assert!(interp.interpolate_at(1.0, 1.0).is_nan());
        assert!(interp.interpolate_at(0.6, 0.6).is_nan());
    }

    #[test]
    fn test_vertices_exact() {
        let samples = SampleSet::new(vec![
            Sample::new(0.0, 0.0, 10.0),
            Sample::new(1.0, 0.0, 20.0),
            Sample::new(0.0, 1.0, 30.0),
        ]);
        let interp = LinearInterpolator::new(&samples).unwrap();
        for s in &samples {
            assert!((interp.interpolate_at(s.x, s.y) - s.temperature).abs() < 1e-12);
        }
    }

    #[test]
    fn test_two_points_rejected() {
        let samples = SampleSet::new(vec![
            Sample::new(0.0, 0.0, 1.0),
            Sample::new(1.0, 1.0, 2.0),
        ]);
        assert!(matches!(
            LinearInterpolator::new(&samples),
            Err(FieldError::Triangulation(_))
        ));
    }
}
