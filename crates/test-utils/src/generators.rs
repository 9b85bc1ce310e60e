//! Test data generators for scattered temperature samples.
//!
//! All generators are deterministic so that tests and benchmarks see the
//! same point layout on every run.

use field_common::{Sample, SampleSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates `count` samples scattered over `[0, width] x [0, height]`.
///
/// Temperatures come from `field(x, y)`. The four corners are always
/// included so the bounding box is exactly the requested rectangle.
///
/// # Example
///
/// ```
/// use test_utils::create_scattered_samples;
///
/// let samples = create_scattered_samples(50, 10.0, 5.0, 7, |x, y| x + y);
/// assert_eq!(samples.len(), 50);
/// let bbox = samples.bbox().unwrap();
/// assert_eq!((bbox.max_x, bbox.max_y), (10.0, 5.0));
/// ```
pub fn create_scattered_samples<F>(
    count: usize,
    width: f64,
    height: f64,
    seed: u64,
    field: F,
) -> SampleSet
where
    F: Fn(f64, f64) -> f64,
{
    let corners = [(0.0, 0.0), (width, 0.0), (0.0, height), (width, height)];
    let mut rng = StdRng::seed_from_u64(seed);

    let mut samples: Vec<Sample> = corners
        .iter()
        .take(count)
        .map(|&(x, y)| Sample::new(x, y, field(x, y)))
        .collect();

    while samples.len() < count {
        let x = rng.gen_range(0.0..=width);
        let y = rng.gen_range(0.0..=height);
        samples.push(Sample::new(x, y, field(x, y)));
    }

    SampleSet::new(samples)
}

/// Creates samples on an `n x n` lattice over the unit square with an
/// affine temperature `base + gx * x + gy * y`.
pub fn create_linear_field_samples(n: usize, base: f64, gx: f64, gy: f64) -> SampleSet {
    let step = 1.0 / (n.max(2) - 1) as f64;
    (0..n)
        .flat_map(|j| (0..n).map(move |i| (i as f64 * step, j as f64 * step)))
        .map(|(x, y)| Sample::new(x, y, base + gx * x + gy * y))
        .collect()
}

/// Creates a plate with a hot spot that exceeds the default clamp range
/// in its centre and dips below zero at its edges.
pub fn create_hot_spot_samples(side: usize) -> SampleSet {
    let step = 10.0 / (side.max(2) - 1) as f64;
    (0..side)
        .flat_map(|j| (0..side).map(move |i| (i as f64 * step, j as f64 * step)))
        .map(|(x, y)| {
            let r2 = (x - 5.0).powi(2) + (y - 5.0).powi(2);
            Sample::new(x, y, 450.0 * (-r2 / 8.0).exp() - 40.0)
        })
        .collect()
}

/// Formats samples as file lines using the given decimal separator.
pub fn format_samples(samples: &SampleSet, separator: char) -> String {
    let fmt = |v: f64| {
        let s = format!("{v}");
        if separator == '.' {
            s
        } else {
            s.replace('.', &separator.to_string())
        }
    };
    samples
        .iter()
        .map(|s| format!("{} {} {}\n", fmt(s.x), fmt(s.y), fmt(s.temperature)))
        .collect()
}
