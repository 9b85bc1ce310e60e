//! Scattered temperature measurements.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;

/// One measurement: a temperature at a point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub temperature: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, temperature: f64) -> Self {
        Self { x, y, temperature }
    }

    /// Squared Euclidean distance from this sample to `(x, y)`.
    #[inline]
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Ordered, immutable collection of samples in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build from parallel coordinate and temperature columns.
    ///
    /// Returns `None` when the columns differ in length.
    pub fn from_columns(xs: &[f64], ys: &[f64], temperatures: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() != temperatures.len() {
            return None;
        }
        let samples = xs
            .iter()
            .zip(ys)
            .zip(temperatures)
            .map(|((&x, &y), &t)| Sample::new(x, y, t))
            .collect();
        Some(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.y).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.temperature).collect()
    }

    /// Bounding box of the sample coordinates, `None` when empty.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.samples.iter().map(|s| (s.x, s.y)))
    }

    /// (min, max) of the measured temperatures.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?.temperature;
        Some(self.samples.iter().fold((first, first), |(lo, hi), s| {
            (lo.min(s.temperature), hi.max(s.temperature))
        }))
    }
}

impl<'a> IntoIterator for &'a SampleSet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl FromIterator<Sample> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
