//! Bounding box types and operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coordinate axis of the sample plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// An axis-aligned bounding box in sample coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let bbox = iter.fold(BoundingBox::new(x0, y0, x0, y0), |b, (x, y)| BoundingBox {
            min_x: b.min_x.min(x),
            min_y: b.min_y.min(y),
            max_x: b.max_x.max(x),
            max_y: b.max_y.max(y),
        });
        Some(bbox)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// First axis along which the box has no extent, if any.
    pub fn zero_extent_axis(&self) -> Option<Axis> {
        if self.width() <= 0.0 {
            Some(Axis::X)
        } else if self.height() <= 0.0 {
            Some(Axis::Y)
        } else {
            None
        }
    }

    /// First axis whose extent overflows `f64`, if any.
    pub fn unbounded_extent_axis(&self) -> Option<Axis> {
        if !self.width().is_finite() {
            Some(Axis::X)
        } else if !self.height().is_finite() {
            Some(Axis::Y)
        } else {
            None
        }
    }

    /// Check if the box collapses to a line or a point.
    pub fn has_zero_extent(&self) -> bool {
        self.zero_extent_axis().is_some()
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}
