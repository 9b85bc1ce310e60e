//! Regular grids over a sample bounding box and the values evaluated on them.

use serde::{Deserialize, Serialize};

use crate::bbox::{Axis, BoundingBox};
use crate::error::{FieldError, FieldResult};

/// Default number of grid points along each axis.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Specification of a regular lattice spanning a bounding box.
///
/// Both axes include their endpoints: point `0` sits on the minimum and
/// point `n - 1` on the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGridSpec")]
pub struct GridSpec {
    /// Number of points in X direction
    pub nx: usize,
    /// Number of points in Y direction
    pub ny: usize,
    /// Extent covered by the lattice
    pub bbox: BoundingBox,
}

impl GridSpec {
    /// Create a grid specification.
    ///
    /// Rejects fewer than two points per axis and extents that overflow `f64`.
    pub fn new(bbox: BoundingBox, nx: usize, ny: usize) -> FieldResult<Self> {
        if nx < 2 || ny < 2 {
            return Err(FieldError::InvalidResolution { nx, ny });
        }
        if let Some(axis) = bbox.unbounded_extent_axis() {
            let (min, max) = match axis {
                Axis::X => (bbox.min_x, bbox.max_x),
                Axis::Y => (bbox.min_y, bbox.max_y),
            };
            return Err(FieldError::ExtentOverflow { axis, min, max });
        }
        Ok(Self { nx, ny, bbox })
    }

    /// Square grid with the default resolution. The extent is not checked.
    pub fn with_default_resolution(bbox: BoundingBox) -> Self {
        Self {
            nx: DEFAULT_RESOLUTION,
            ny: DEFAULT_RESOLUTION,
            bbox,
        }
    }

    /// Spacing between adjacent X coordinates.
    pub fn dx(&self) -> f64 {
        self.bbox.width() / (self.nx - 1) as f64
    }

    /// Spacing between adjacent Y coordinates.
    pub fn dy(&self) -> f64 {
        self.bbox.height() / (self.ny - 1) as f64
    }

    /// X coordinate of column `i`.
    pub fn x_at(&self, i: usize) -> f64 {
        if i + 1 >= self.nx {
            self.bbox.max_x
        } else {
            self.bbox.min_x + i as f64 * self.dx()
        }
    }

    /// Y coordinate of row `j`.
    pub fn y_at(&self, j: usize) -> f64 {
        if j + 1 >= self.ny {
            self.bbox.max_y
        } else {
            self.bbox.min_y + j as f64 * self.dy()
        }
    }

    pub fn x_coords(&self) -> Vec<f64> {
        (0..self.nx).map(|i| self.x_at(i)).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        (0..self.ny).map(|j| self.y_at(j)).collect()
    }

    /// Convert a grid index to coordinates.
    pub fn point(&self, i: usize, j: usize) -> Option<GridPoint> {
        if i >= self.nx || j >= self.ny {
            return None;
        }
        Some(GridPoint {
            x: self.x_at(i),
            y: self.y_at(j),
            i,
            j,
        })
    }

    /// Convert coordinates to the nearest grid index.
    pub fn nearest_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let i = ((x - self.bbox.min_x) / self.dx()).round();
        let j = ((y - self.bbox.min_y) / self.dy()).round();

        if i < 0.0 || j < 0.0 || i >= self.nx as f64 || j >= self.ny as f64 {
            return None;
        }
        Some((i as usize, j as usize))
    }

    /// Row-major flat index: rows run along Y, columns along X.
    #[inline]
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }
}

#[derive(Deserialize)]
struct RawGridSpec {
    nx: usize,
    ny: usize,
    bbox: BoundingBox,
}

impl TryFrom<RawGridSpec> for GridSpec {
    type Error = FieldError;

    fn try_from(raw: RawGridSpec) -> FieldResult<Self> {
        GridSpec::new(raw.bbox, raw.nx, raw.ny)
    }
}

/// A point on the grid with both indices and coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
    pub i: usize,
    pub j: usize,
}

/// Summary statistics over the finite cells of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub finite_count: usize,
    pub nan_count: usize,
}

/// Temperature values evaluated on a [`GridSpec`].
///
/// Cells that could not be estimated hold `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldGrid")]
pub struct FieldGrid {
    spec: GridSpec,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawFieldGrid {
    spec: GridSpec,
    values: Vec<f64>,
}

impl TryFrom<RawFieldGrid> for FieldGrid {
    type Error = FieldError;

    fn try_from(raw: RawFieldGrid) -> FieldResult<Self> {
        FieldGrid::new(raw.spec, raw.values)
    }
}

impl FieldGrid {
    /// Wrap row-major values, checking the length against the spec.
    pub fn new(spec: GridSpec, values: Vec<f64>) -> FieldResult<Self> {
        if values.len() != spec.len() {
            return Err(FieldError::InvalidResolution {
                nx: spec.nx,
                ny: values.len() / spec.nx.max(1),
            });
        }
        Ok(Self { spec, values })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn width(&self) -> usize {
        self.spec.nx
    }

    pub fn height(&self) -> usize {
        self.spec.ny
    }

    /// Value at column `i`, row `j`.
    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.spec.nx || j >= self.spec.ny {
            return None;
        }
        self.values.get(self.spec.flat_index(i, j)).copied()
    }

    /// Bilinear sample at fractional grid indices.
    ///
    /// Returns `NaN` if any surrounding corner is `NaN`.
    pub fn sample_bilinear(&self, fi: f64, fj: f64) -> f64 {
        let max_i = (self.spec.nx - 1) as f64;
        let max_j = (self.spec.ny - 1) as f64;
        let fi = fi.clamp(0.0, max_i);
        let fj = fj.clamp(0.0, max_j);

        let i0 = fi.floor() as usize;
        let j0 = fj.floor() as usize;
        let i1 = (i0 + 1).min(self.spec.nx - 1);
        let j1 = (j0 + 1).min(self.spec.ny - 1);
        let tx = fi - i0 as f64;
        let ty = fj - j0 as f64;

        let v00 = self.values[self.spec.flat_index(i0, j0)];
        let v10 = self.values[self.spec.flat_index(i1, j0)];
        let v01 = self.values[self.spec.flat_index(i0, j1)];
        let v11 = self.values[self.spec.flat_index(i1, j1)];

        let bottom = v00 * (1.0 - tx) + v10 * tx;
        let top = v01 * (1.0 - tx) + v11 * tx;
        bottom * (1.0 - ty) + top * ty
    }

    /// (min, max) over finite cells, `None` if every cell is `NaN`.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn statistics(&self) -> Option<FieldStatistics> {
        let (min, max) = self.finite_range()?;
        let (sum, finite_count) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        Some(FieldStatistics {
            min,
            max,
            mean: sum / finite_count as f64,
            finite_count,
            nan_count: self.values.len() - finite_count,
        })
    }
}
