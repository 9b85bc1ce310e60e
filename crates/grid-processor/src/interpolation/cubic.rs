//! Cubic interpolation on a Delaunay triangulation.
//!
//! Each triangle carries a cubic Bezier patch built from vertex values and
//! vertex gradients. Gradients are estimated by a weighted least-squares
//! plane fit over each vertex's neighbours. The surface passes through every
//! sample and reproduces affine fields exactly.

use field_common::{FieldResult, SampleSet};

use super::delaunay::{Triangulation, Vertex};
use super::ScatteredInterpolator;

/// Control net of a cubic Bezier triangle, indexed by vertex `a`, `b`, `c`.
#[derive(Debug, Clone, Copy)]
struct Patch {
    b300: f64,
    b030: f64,
    b003: f64,
    b210: f64,
    b120: f64,
    b021: f64,
    b012: f64,
    b102: f64,
    b201: f64,
    b111: f64,
}

impl Patch {
    fn build(vertices: &[Vertex], gradients: &[[f64; 2]], tri: [usize; 3]) -> Self {
        let [a, b, c] = tri;
        // Value of vertex `from`'s tangent plane one third of the way to `to`.
        let edge = |from: usize, to: usize| {
            let (p, q) = (vertices[from], vertices[to]);
            let g = gradients[from];
            p.value + (g[0] * (q.x - p.x) + g[1] * (q.y - p.y)) / 3.0
        };

        let b210 = edge(a, b);
        let b120 = edge(b, a);
        let b021 = edge(b, c);
        let b012 = edge(c, b);
        let b102 = edge(c, a);
        let b201 = edge(a, c);

        let e = (b210 + b120 + b021 + b012 + b102 + b201) / 6.0;
        let v = (vertices[a].value + vertices[b].value + vertices[c].value) / 3.0;

        Self {
            b300: vertices[a].value,
            b030: vertices[b].value,
            b003: vertices[c].value,
            b210,
            b120,
            b021,
            b012,
            b102,
            b201,
            b111: e + (e - v) / 2.0,
        }
    }

    #[inline]
    fn evaluate(&self, [u, v, w]: [f64; 3]) -> f64 {
        self.b300 * u * u * u
            + self.b030 * v * v * v
            + self.b003 * w * w * w
            + 3.0 * self.b210 * u * u * v
            + 3.0 * self.b120 * u * v * v
            + 3.0 * self.b021 * v * v * w
            + 3.0 * self.b012 * v * w * w
            + 3.0 * self.b102 * u * w * w
            + 3.0 * self.b201 * u * u * w
            + 6.0 * self.b111 * u * v * w
    }
}

/// Weighted least-squares gradient at each vertex, in normalised units.
///
/// Neighbours are weighted by inverse squared distance. A vertex whose
/// neighbours do not span two directions gets a zero gradient.
fn estimate_gradients(vertices: &[Vertex], neighbors: &[Vec<usize>]) -> Vec<[f64; 2]> {
    vertices
        .iter()
        .zip(neighbors)
        .map(|(p, adjacent)| {
            let (mut sxx, mut sxy, mut syy, mut sxf, mut syf) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for &n in adjacent {
                let q = vertices[n];
                let (dx, dy, df) = (q.x - p.x, q.y - p.y, q.value - p.value);
                let d2 = dx * dx + dy * dy;
                if d2 <= 0.0 {
                    continue;
                }
                let w = 1.0 / d2;
                sxx += w * dx * dx;
                sxy += w * dx * dy;
                syy += w * dy * dy;
                sxf += w * dx * df;
                syf += w * dy * df;
            }
            let det = sxx * syy - sxy * sxy;
            if det.abs() <= 1.0e-12 * (sxx * syy).abs().max(f64::MIN_POSITIVE) {
                return [0.0, 0.0];
            }
            [(syy * sxf - sxy * syf) / det, (sxx * syf - sxy * sxf) / det]
        })
        .collect()
}

/// C1-style cubic interpolation inside the convex hull, `NaN` outside it.
#[derive(Debug, Clone)]
pub struct CubicInterpolator {
    triangulation: Triangulation,
    patches: Vec<Patch>,
}

impl CubicInterpolator {
    pub fn new(samples: &SampleSet) -> FieldResult<Self> {
        let triangulation = Triangulation::new(samples)?;
        let gradients = estimate_gradients(triangulation.vertices(), &triangulation.neighbors());
        let patches = triangulation
            .triangles()
            .iter()
            .map(|&tri| Patch::build(triangulation.vertices(), &gradients, tri))
            .collect();
        Ok(Self {
            triangulation,
            patches,
        })
    }
}

impl ScatteredInterpolator for CubicInterpolator {
    fn interpolate_at(&self, x: f64, y: f64) -> f64 {
        match self.triangulation.locate(x, y) {
            Some((t, weights)) => self.patches[t].evaluate(weights),
            None => f64::NAN,
        }
    }
}
