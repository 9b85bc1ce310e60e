//! Delaunay triangulation of scattered samples (Bowyer-Watson).
//!
//! Coordinates are normalised to the unit square before triangulating so the
//! circumcircle tests behave the same regardless of the input units.
//! Each insertion walks to its containing triangle through neighbour links
//! and grows the cavity from there, so only nearby triangles are visited.

use std::collections::{HashMap, HashSet};

use field_common::{BoundingBox, FieldError, FieldResult, SampleSet};
use tracing::debug;

/// Half-size of the enclosing super triangle in normalised units.
const SUPER_TRIANGLE_EXTENT: f64 = 1.0e3;

/// Tolerance for point-in-triangle tests in normalised units.
const BARYCENTRIC_EPS: f64 = 1.0e-12;

/// A triangulation vertex in normalised coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy)]
struct Circumcircle {
    cx: f64,
    cy: f64,
    r2: f64,
}

impl Circumcircle {
    fn of(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < f64::EPSILON * 1.0e-3 {
            // Degenerate: treat as containing everything so it gets replaced.
            return Self {
                cx: 0.0,
                cy: 0.0,
                r2: f64::INFINITY,
            };
        }
        let a2 = a.0 * a.0 + a.1 * a.1;
        let b2 = b.0 * b.0 + b.1 * b.1;
        let c2 = c.0 * c.0 + c.1 * c.1;
        let cx = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
        let cy = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
        let r2 = (a.0 - cx).powi(2) + (a.1 - cy).powi(2);
        Self { cx, cy, r2 }
    }

    fn contains(&self, p: (f64, f64)) -> bool {
        (p.0 - self.cx).powi(2) + (p.1 - self.cy).powi(2) < self.r2
    }
}

/// Marks a triangle edge on the outside of the super triangle.
const NO_NEIGHBOR: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct WorkTriangle {
    v: [usize; 3],
    /// Neighbour across the edge opposite `v[k]`.
    adj: [usize; 3],
    circle: Circumcircle,
    alive: bool,
}

/// Twice the signed area of `(a, b, c)`; positive when counter-clockwise.
#[inline]
fn orient(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// A Delaunay triangulation with a bucket index for point location.
#[derive(Debug, Clone)]
pub struct Triangulation {
    origin: (f64, f64),
    scale: f64,
    vertices: Vec<Vertex>,
    triangles: Vec<[usize; 3]>,
    index: TriangleIndex,
}

impl Triangulation {
    /// Triangulate the samples.
    ///
    /// Samples sharing an `(x, y)` position keep the first occurrence.
    /// Fails when fewer than three distinct points remain or when every
    /// point lies on a single line.
    pub fn new(samples: &SampleSet) -> FieldResult<Self> {
        let bbox = samples.bbox().ok_or(FieldError::NoSamples)?;
        let scale = bbox.width().max(bbox.height());
        if !(scale > 0.0) {
            return Err(FieldError::Triangulation(
                "all samples share one position".to_string(),
            ));
        }
        let origin = (bbox.min_x, bbox.min_y);

        let mut seen = HashSet::with_capacity(samples.len());
        let vertices: Vec<Vertex> = samples
            .iter()
            .filter(|s| seen.insert(((s.x + 0.0).to_bits(), (s.y + 0.0).to_bits())))
            .map(|s| Vertex {
                x: (s.x - origin.0) / scale,
                y: (s.y - origin.1) / scale,
                value: s.temperature,
            })
            .collect();

        if vertices.len() < 3 {
            return Err(FieldError::Triangulation(format!(
                "need at least 3 distinct points, found {}",
                vertices.len()
            )));
        }
        let duplicates = samples.len() - vertices.len();
        if duplicates > 0 {
            debug!(duplicates, "Ignoring samples at repeated positions");
        }

        let triangles = bowyer_watson(&vertices);
        if triangles.is_empty() {
            return Err(FieldError::Triangulation(
                "samples are collinear, no triangle can be formed".to_string(),
            ));
        }
        debug!(
            vertices = vertices.len(),
            triangles = triangles.len(),
            "Built Delaunay triangulation"
        );

        let index = TriangleIndex::build(&vertices, &triangles);
        Ok(Self {
            origin,
            scale,
            vertices,
            triangles,
            index,
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangles as counter-clockwise vertex index triples.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Map sample coordinates into the normalised frame.
    #[inline]
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.origin.0) / self.scale, (y - self.origin.1) / self.scale)
    }

    /// Find the triangle containing `(x, y)` (sample coordinates) and the
    /// barycentric weights of its three vertices.
    pub fn locate(&self, x: f64, y: f64) -> Option<(usize, [f64; 3])> {
        let p = self.to_local(x, y);
        self.index.candidates(p).iter().find_map(|&t| {
            let t = t as usize;
            barycentric(&self.vertices, self.triangles[t], p).map(|w| (t, w))
        })
    }

    /// Adjacent vertices of every vertex, sorted and deduplicated.
    pub fn neighbors(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertices.len()];
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                adjacency[u].push(v);
                adjacency[v].push(u);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
            list.dedup();
        }
        adjacency
    }
}

/// Barycentric weights of `p` in `tri`, or `None` if `p` lies outside.
fn barycentric(vertices: &[Vertex], tri: [usize; 3], p: (f64, f64)) -> Option<[f64; 3]> {
    let [a, b, c] = tri.map(|i| (vertices[i].x, vertices[i].y));
    let area = orient(a, b, c);
    if area <= 0.0 {
        return None;
    }
    let wa = orient(b, c, p) / area;
    let wb = orient(c, a, p) / area;
    let wc = orient(a, b, p) / area;
    if wa < -BARYCENTRIC_EPS || wb < -BARYCENTRIC_EPS || wc < -BARYCENTRIC_EPS {
        return None;
    }
    Some([wa, wb, wc])
}

fn bowyer_watson(vertices: &[Vertex]) -> Vec<[usize; 3]> {
    let n = vertices.len();
    let mut points: Vec<(f64, f64)> = vertices.iter().map(|v| (v.x, v.y)).collect();

    // Super triangle around the unit square, appended after the real points.
    let m = SUPER_TRIANGLE_EXTENT;
    points.push((-m, -m));
    points.push((3.0 * m, -m));
    points.push((-m, 3.0 * m));

    let order = insertion_order(&points[..n]);
    let mut mesh = Mesh::new(points, [n, n + 1, n + 2]);
    let mut hint = 0;
    for pi in order {
        hint = mesh.insert(pi, hint);
    }

    let points = mesh.points;
    mesh.triangles
        .into_iter()
        .filter(|t| t.alive)
        .map(|t| t.v)
        .filter(|v| v.iter().all(|&i| i < n))
        .filter(|&[a, b, c]| orient(points[a], points[b], points[c]) > f64::EPSILON * 1.0e-3)
        .collect()
}

/// Serpentine bucket order over the normalised points, so consecutive
/// insertions land close to each other.
fn insertion_order(points: &[(f64, f64)]) -> Vec<usize> {
    let side = ((points.len() as f64).sqrt().ceil() as usize).max(1);
    let cell = |v: f64| ((v.max(0.0) * side as f64) as usize).min(side - 1);

    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by_key(|&i| {
        let (x, y) = points[i];
        let row = cell(y);
        let col = if row % 2 == 0 { cell(x) } else { side - 1 - cell(x) };
        (row, col)
    });
    order
}

/// Triangles with neighbour links, updated one inserted point at a time.
struct Mesh {
    points: Vec<(f64, f64)>,
    triangles: Vec<WorkTriangle>,
    free: Vec<usize>,
}

impl Mesh {
    fn new(points: Vec<(f64, f64)>, super_tri: [usize; 3]) -> Self {
        let [a, b, c] = super_tri.map(|i| points[i]);
        let root = WorkTriangle {
            v: super_tri,
            adj: [NO_NEIGHBOR; 3],
            circle: Circumcircle::of(a, b, c),
            alive: true,
        };
        Self {
            points,
            triangles: vec![root],
            free: Vec::new(),
        }
    }

    /// Whether `p` lies strictly outside edge `k` of triangle `t`.
    fn outside_edge(&self, t: usize, k: usize, p: (f64, f64)) -> bool {
        let v = self.triangles[t].v;
        orient(self.points[v[(k + 1) % 3]], self.points[v[(k + 2) % 3]], p) < 0.0
    }

    fn contains(&self, t: usize, p: (f64, f64)) -> bool {
        (0..3).all(|k| !self.outside_edge(t, k, p))
    }

    /// Triangle containing `p`, found by walking across edges from `start`.
    /// Falls back to a full scan if the walk does not settle.
    fn locate(&self, start: usize, p: (f64, f64)) -> usize {
        let mut t = start;
        for _ in 0..self.triangles.len() {
            let step = (0..3).find(|&k| {
                self.triangles[t].adj[k] != NO_NEIGHBOR && self.outside_edge(t, k, p)
            });
            match step {
                Some(k) => t = self.triangles[t].adj[k],
                None => return t,
            }
        }
        (0..self.triangles.len())
            .find(|&t| self.triangles[t].alive && self.contains(t, p))
            .unwrap_or(t)
    }

    /// Insert point `pi`, starting the search at `hint`. Returns a triangle
    /// touching the new point.
    fn insert(&mut self, pi: usize, hint: usize) -> usize {
        let p = self.points[pi];
        let start = if self.triangles[hint].alive {
            hint
        } else {
            (0..self.triangles.len())
                .find(|&t| self.triangles[t].alive)
                .unwrap_or(0)
        };
        let start = self.locate(start, p);

        // Cavity: the connected triangles whose circumcircle holds `p`.
        let mut cavity = vec![start];
        let mut in_cavity: HashSet<usize> = HashSet::from([start]);
        let mut next = 0;
        while next < cavity.len() {
            let t = cavity[next];
            next += 1;
            for nb in self.triangles[t].adj {
                if nb != NO_NEIGHBOR
                    && !in_cavity.contains(&nb)
                    && self.triangles[nb].circle.contains(p)
                {
                    in_cavity.insert(nb);
                    cavity.push(nb);
                }
            }
        }

        // Cavity boundary as counter-clockwise edges with the triangle beyond.
        let mut boundary = Vec::new();
        for &t in &cavity {
            let tri = self.triangles[t];
            for k in 0..3 {
                let outer = tri.adj[k];
                if outer == NO_NEIGHBOR || !in_cavity.contains(&outer) {
                    boundary.push((tri.v[(k + 1) % 3], tri.v[(k + 2) % 3], outer, t));
                }
            }
        }

        let mut created = Vec::with_capacity(boundary.len());
        let mut starting_at = HashMap::with_capacity(boundary.len());
        let mut ending_at = HashMap::with_capacity(boundary.len());
        for (a, b, outer, old) in boundary {
            let tri = WorkTriangle {
                v: [a, b, pi],
                adj: [NO_NEIGHBOR, NO_NEIGHBOR, outer],
                circle: Circumcircle::of(self.points[a], self.points[b], p),
                alive: true,
            };
            let id = match self.free.pop() {
                Some(id) => {
                    self.triangles[id] = tri;
                    id
                }
                None => {
                    self.triangles.push(tri);
                    self.triangles.len() - 1
                }
            };
            if outer != NO_NEIGHBOR {
                if let Some(slot) = self.triangles[outer].adj.iter_mut().find(|s| **s == old) {
                    *slot = id;
                }
            }
            starting_at.insert(a, id);
            ending_at.insert(b, id);
            created.push(id);
        }

        // Edge (b, p) is shared with the fan triangle starting at b,
        // edge (p, a) with the one ending at a.
        for &id in &created {
            let [a, b, _] = self.triangles[id].v;
            self.triangles[id].adj[0] = starting_at.get(&b).copied().unwrap_or(NO_NEIGHBOR);
            self.triangles[id].adj[1] = ending_at.get(&a).copied().unwrap_or(NO_NEIGHBOR);
        }

        // Recycle slots only after the fan is linked.
        for t in cavity {
            self.triangles[t].alive = false;
            self.free.push(t);
        }

        created.first().copied().unwrap_or(start)
    }
}

/// Uniform bucket grid over the triangulation's extent.
#[derive(Debug, Clone)]
struct TriangleIndex {
    bounds: BoundingBox,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<u32>>,
}

impl TriangleIndex {
    fn build(vertices: &[Vertex], triangles: &[[usize; 3]]) -> Self {
        let bounds = BoundingBox::from_points(vertices.iter().map(|v| (v.x, v.y)))
            .unwrap_or(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let side = ((triangles.len() as f64).sqrt().ceil() as usize).max(1);
        let mut index = Self {
            bounds,
            cols: side,
            rows: side,
            cells: vec![Vec::new(); side * side],
        };

        for (t, tri) in triangles.iter().enumerate() {
            let tb = BoundingBox::from_points(tri.iter().map(|&i| (vertices[i].x, vertices[i].y)))
                .unwrap_or(bounds);
            let (c0, r0) = index.cell_of((tb.min_x, tb.min_y));
            let (c1, r1) = index.cell_of((tb.max_x, tb.max_y));
            for r in r0..=r1 {
                for c in c0..=c1 {
                    index.cells[r * index.cols + c].push(t as u32);
                }
            }
        }
        index
    }

    fn cell_of(&self, p: (f64, f64)) -> (usize, usize) {
        let w = self.bounds.width().max(f64::MIN_POSITIVE);
        let h = self.bounds.height().max(f64::MIN_POSITIVE);
        let c = ((p.0 - self.bounds.min_x) / w * self.cols as f64).floor();
        let r = ((p.1 - self.bounds.min_y) / h * self.rows as f64).floor();
        (
            (c.max(0.0) as usize).min(self.cols - 1),
            (r.max(0.0) as usize).min(self.rows - 1),
        )
    }

    fn candidates(&self, p: (f64, f64)) -> &[u32] {
        let eps = BARYCENTRIC_EPS;
        if p.0 < self.bounds.min_x - eps
            || p.0 > self.bounds.max_x + eps
            || p.1 < self.bounds.min_y - eps
            || p.1 > self.bounds.max_y + eps
        {
            return &[];
        }
        let (c, r) = self.cell_of(p);
        &self.cells[r * self.cols + c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_common::Sample;

    fn square() -> SampleSet {
        SampleSet::new(vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(2.0, 0.0, 1.0),
            Sample::new(2.0, 2.0, 2.0),
            Sample::new(0.0, 2.0, 3.0),
        ])
    }

    #[test]
    fn test_square_has_two_triangles() {
        let tri = Triangulation::new(&square()).unwrap();
        assert_eq!(tri.triangles().len(), 2);
        for &[a, b, c] in tri.triangles() {
            let v = tri.vertices();
            assert!(orient((v[a].x, v[a].y), (v[b].x, v[b].y), (v[c].x, v[c].y)) > 0.0);
        }
    }

    #[test]
    fn test_locate_inside_and_outside() {
        let tri = Triangulation::new(&square()).unwrap();
        let (_, w) = tri.locate(1.0, 0.5).unwrap();
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(tri.locate(0.0, 0.0).is_some());
        assert!(tri.locate(2.0, 2.0).is_some());
        assert!(tri.locate(2.5, 1.0).is_none());
        assert!(tri.locate(-0.1, 1.0).is_none());
    }

    #[test]
    fn test_collinear_rejected() {
        let line = SampleSet::new(vec![
            Sample::new(0.0, 0.0, 1.0),
            Sample::new(1.0, 1.0, 2.0),
            Sample::new(2.0, 2.0, 3.0),
        ]);
        assert!(matches!(
            Triangulation::new(&line),
            Err(FieldError::Triangulation(_))
        ));
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut samples = square().as_slice().to_vec();
        samples.push(Sample::new(0.0, 0.0, 99.0));
        let tri = Triangulation::new(&SampleSet::new(samples)).unwrap();
        assert_eq!(tri.vertices().len(), 4);
        assert_eq!(tri.vertices()[0].value, 0.0);
    }

    fn signed_area(tri: &Triangulation, [a, b, c]: [usize; 3]) -> f64 {
        let v = tri.vertices();
        orient((v[a].x, v[a].y), (v[b].x, v[b].y), (v[c].x, v[c].y)) / 2.0
    }

    #[test]
    fn test_scattered_points_satisfy_empty_circle() {
        let samples = test_utils::create_scattered_samples(400, 3.0, 2.0, 5, |x, y| x + y);
        let tri = Triangulation::new(&samples).unwrap();
        let v = tri.vertices();

        // Corners are included, so the hull is the whole rectangle.
        let area: f64 = tri.triangles().iter().map(|&t| signed_area(&tri, t)).sum();
        assert!((area - 3.0 * 2.0 / 9.0).abs() < 1e-3);

        for &[a, b, c] in tri.triangles() {
            let circle = Circumcircle::of((v[a].x, v[a].y), (v[b].x, v[b].y), (v[c].x, v[c].y));
            for (k, p) in v.iter().enumerate() {
                if k == a || k == b || k == c {
                    continue;
                }
                let d2 = (p.x - circle.cx).powi(2) + (p.y - circle.cy).powi(2);
                assert!(d2 >= circle.r2 * (1.0 - 1e-9), "vertex {k} inside circumcircle");
            }
        }
    }

    #[test]
    fn test_large_input_triangulates() {
        let samples = test_utils::create_scattered_samples(20_000, 1.0, 1.0, 9, |x, _| x);
        let tri = Triangulation::new(&samples).unwrap();

        let area: f64 = tri.triangles().iter().map(|&t| signed_area(&tri, t)).sum();
        assert!((area - 1.0).abs() < 1e-3);
        // A point set with a 4-point hull has 2n - 6 Delaunay triangles.
        let expected = 2 * tri.vertices().len() - 6;
        assert!(tri.triangles().len() <= expected);
        assert!(tri.triangles().len() + 20 >= expected);
        assert!(tri.triangles().iter().all(|&t| signed_area(&tri, t) > 0.0));
    }

    #[test]
    fn test_lattice_covers_hull() {
        let samples: SampleSet = (0..6)
            .flat_map(|j| (0..6).map(move |i| Sample::new(i as f64, j as f64, 0.0)))
            .collect();
        let tri = Triangulation::new(&samples).unwrap();

        // A 6x6 lattice has 5x5 cells, two triangles each.
        assert_eq!(tri.triangles().len(), 50);

        let total_area: f64 = tri
            .triangles()
            .iter()
            .map(|&[a, b, c]| {
                let v = tri.vertices();
                orient((v[a].x, v[a].y), (v[b].x, v[b].y), (v[c].x, v[c].y)) / 2.0
            })
            .sum();
        assert!((total_area - 1.0).abs() < 1e-9);

        for qj in 0..=20 {
            for qi in 0..=20 {
                let (x, y) = (qi as f64 * 0.25, qj as f64 * 0.25);
                assert!(tri.locate(x, y).is_some(), "no triangle at ({x}, {y})");
            }
        }
    }
}
