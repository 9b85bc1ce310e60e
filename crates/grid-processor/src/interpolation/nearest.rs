//! Nearest-neighbour lookup over scattered samples.

use std::cmp::Ordering;

use field_common::{FieldError, FieldResult, SampleSet};

use super::ScatteredInterpolator;

#[derive(Debug, Clone, Copy)]
struct Entry {
    x: f64,
    y: f64,
    value: f64,
    /// Position in the input, used to break distance ties.
    order: usize,
}

/// Nearest-neighbour interpolator.
///
/// Samples are kept sorted by x; a query walks outwards from its x position
/// and stops once the horizontal gap alone exceeds the best distance found.
/// Equidistant samples resolve to the one that appeared first in the input.
#[derive(Debug, Clone)]
pub struct NearestInterpolator {
    entries: Vec<Entry>,
}

impl NearestInterpolator {
    pub fn new(samples: &SampleSet) -> FieldResult<Self> {
        if samples.is_empty() {
            return Err(FieldError::NoSamples);
        }

        let mut entries: Vec<Entry> = samples
            .iter()
            .enumerate()
            .map(|(order, s)| Entry {
                x: s.x,
                y: s.y,
                value: s.temperature,
                order,
            })
            .collect();
        entries.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.order.cmp(&b.order)));

        Ok(Self { entries })
    }

    /// Index into the input order of the sample closest to `(x, y)`.
    pub fn nearest_index(&self, x: f64, y: f64) -> usize {
        self.entries[self.nearest_slot(x, y)].order
    }

    fn nearest_slot(&self, x: f64, y: f64) -> usize {
        let start = self.entries.partition_point(|e| e.x < x);
        let mut best = Best {
            dist_sq: f64::INFINITY,
            order: usize::MAX,
            slot: 0,
        };

        for (slot, e) in self.entries.iter().enumerate().skip(start) {
            let dx = e.x - x;
            if dx * dx > best.dist_sq {
                break;
            }
            best.consider(slot, e, x, y);
        }
        for slot in (0..start).rev() {
            let e = &self.entries[slot];
            let dx = x - e.x;
            if dx * dx > best.dist_sq {
                break;
            }
            best.consider(slot, e, x, y);
        }

        best.slot
    }
}

struct Best {
    dist_sq: f64,
    order: usize,
    slot: usize,
}

impl Best {
    #[inline]
    fn consider(&mut self, slot: usize, e: &Entry, x: f64, y: f64) {
        let dx = e.x - x;
        let dy = e.y - y;
        let d = dx * dx + dy * dy;
        let closer = match d.total_cmp(&self.dist_sq) {
            Ordering::Less => true,
            Ordering::Equal => e.order < self.order,
            Ordering::Greater => false,
        };
        if closer {
            *self = Best {
                dist_sq: d,
                order: e.order,
                slot,
            };
        }
    }
}

impl ScatteredInterpolator for NearestInterpolator {
    fn interpolate_at(&self, x: f64, y: f64) -> f64 {
        self.entries[self.nearest_slot(x, y)].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_common::Sample;

    fn triangle() -> SampleSet {
        SampleSet::new(vec![
            Sample::new(0.0, 0.0, 10.0),
            Sample::new(1.0, 0.0, 20.0),
            Sample::new(0.0, 1.0, 30.0),
        ])
    }

    #[test]
    fn test_exact_sample_locations() {
        let interp = NearestInterpolator::new(&triangle()).unwrap();
        assert_eq!(interp.interpolate_at(0.0, 0.0), 10.0);
        assert_eq!(interp.interpolate_at(1.0, 0.0), 20.0);
        assert_eq!(interp.interpolate_at(0.0, 1.0), 30.0);
    }

    #[test]
    fn test_closest_wins() {
        let interp = NearestInterpolator::new(&triangle()).unwrap();
        assert_eq!(interp.interpolate_at(0.9, 0.2), 20.0);
        assert_eq!(interp.interpolate_at(0.1, 0.8), 30.0);
        assert_eq!(interp.interpolate_at(0.2, 0.1), 10.0);
        // Far outside the samples the nearest one still answers.
        assert_eq!(interp.interpolate_at(50.0, -3.0), 20.0);
    }

    #[test]
    fn test_ties_prefer_input_order() {
        let interp = NearestInterpolator::new(&triangle()).unwrap();
        // (0.6, 0.6) is equidistant from (1,0) and (0,1).
        assert_eq!(interp.nearest_index(0.6, 0.6), 1);
        // (0.5, 0.5) is equidistant from all three.
        assert_eq!(interp.nearest_index(0.5, 0.5), 0);

        let dupes = SampleSet::new(vec![
            Sample::new(2.0, 2.0, 1.0),
            Sample::new(2.0, 2.0, 2.0),
        ]);
        let interp = NearestInterpolator::new(&dupes).unwrap();
        assert_eq!(interp.interpolate_at(2.0, 2.0), 1.0);
    }

    #[test]
    fn test_matches_brute_force() {
        let samples: SampleSet = (0..60)
            .map(|i| {
                let t = i as f64;
                Sample::new((t * 7.3) % 11.0, (t * 3.1) % 5.0, t)
            })
            .collect();
        let interp = NearestInterpolator::new(&samples).unwrap();

        for qi in 0..20 {
            for qj in 0..10 {
                let (x, y) = (qi as f64 * 0.55, qj as f64 * 0.5);
                let expected = samples
                    .iter()
                    .enumerate()
                    .min_by(|(ia, a), (ib, b)| {
                        a.distance_sq(x, y)
                            .total_cmp(&b.distance_sq(x, y))
                            .then(ia.cmp(ib))
                    })
                    .map(|(_, s)| s.temperature)
                    .unwrap();
                assert_eq!(interp.interpolate_at(x, y), expected);
            }
        }
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            NearestInterpolator::new(&SampleSet::default()),
            Err(FieldError::NoSamples)
        ));
    }
}
