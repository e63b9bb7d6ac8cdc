//! Parametric binary search over delta using the decider to converge on
//! `d_F(P, Q)` (spec §4.6).

use crate::config::{DeciderFlags, EPS};
use crate::curve::Curve;
use crate::geometry::Point;
use crate::metrics::Metrics;

/// Shortest distance from `p` to the segment `[a, b]`, the same clamped
/// projection the segment-disk solver in `geometry.rs` reasons about when
/// it asks whether a point lies within a given radius of a segment.
fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sqr = ab.x * ab.x + ab.y * ab.y;
    if len_sqr == 0.0 {
        return p.dist(a);
    }
    let t = ((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sqr;
    let t = t.clamp(0.0, 1.0);
    p.dist(a + ab * t)
}

/// Vertex-to-opposite-curve-segment clearances: for every vertex of one
/// curve and every segment of the other, the distance at which that vertex
/// first touches the segment. These are critical distances exactly like the
/// endpoint-to-endpoint ones, since a vertex sliding tangent to an opposite
/// segment is one of the events where the free-space diagram's topology can
/// change.
fn segment_vertex_clearances(p: &Curve, q: &Curve) -> Vec<f64> {
    let mut out = Vec::new();
    for v in p.points() {
        for w in q.points().windows(2) {
            out.push(point_to_segment_distance(*v, w[0], w[1]));
        }
    }
    for v in q.points() {
        for w in p.points().windows(2) {
            out.push(point_to_segment_distance(*v, w[0], w[1]));
        }
    }
    out.sort_by(|a, b| a.partial_cmp(b).unwrap());
    out
}

/// Every candidate critical distance: the pairwise endpoint-to-endpoint
/// distances between the two curves, plus every vertex-to-opposite-segment
/// clearance. The true Fréchet distance always coincides with one of these
/// or lies in the open interval between two neighbors, so bisecting the
/// sorted list first locates the right bracket before a final numeric
/// polish.
fn critical_distances(p: &Curve, q: &Curve) -> Vec<f64> {
    let mut endpoints: Vec<f64> = Vec::with_capacity(p.len() * q.len());
    for a in p.points() {
        for b in q.points() {
            endpoints.push(a.dist(*b));
        }
    }
    endpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let clearances = segment_vertex_clearances(p, q);

    let mut candidates: Vec<f64> = itertools::merge(endpoints, clearances).collect();
    candidates.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
    candidates
}

/// `d_F(P, Q)`, the smallest `delta` for which `decider::decide` accepts.
pub fn calc_distance(p: &Curve, q: &Curve) -> f64 {
    let candidates = critical_distances(p, q);
    let mut metrics = Metrics::default();
    let flags = DeciderFlags::all();

    let mut lo = 0usize;
    let mut hi = candidates.len() - 1;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if crate::decider::decide(p, q, candidates[mid], flags, &mut metrics) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    let mut left = if lo > 0 { candidates[lo - 1] } else { 0.0 };
    let mut right = candidates[lo];
    while right - left > EPS {
        let mid = 0.5 * (left + right);
        if crate::decider::decide(p, q, mid, flags, &mut metrics) {
            right = mid;
        } else {
            left = mid;
        }
    }
    right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use approx::assert_abs_diff_eq;

    #[test]
    fn matches_spec_scenario_one() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.5), Point::new(2.0, 1.0)], "q");
        assert_abs_diff_eq!(calc_distance(&p, &q), 1.5, epsilon = 1e-6);
    }

    #[test]
    fn matches_spec_scenario_three() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 5.0), Point::new(10.0, 5.0)], "q");
        assert_abs_diff_eq!(calc_distance(&p, &q), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn critical_distances_include_segment_vertex_clearances() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(5.0, -10.0), Point::new(5.0, 10.0)], "q");
        // (0,0)'s closest point on q's segment is (5,0), at distance 5 -- far
        // closer than either of q's vertices (distance ~11.18 from either endpoint).
        let candidates = critical_distances(&p, &q);
        assert!(candidates.iter().any(|&d| (d - 5.0).abs() < 1e-9), "{candidates:?}");
    }

    #[test]
    fn reflexivity_distance_is_zero() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(3.0, 0.0)], "p");
        assert_abs_diff_eq!(calc_distance(&p, &p.clone()), 0.0, epsilon = 1e-6);
    }
}
