//! Ground-truth O(n*m) reference decider: a full free-space reachability
//! grid, no pruning. Spec §4.3 calls this out explicitly ("a naive O(nm)
//! decider is specified only as a ground-truth reference") and §8's first
//! testable property pins `light.lessThan == naive.lessThan` for all inputs.
//!
//! The recurrence ported here is the classical Alt & Godau free-space cell
//! propagation: within one cell the free region is the intersection of an
//! ellipse with the unit square, hence convex, so (a) a reachable point on
//! the left edge reaches the *entire* free top interval, and symmetently a
//! reachable point on the bottom edge reaches the entire free right
//! interval; (b) absent that, a reachable bottom point only carries forward
//! as far as its own position allows, clipped against the free interval's
//! end. This matches the reference `FrechetNaive::lessThan` recurrence
//! (`reachable1`/`reachable2` in the original), generalized from consecutive
//! vertex-distance checks to explicit `geometry::free_interval` calls.

use crate::curve::{CPoint, Curve, Interval};
use crate::geometry::{free_interval, Point};

/// The smallest x (or y) coordinate such that `[value, free.end]` is
/// reachable from the origin along a grid boundary edge; `None` if that
/// edge is unreachable.
type Reach = Option<f64>;

/// Which predecessor edge produced a cell boundary's reachability, used to
/// reconstruct a certificate traversal (see `certificate` module).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    /// Propagated fully from the adjacent left (for `reach_h`) or bottom
    /// (for `reach_v`) edge: convexity makes the entire free interval
    /// reachable.
    Diagonal,
    /// Propagated from the edge directly below (`reach_h`) or to the left
    /// (`reach_v`), clipped to `max(own_begin, free.begin)`.
    Straight,
}

/// The full free-space diagram for a curve pair: per-cell free intervals
/// plus the reachability scalar and provenance of every grid boundary edge.
pub struct ReachabilityGrid {
    n: usize,
    m: usize,
    /// `free_h[i][j]`: free interval along the horizontal edge at row `j`,
    /// segment `i` of `p` (`P`-parameter). Indexed `i in 0..n-1`, `j in 0..m`.
    pub free_h: Vec<Vec<Interval>>,
    /// `free_v[i][j]`: free interval along the vertical edge at column `i`,
    /// segment `j` of `q` (`Q`-parameter). Indexed `i in 0..n`, `j in 0..m-1`.
    pub free_v: Vec<Vec<Interval>>,
    pub reach_h: Vec<Vec<Reach>>,
    pub reach_v: Vec<Vec<Reach>>,
    via_h: Vec<Vec<Option<Via>>>,
    via_v: Vec<Vec<Option<Via>>>,
}

impl ReachabilityGrid {
    /// Builds the full diagram. Panics if either curve has fewer than 2
    /// points; callers must route 1-point curves to `farthest_point_distance`
    /// first (see `decide` below).
    pub fn build(p: &Curve, q: &Curve, delta: f64) -> Self {
        let n = p.len();
        let m = q.len();
        assert!(n >= 2 && m >= 2, "ReachabilityGrid requires curves with >=2 points");

        let mut free_h = vec![vec![Interval::empty(); m]; n - 1];
        let mut free_v = vec![vec![Interval::empty(); m - 1]; n];
        for (i, row) in free_h.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = free_interval(q.points()[j], delta, p.points()[i], p.points()[i + 1]).inner;
            }
        }
        for (i, row) in free_v.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = free_interval(p.points()[i], delta, q.points()[j], q.points()[j + 1]).inner;
            }
        }

        let mut reach_h: Vec<Vec<Reach>> = vec![vec![None; m]; n - 1];
        let mut reach_v: Vec<Vec<Reach>> = vec![vec![None; m - 1]; n];
        let mut via_h: Vec<Vec<Option<Via>>> = vec![vec![None; m]; n - 1];
        let mut via_v: Vec<Vec<Option<Via>>> = vec![vec![None; m - 1]; n];

        for i in 0..n - 1 {
            if free_h[i][0].is_empty() || free_h[i][0].begin > 0.0 {
                break;
            }
            reach_h[i][0] = Some(0.0);
            via_h[i][0] = Some(Via::Diagonal);
        }
        for j in 0..m - 1 {
            if free_v[0][j].is_empty() || free_v[0][j].begin > 0.0 {
                break;
            }
            reach_v[0][j] = Some(0.0);
            via_v[0][j] = Some(Via::Diagonal);
        }

        for i in 0..n {
            for j in 0..m {
                if i < n - 1 && j > 0 {
                    let free = free_h[i][j];
                    if !free.is_empty() {
                        if reach_v[i][j - 1].is_some() {
                            reach_h[i][j] = Some(free.begin);
                            via_h[i][j] = Some(Via::Diagonal);
                        } else if let Some(b) = reach_h[i][j - 1] {
                            if b <= free.end {
                                reach_h[i][j] = Some(b.max(free.begin));
                                via_h[i][j] = Some(Via::Straight);
                            }
                        }
                    }
                }
                if j < m - 1 && i > 0 {
                    let free = free_v[i][j];
                    if !free.is_empty() {
                        if reach_h[i - 1][j].is_some() {
                            reach_v[i][j] = Some(free.begin);
                            via_v[i][j] = Some(Via::Diagonal);
                        } else if let Some(b) = reach_v[i - 1][j] {
                            if b <= free.end {
                                reach_v[i][j] = Some(b.max(free.begin));
                                via_v[i][j] = Some(Via::Straight);
                            }
                        }
                    }
                }
            }
        }

        Self {
            n,
            m,
            free_h,
            free_v,
            reach_h,
            reach_v,
            via_h,
            via_v,
        }
    }

    pub fn via_h(&self, i: usize, j: usize) -> Option<Via> {
        self.via_h[i][j]
    }
    pub fn via_v(&self, i: usize, j: usize) -> Option<Via> {
        self.via_v[i][j]
    }

    /// YES iff the top-right corner of the diagram is reachable, checked on
    /// both of its incident boundary edges (they agree by construction).
    pub fn is_yes(&self) -> bool {
        self.reach_h[self.n - 2][self.m - 1].is_some() || self.reach_v[self.n - 1][self.m - 2].is_some()
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.n, self.m)
    }
}

/// The farthest a curve ever strays from a fixed point. The maximum of a
/// convex (here: Euclidean) distance function over a segment is attained at
/// an endpoint, so scanning vertices suffices.
pub fn farthest_point_distance(point: Point, c: &Curve) -> f64 {
    c.points().iter().fold(0.0_f64, |acc, q| acc.max(point.dist(*q)))
}

/// `d_F(P, Q) <= delta`, computed with no filters and no pruning.
pub fn decide(p: &Curve, q: &Curve, delta: f64) -> bool {
    if p.len() == 1 && q.len() == 1 {
        return p.front().dist(q.front()) <= delta;
    }
    if p.len() == 1 {
        return farthest_point_distance(p.front(), q) <= delta;
    }
    if q.len() == 1 {
        return farthest_point_distance(q.front(), p) <= delta;
    }
    if p.front().dist(q.front()) > delta || p.back().dist(q.back()) > delta {
        return false;
    }
    ReachabilityGrid::build(p, q, delta).is_yes()
}

/// Convenience used by `certificate`: the `CPoint` a grid position
/// corresponds to on curve `p`/`q` respectively, given an index and a
/// fractional reach value.
pub fn cpoint_at(index: usize, frac: f64) -> CPoint {
    CPoint::new(index, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::geometry::Point;

    #[test]
    fn matches_spec_scenario_one() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.5), Point::new(2.0, 1.0)], "q");
        assert!(decide(&p, &q, 1.5));
        assert!(!decide(&p, &q, 1.4999));
    }

    #[test]
    fn matches_spec_scenario_three() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 5.0), Point::new(10.0, 5.0)], "q");
        assert!(decide(&p, &q, 5.0 + 1e-9));
        assert!(!decide(&p, &q, 4.999));
    }

    #[test]
    fn identical_curves_at_zero() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)], "p");
        assert!(decide(&p, &p.clone(), 0.0));
    }

    #[test]
    fn zigzag_curves_equal_one() {
        let mut pts = Vec::new();
        for k in 0..100 {
            pts.push(Point::new(if k % 2 == 0 { 0.0 } else { 1.0 }, 0.0));
        }
        let p = Curve::new(pts.clone(), "p");
        pts.reverse();
        let q = Curve::new(pts, "q");
        assert!(decide(&p, &q, 1.0 + 1e-9));
        assert!(!decide(&p, &q, 0.999));
    }

    #[test]
    fn single_point_curve_uses_farthest_distance() {
        let p = Curve::new(vec![Point::new(0.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)], "q");
        assert!(decide(&p, &q, 5.0));
        assert!(!decide(&p, &q, 4.999));
    }
}
