//! Cheap sound one-sided tests that answer "definitely YES" or "definitely
//! NO" for a `lessThan` query without invoking the full decider. Each filter
//! is safe to skip: a filter that can't decide reports "unknown" and the
//! caller falls through to the next one, ending with the decider itself.
//! See spec §4.2.

use crate::curve::Curve;
use crate::geometry::Point;

/// The result of a single filter attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    Yes,
    No,
    Unknown,
}

/// `max(dist(c1.front(), c2.front()), dist(c1.back(), c2.back()))`: any
/// feasible traversal must start and end within `delta` of this, so if this
/// exceeds `delta` the answer is definitely NO.
pub fn bichromatic_farthest_distance(c1: &Curve, c2: &Curve) -> f64 {
    c1.front().dist(c2.front()).max(c1.back().dist(c2.back()))
}

pub fn is_point_too_far_from_curve(p: Point, c: &Curve, delta: f64) -> bool {
    c.points().iter().all(|q| p.dist(*q) > delta)
}

/// Walks both curves greedily: at each step, advance along whichever curve
/// gets closer to the other curve's current point, stopping the moment
/// neither endpoint is within `delta`. Reports `Yes` if it reaches both
/// ends without ever exceeding `delta`. Never reports `No` on its own: the
/// walk is a witness to YES, not proof of NO.
///
/// This is `Filter::greedy` in the original: retained as a primitive used
/// by `adaptive_simultaneous_greedy`, but not called directly from the
/// production filter pipeline (see spec §9).
#[allow(dead_code)]
pub fn greedy(c1: &Curve, c2: &Curve, delta: f64) -> FilterVerdict {
    let (mut i, mut j) = (0usize, 0usize);
    let (n, m) = (c1.len() - 1, c2.len() - 1);

    if c1.point(crate::id::PointId::new(0)).dist(c2.point(crate::id::PointId::new(0))) > delta {
        return FilterVerdict::Unknown;
    }

    while i < n || j < m {
        let p1 = c1.points()[i];
        let p2 = c2.points()[j];
        if p1.dist(p2) > delta {
            return FilterVerdict::Unknown;
        }
        let can_i = i < n;
        let can_j = j < m;
        if can_i && can_j {
            let di = c1.points()[i + 1].dist(p2);
            let dj = p1.dist(c2.points()[j + 1]);
            if di <= dj {
                i += 1;
            } else {
                j += 1;
            }
        } else if can_i {
            i += 1;
        } else {
            j += 1;
        }
    }

    if c1.back().dist(c2.back()) <= delta {
        FilterVerdict::Yes
    } else {
        FilterVerdict::Unknown
    }
}

/// Like `greedy`, but at each step tries advancing on curve 1, curve 2, or
/// both simultaneously, preferring whichever keeps the pair closest
/// together. Strictly more powerful than plain `greedy`.
pub fn adaptive_greedy(c1: &Curve, c2: &Curve, delta: f64) -> FilterVerdict {
    let (mut i, mut j) = (0usize, 0usize);
    let (n, m) = (c1.len() - 1, c2.len() - 1);

    if c1.front().dist(c2.front()) > delta {
        return FilterVerdict::Unknown;
    }

    while i < n || j < m {
        let p1 = c1.points()[i];
        let p2 = c2.points()[j];

        let cand_i = if i < n { Some((c1.points()[i + 1].dist(p2), i + 1, j)) } else { None };
        let cand_j = if j < m { Some((p1.dist(c2.points()[j + 1]), i, j + 1)) } else { None };
        let cand_both = if i < n && j < m {
            Some((c1.points()[i + 1].dist(c2.points()[j + 1]), i + 1, j + 1))
        } else {
            None
        };

        let best = [cand_i, cand_j, cand_both]
            .into_iter()
            .flatten()
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        match best {
            Some((d, ni, nj)) if d <= delta => {
                i = ni;
                j = nj;
            }
            _ => return FilterVerdict::Unknown,
        }
    }

    FilterVerdict::Yes
}

/// Is the arc of `var_curve` between indices `start` and `end` (exclusive of
/// `start`) guaranteed to stay within `delta` of the fixed point, using only
/// its midpoint and the arc's own length as a conservative bound? This is
/// `Filter::isFree`'s single-curve case: `comp_dist = delta - max_displacement`
/// and the midpoint must be within `comp_dist` of `fixed` for every point on
/// the arc to be within `delta` of it.
fn is_free_single(fixed: Point, var_curve: &Curve, start: usize, end: usize, delta: f64) -> bool {
    if end <= start {
        return false;
    }
    let mid = (start + end + 1) / 2;
    let max_displacement = var_curve.arc_length(start + 1, mid).max(var_curve.arc_length(mid, end));
    let comp_dist = delta - max_displacement;
    comp_dist > 0.0 && fixed.dist_sqr(var_curve.points()[mid]) <= comp_dist * comp_dist
}

/// Two-curve variant of `is_free_single`: both arcs' midpoints must be close
/// enough, after subtracting both arcs' displacement bounds, to certify that
/// every point pair on the two arcs stays within `delta`.
fn is_free_both(c1: &Curve, start1: usize, end1: usize, c2: &Curve, start2: usize, end2: usize, delta: f64) -> bool {
    if end1 <= start1 || end2 <= start2 {
        return false;
    }
    let mid1 = (start1 + end1 + 1) / 2;
    let mid2 = (start2 + end2 + 1) / 2;
    let max1 = c1.arc_length(start1 + 1, mid1).max(c1.arc_length(mid1, end1));
    let max2 = c2.arc_length(start2 + 1, mid2).max(c2.arc_length(mid2, end2));
    let comp_dist = delta - max1 - max2;
    comp_dist >= 0.0 && c1.points()[mid1].dist_sqr(c2.points()[mid2]) <= comp_dist * comp_dist
}

/// `Filter::increase`: widen the lookahead window after a successful jump.
fn increase_step(step: usize) -> usize {
    ((1.5 * step as f64).ceil() as usize).max(step + 1)
}

/// `Filter::decrease`: narrow the lookahead window after a failed jump.
fn decrease_step(step: usize) -> usize {
    step / 2
}

/// Simultaneous-advance variant of `adaptive_greedy`: instead of only ever
/// stepping one vertex at a time, it tries to jump a whole lookahead window
/// ahead on one or both curves at once, doubling the window on success and
/// halving it on failure, falling back to `adaptive_greedy`'s three-way
/// single-step choice once the window shrinks to one. Matches the reference
/// `Filter::adaptiveSimultaneousGreedy`'s exponential step search.
pub fn adaptive_simultaneous_greedy(c1: &Curve, c2: &Curve, delta: f64) -> FilterVerdict {
    let n = c1.len() - 1;
    let m = c2.len() - 1;

    if c1.front().dist(c2.front()) > delta || c1.back().dist(c2.back()) > delta {
        return FilterVerdict::Unknown;
    }

    let (mut pos1, mut pos2) = (0usize, 0usize);
    let mut step = n.max(m).max(1);

    while pos1 < n || pos2 < m {
        if pos1 == n {
            let target = (pos2 + step).min(m);
            if is_free_single(c1.points()[pos1], c2, pos2, target, delta) {
                pos2 = target;
                step = increase_step(step);
            } else if step == 1 {
                return FilterVerdict::Unknown;
            } else {
                step = decrease_step(step);
            }
            continue;
        }
        if pos2 == m {
            let target = (pos1 + step).min(n);
            if is_free_single(c2.points()[pos2], c1, pos1, target, delta) {
                pos1 = target;
                step = increase_step(step);
            } else if step == 1 {
                return FilterVerdict::Unknown;
            } else {
                step = decrease_step(step);
            }
            continue;
        }

        if step == 1 {
            let p1 = c1.points()[pos1];
            let p2 = c2.points()[pos2];
            let cand_i = (c1.points()[pos1 + 1].dist(p2), pos1 + 1, pos2);
            let cand_j = (p1.dist(c2.points()[pos2 + 1]), pos1, pos2 + 1);
            let cand_both = (c1.points()[pos1 + 1].dist(c2.points()[pos2 + 1]), pos1 + 1, pos2 + 1);
            let best = [cand_i, cand_j, cand_both].into_iter().min_by(|a, b| a.0.partial_cmp(&b.0).unwrap()).unwrap();
            if best.0 > delta {
                return FilterVerdict::Unknown;
            }
            pos1 = best.1;
            pos2 = best.2;
            step = 2;
            continue;
        }

        let target1 = (pos1 + step).min(n);
        let step2 = (step * (m - pos2) / (n - pos1)).max(1);
        let target2 = (pos2 + step2).min(m);

        if is_free_both(c1, pos1, target1, c2, pos2, target2, delta) {
            pos1 = target1;
            pos2 = target2;
            step = increase_step(step);
        } else {
            step = decrease_step(step);
        }
    }

    FilterVerdict::Yes
}

/// A sound NO test independent of the greedy walks: if some point on `c1`
/// is farther than `delta` from every point of `c2` (or vice versa), no
/// monotone traversal can possibly stay within `delta`.
pub fn negative(c1: &Curve, c2: &Curve, delta: f64) -> FilterVerdict {
    for p in c1.points() {
        if is_point_too_far_from_curve(*p, c2, delta) {
            return FilterVerdict::No;
        }
    }
    for p in c2.points() {
        if is_point_too_far_from_curve(*p, c1, delta) {
            return FilterVerdict::No;
        }
    }
    FilterVerdict::Unknown
}

/// Runs the cheap filters in increasing cost order, recording which filter
/// (if any) resolved the query in `metrics`. Returns `Unknown` if every
/// filter passed through, meaning the caller must invoke the full decider.
pub fn run(c1: &Curve, c2: &Curve, delta: f64, metrics: &mut crate::metrics::Metrics) -> FilterVerdict {
    use crate::metrics::FilterKind;

    if bichromatic_farthest_distance(c1, c2) > delta {
        metrics.record_filter_hit(FilterKind::BichromaticFarthest);
        return FilterVerdict::No;
    }

    match negative(c1, c2, delta) {
        FilterVerdict::No => {
            metrics.record_filter_hit(FilterKind::Negative);
            return FilterVerdict::No;
        }
        _ => {}
    }

    match adaptive_greedy(c1, c2, delta) {
        FilterVerdict::Yes => {
            metrics.record_filter_hit(FilterKind::AdaptiveGreedy);
            return FilterVerdict::Yes;
        }
        _ => {}
    }

    match adaptive_simultaneous_greedy(c1, c2, delta) {
        FilterVerdict::Yes => {
            metrics.record_filter_hit(FilterKind::AdaptiveSimultaneousGreedy);
            return FilterVerdict::Yes;
        }
        _ => {}
    }

    metrics.full_decider_calls += 1;
    FilterVerdict::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(y: f64) -> Curve {
        Curve::new(vec![Point::new(0.0, y), Point::new(10.0, y)], "c")
    }

    #[test]
    fn bichromatic_bound_catches_far_endpoints() {
        let c1 = straight(0.0);
        let c2 = straight(100.0);
        assert!(bichromatic_farthest_distance(&c1, &c2) > 1.0);
    }

    #[test]
    fn adaptive_greedy_accepts_parallel_lines() {
        let c1 = straight(0.0);
        let c2 = straight(0.5);
        assert_eq!(adaptive_greedy(&c1, &c2, 1.0), FilterVerdict::Yes);
    }

    #[test]
    fn adaptive_greedy_unknown_when_too_far() {
        let c1 = straight(0.0);
        let c2 = straight(5.0);
        assert_eq!(adaptive_greedy(&c1, &c2, 1.0), FilterVerdict::Unknown);
    }

    #[test]
    fn negative_filter_rejects_far_point() {
        let c1 = Curve::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(100.0, 100.0)], "c1");
        let c2 = straight(0.0);
        assert_eq!(negative(&c1, &c2, 1.0), FilterVerdict::No);
    }

    #[test]
    fn adaptive_simultaneous_greedy_accepts_long_parallel_lines() {
        let pts1: Vec<Point> = (0..50).map(|i| Point::new(i as f64, 0.0)).collect();
        let pts2: Vec<Point> = (0..50).map(|i| Point::new(i as f64, 0.3)).collect();
        let c1 = Curve::new(pts1, "c1");
        let c2 = Curve::new(pts2, "c2");
        assert_eq!(adaptive_simultaneous_greedy(&c1, &c2, 1.0), FilterVerdict::Yes);
    }

    #[test]
    fn adaptive_simultaneous_greedy_unknown_when_curves_diverge() {
        let c1 = straight(0.0);
        let c2 = straight(5.0);
        assert_eq!(adaptive_simultaneous_greedy(&c1, &c2, 1.0), FilterVerdict::Unknown);
    }

    #[test]
    fn run_falls_through_to_unknown_on_hard_case() {
        let c1 = Curve::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)], "c1");
        let c2 = Curve::new(vec![Point::new(0.0, 0.5), Point::new(1.0, -0.5), Point::new(2.0, 0.5)], "c2");
        let mut metrics = crate::metrics::Metrics::default();
        let verdict = run(&c1, &c2, 0.3, &mut metrics);
        assert_eq!(verdict, FilterVerdict::Unknown);
        assert_eq!(metrics.full_decider_calls, 1);
    }
}
