//! 2-D point arithmetic and the segment–disk intersection solver, the base
//! primitive every layer above (curve, filters, decider, certificate) is
//! built on.

use crate::config::{EPS, SAVE_EPS, SAVE_EPS_HALF};
use crate::curve::Interval;

/// A point in the plane, double precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist_sqr(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn dist(self, other: Point) -> f64 {
        self.dist_sqr(other).sqrt()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl std::ops::Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// The result of intersecting a disk with a line segment: a certified inner
/// free interval, and an enclosing outer interval whose strictly interior
/// endpoints are certified non-free. See spec §4.1.
#[derive(Debug, Clone, Copy)]
pub struct FreeInterval {
    pub inner: Interval,
    pub outer: Interval,
}

fn dist_sqr_at(t: f64, start: Point, end: Point, center: Point) -> f64 {
    let p = start * (1.0 - t) + end * t;
    center.dist_sqr(p)
}

fn small_dist_at(t: f64, start: Point, end: Point, center: Point, radius_sqr: f64) -> bool {
    dist_sqr_at(t, start, end, center) <= radius_sqr
}

/// Computes the maximal `[l1, l2] subseteq [0,1]` such that the point
/// `start + l*(end-start)` lies within `radius` of `center`, along with an
/// outer interval that strictly excludes points beyond `EPS` of the true
/// boundary. Ported from the reference `IntersectionAlgorithm::intersection_interval`:
/// each side first tries a closed-form shift of the quadratic root by
/// `SAVE_EPS_HALF`, falling back to bisection (tolerance `SAVE_EPS`) only
/// when that shift doesn't itself certify the right inequality.
pub fn free_interval(center: Point, radius: f64, start: Point, end: Point) -> FreeInterval {
    let v = end - start;
    let radius_sqr = radius * radius;

    let a = v.x * v.x + v.y * v.y;
    let b = (start.x - center.x) * v.x + (start.y - center.y) * v.y;
    let c = (start.x - center.x).powi(2) + (start.y - center.y).powi(2) - radius * radius;

    if a == 0.0 {
        // Degenerate segment: start == end.
        return if start.dist_sqr(center) <= radius_sqr {
            FreeInterval {
                inner: Interval::new(0.0, 1.0),
                outer: Interval::new(-EPS, 1.0 + EPS),
            }
        } else {
            FreeInterval {
                inner: Interval::empty(),
                outer: Interval::empty(),
            }
        };
    }

    let mut mid = -b / a;
    let mut discriminant = mid * mid - c / a;

    let small_at_zero = small_dist_at(0.0, start, end, center, radius_sqr);
    let small_at_one = small_dist_at(1.0, start, end, center, radius_sqr);
    let mut small_at_mid = small_dist_at(mid, start, end, center, radius_sqr);

    if small_at_zero && small_at_one {
        return FreeInterval {
            inner: Interval::new(0.0, 1.0),
            outer: Interval::new(-EPS, 1.0 + EPS),
        };
    }

    if !small_at_mid && small_at_zero {
        mid = 0.0;
        small_at_mid = true;
    } else if !small_at_mid && small_at_one {
        mid = 1.0;
        small_at_mid = true;
    }

    if !small_at_mid {
        return FreeInterval {
            inner: Interval::empty(),
            outer: Interval::empty(),
        };
    }
    if mid <= 0.0 && !small_at_zero {
        return FreeInterval {
            inner: Interval::empty(),
            outer: Interval::empty(),
        };
    }
    if mid >= 1.0 && !small_at_one {
        return FreeInterval {
            inner: Interval::empty(),
            outer: Interval::empty(),
        };
    }

    discriminant = discriminant.max(0.0);
    let mut sqrt_discr = 0.0;
    let mut sqrt_discr_computed = false;

    let (begin, outer_begin) = if small_at_zero {
        (0.0, -EPS)
    } else {
        sqrt_discr = discriminant.sqrt();
        sqrt_discr_computed = true;
        let lambda1 = mid - sqrt_discr;
        let inner_shift = (lambda1 + SAVE_EPS_HALF).min(mid.min(1.0));
        let outer_shift = lambda1 - SAVE_EPS_HALF;
        if inner_shift >= outer_shift
            && small_dist_at(inner_shift, start, end, center, radius_sqr)
            && !small_dist_at(outer_shift, start, end, center, radius_sqr)
        {
            (inner_shift, outer_shift)
        } else {
            let mut left = 0.0;
            let mut right = mid.min(1.0);
            while right - left > SAVE_EPS {
                let m = 0.5 * (left + right);
                if small_dist_at(m, start, end, center, radius_sqr) {
                    right = m;
                } else {
                    left = m;
                }
            }
            (right, left)
        }
    };

    let (end_, outer_end) = if small_at_one {
        (1.0, 1.0 + EPS)
    } else {
        if !sqrt_discr_computed {
            sqrt_discr = discriminant.sqrt();
        }
        let lambda2 = mid + sqrt_discr;
        let inner_shift = (lambda2 - SAVE_EPS_HALF).max(mid.max(0.0));
        let outer_shift = lambda2 + SAVE_EPS_HALF;
        if inner_shift <= outer_shift
            && small_dist_at(inner_shift, start, end, center, radius_sqr)
            && !small_dist_at(outer_shift, start, end, center, radius_sqr)
        {
            (inner_shift, outer_shift)
        } else {
            let mut left = mid.max(0.0);
            let mut right = 1.0;
            while right - left > SAVE_EPS {
                let m = 0.5 * (left + right);
                if small_dist_at(m, start, end, center, radius_sqr) {
                    left = m;
                } else {
                    right = m;
                }
            }
            (left, right)
        }
    };

    debug_assert!(begin <= end_ + 1e-9);

    FreeInterval {
        inner: Interval::new(begin, end_),
        outer: Interval::new(outer_begin, outer_end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn full_segment_inside_disk() {
        let result = free_interval(Point::new(0.0, 0.0), 10.0, Point::new(-1.0, 0.0), Point::new(1.0, 0.0));
        assert_abs_diff_eq!(result.inner.begin, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.inner.end, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_segment() {
        let result = free_interval(Point::new(0.0, 0.0), 1.0, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        assert!(result.inner.is_empty());
        assert!(result.outer.is_empty());
    }

    #[test]
    fn crossing_segment_midpoint() {
        // Horizontal segment crossing a disk of radius 1 centered at origin.
        let result = free_interval(Point::new(0.0, 0.0), 1.0, Point::new(-2.0, 0.0), Point::new(2.0, 0.0));
        // The disk is crossed at x=-1 and x=1, i.e. t=0.25 and t=0.75.
        assert_abs_diff_eq!(result.inner.begin, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(result.inner.end, 0.75, epsilon = 1e-6);
        // Outer interval must strictly enclose but stay within eps.
        assert!(result.outer.begin <= result.inner.begin);
        assert!(result.outer.end >= result.inner.end);
    }

    #[test]
    fn tangent_segment_is_a_point() {
        // Segment tangent to circle of radius 1 at y=1, touching at x=0.
        let result = free_interval(Point::new(0.0, 0.0), 1.0, Point::new(-1.0, 1.0), Point::new(1.0, 1.0));
        assert!(!result.inner.is_empty());
        assert_abs_diff_eq!(result.inner.begin, result.inner.end, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_segment_inside() {
        let result = free_interval(Point::new(0.0, 0.0), 1.0, Point::new(0.5, 0.0), Point::new(0.5, 0.0));
        assert!(!result.inner.is_empty());
    }

    #[test]
    fn degenerate_segment_outside() {
        let result = free_interval(Point::new(0.0, 0.0), 1.0, Point::new(5.0, 0.0), Point::new(5.0, 0.0));
        assert!(result.inner.is_empty());
    }
}
