//! The free-space decider (*core*): recursive box decomposition with
//! reachable-interval propagation and pruning. Spec §4.3.
//!
//! A "box" covers an index sub-range `[i1,i2] x [j1,j2]` of the free-space
//! diagram. `solve` resolves a box either directly (empty-inputs rule, the
//! single-cell base case, or boundary pruning) or by bisecting the longer
//! side and recursing, feeding the lower half's outputs into the upper
//! half's inputs — the "Split and recurse" rule of spec §4.3. Within one
//! cell, reachability propagation is exact: the free region there is the
//! intersection of an ellipse and the unit square, hence convex, so a
//! reachable point on one incoming edge always propagates either the full
//! opposite free interval (diagonal move) or a clipped suffix of it
//! (straight move) — the same two cases `naive::ReachabilityGrid` computes,
//! here applied box-at-a-time so empty or already-resolved regions are
//! never visited.

use smallvec::SmallVec;

use crate::config::DeciderFlags;
use crate::curve::{CInterval, CPoint, Curve};
use crate::filters::is_point_too_far_from_curve;
use crate::geometry::free_interval;
use crate::metrics::Metrics;

/// Most boxes resolve to a handful of reachable intervals per edge; inlining
/// a small run avoids a heap allocation for the overwhelmingly common case.
pub type CIntervals = SmallVec<[CInterval; 4]>;

#[derive(Debug, Clone, Copy)]
struct BoxSpan {
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

impl BoxSpan {
    fn is_cell(&self) -> bool {
        self.i2 - self.i1 == 1 && self.j2 - self.j1 == 1
    }
    fn contains_origin(&self) -> bool {
        self.i1 == 0 && self.j1 == 0
    }
}

struct Decider<'a> {
    p: &'a Curve,
    q: &'a Curve,
    delta: f64,
    flags: DeciderFlags,
    metrics: &'a mut Metrics,
}

impl<'a> Decider<'a> {
    fn free_on_p(&self, j_fixed: usize, i: usize) -> CInterval {
        let inner = free_interval(self.q.points()[j_fixed], self.delta, self.p.points()[i], self.p.points()[i + 1]).inner;
        CInterval::with_fixed(
            CPoint::new(i, inner.begin.max(0.0)),
            CPoint::new(i, inner.end.min(1.0)),
            CPoint::at_vertex(j_fixed),
            1,
        )
    }

    fn free_on_q(&self, i_fixed: usize, j: usize) -> CInterval {
        let inner = free_interval(self.p.points()[i_fixed], self.delta, self.q.points()[j], self.q.points()[j + 1]).inner;
        CInterval::with_fixed(
            CPoint::new(j, inner.begin.max(0.0)),
            CPoint::new(j, inner.end.min(1.0)),
            CPoint::at_vertex(i_fixed),
            0,
        )
    }

    fn initial_bottom(&self) -> CIntervals {
        let mut run = CIntervals::new();
        for i in 0..self.p.last_index() {
            let free = self.free_on_p(0, i);
            if free.is_empty() || free.begin != CPoint::at_vertex(i) {
                break;
            }
            let reached_far_vertex = free.end >= CPoint::at_vertex(i + 1);
            run.push(free);
            if !reached_far_vertex {
                break;
            }
        }
        merge_concat(run, CIntervals::new())
    }

    fn initial_left(&self) -> CIntervals {
        let mut run = CIntervals::new();
        for j in 0..self.q.last_index() {
            let free = self.free_on_q(0, j);
            if free.is_empty() || free.begin != CPoint::at_vertex(j) {
                break;
            }
            let reached_far_vertex = free.end >= CPoint::at_vertex(j + 1);
            run.push(free);
            if !reached_far_vertex {
                break;
            }
        }
        merge_concat(run, CIntervals::new())
    }

    fn solve(&mut self, mut b: BoxSpan, bottom_in: CIntervals, left_in: CIntervals) -> (CIntervals, CIntervals) {
        if self.flags.empty_outputs
            && bottom_in.is_empty()
            && left_in.is_empty()
            && !b.contains_origin()
        {
            self.metrics.boxes_empty_inputs += 1;
            return (CIntervals::new(), CIntervals::new());
        }

        if self.flags.box_shrinking {
            shrink_box(&mut b, &bottom_in, &left_in);
        }

        if b.is_cell() {
            self.metrics.boxes_cell_resolved += 1;
            return self.solve_cell(b, &bottom_in, &left_in);
        }

        // Propagation 1/2 (quasi-simple intervals, spec §4.3): a box one cell
        // tall or one cell wide never needs the general bisection recursion --
        // its cells only ever chain through the single shared P-indexed (row)
        // or Q-indexed (column) edge between consecutive cells, so they can be
        // resolved in one flattened left-to-right or bottom-to-top pass.
        if self.flags.propagation1 && b.i2 - b.i1 == 1 {
            return self.solve_row_strip(b, &bottom_in, &left_in);
        }
        if self.flags.propagation2 && b.j2 - b.j1 == 1 {
            return self.solve_col_strip(b, &bottom_in, &left_in);
        }

        if self.flags.boundary_pruning {
            if bottom_in.is_empty() && left_in.is_empty() && b.contains_origin() {
                // origin-only entry with both candidate boundaries far from
                // the opposite curve: nothing downstream can be reachable.
                let top_far = is_point_too_far_from_curve(self.q.points()[b.j2], self.p, self.delta);
                let right_far = is_point_too_far_from_curve(self.p.points()[b.i2], self.q, self.delta);
                if top_far && right_far {
                    self.metrics.boxes_boundary_pruned += 1;
                    return (CIntervals::new(), CIntervals::new());
                }
            }
        }

        self.metrics.boxes_split += 1;
        self.split_and_recurse(b, bottom_in, left_in)
    }

    /// Propagation 1: resolve a height-1 box cell by cell along its row,
    /// threading each cell's top output into the next cell's bottom input.
    /// Only the first cell sees the box's real `left_in`; interior cells have
    /// no external left/right linkage to their row neighbors, only the
    /// shared top/bottom edge. The box's own `right_out` is the union of
    /// every cell's right output, since each one touches the box's single
    /// right-hand P-vertex at a different Q-sub-range.
    fn solve_row_strip(&mut self, b: BoxSpan, bottom_in: &CIntervals, left_in: &CIntervals) -> (CIntervals, CIntervals) {
        debug_assert_eq!(b.i2 - b.i1, 1);
        let mut cur_bottom = bottom_in.clone();
        let mut right_acc = CIntervals::new();
        for j in b.j1..b.j2 {
            let cell = BoxSpan { i1: b.i1, i2: b.i1 + 1, j1: j, j2: j + 1 };
            let cell_left = if j == b.j1 { left_in.clone() } else { CIntervals::new() };
            let (top, right) = self.solve_cell(cell, &cur_bottom, &cell_left);
            right_acc = merge_concat(right_acc, right);
            cur_bottom = top;
        }
        self.metrics.boxes_qsimple_resolved += 1;
        (cur_bottom, right_acc)
    }

    /// Propagation 2: the column-wise mirror of `solve_row_strip`, resolving
    /// a width-1 box cell by cell along its column.
    fn solve_col_strip(&mut self, b: BoxSpan, bottom_in: &CIntervals, left_in: &CIntervals) -> (CIntervals, CIntervals) {
        debug_assert_eq!(b.j2 - b.j1, 1);
        let mut cur_left = left_in.clone();
        let mut top_acc = CIntervals::new();
        for i in b.i1..b.i2 {
            let cell = BoxSpan { i1: i, i2: i + 1, j1: b.j1, j2: b.j1 + 1 };
            let cell_bottom = if i == b.i1 { bottom_in.clone() } else { CIntervals::new() };
            let (top, right) = self.solve_cell(cell, &cell_bottom, &cur_left);
            top_acc = merge_concat(top_acc, top);
            cur_left = right;
        }
        self.metrics.boxes_qsimple_resolved += 1;
        (top_acc, cur_left)
    }

    /// The single-cell base case (spec §4.3 "cell case"), using the exact
    /// convexity propagation described at the top of this module.
    fn solve_cell(&mut self, b: BoxSpan, bottom_in: &CIntervals, left_in: &CIntervals) -> (CIntervals, CIntervals) {
        let free_top = self.free_on_p(b.j2, b.i1);
        let free_right = self.free_on_q(b.i2, b.j1);

        let mut top_out = CIntervals::new();
        let mut right_out = CIntervals::new();

        if !free_top.is_empty() {
            if !left_in.is_empty() {
                top_out.push(free_top);
            } else if let Some(bi) = bottom_in.first() {
                if bi.begin <= free_top.end {
                    let begin = bi.begin.max(free_top.begin);
                    if begin <= free_top.end {
                        top_out.push(CInterval::with_fixed(begin, free_top.end, free_top.fixed, free_top.fixed_curve));
                    }
                }
            }
        }

        if !free_right.is_empty() {
            if !bottom_in.is_empty() {
                right_out.push(free_right);
            } else if let Some(li) = left_in.first() {
                if li.begin <= free_right.end {
                    let begin = li.begin.max(free_right.begin);
                    if begin <= free_right.end {
                        right_out.push(CInterval::with_fixed(begin, free_right.end, free_right.fixed, free_right.fixed_curve));
                    }
                }
            }
        }

        (top_out, right_out)
    }

    fn split_and_recurse(&mut self, b: BoxSpan, bottom_in: CIntervals, left_in: CIntervals) -> (CIntervals, CIntervals) {
        let height = b.i2 - b.i1;
        let width = b.j2 - b.j1;

        if height >= width && height > 1 {
            let mid = b.i1 + height / 2;
            let lo = BoxSpan { i1: b.i1, i2: mid, j1: b.j1, j2: b.j2 };
            let hi = BoxSpan { i1: mid, i2: b.i2, j1: b.j1, j2: b.j2 };
            let bottom_lo = restrict_to_p(&bottom_in, b.i1, mid);
            let bottom_hi = restrict_to_p(&bottom_in, mid, b.i2);
            let (lo_top, lo_right) = self.solve(lo, bottom_lo, left_in.clone());
            let (hi_top, hi_right) = self.solve(hi, bottom_hi, lo_right);
            (merge_concat(lo_top, hi_top), hi_right)
        } else {
            let mid = b.j1 + width / 2;
            let lo = BoxSpan { i1: b.i1, i2: b.i2, j1: b.j1, j2: mid };
            let hi = BoxSpan { i1: b.i1, i2: b.i2, j1: mid, j2: b.j2 };
            let left_lo = restrict_to_q(&left_in, b.j1, mid);
            let left_hi = restrict_to_q(&left_in, mid, b.j2);
            let (lo_top, lo_right) = self.solve(lo, bottom_in.clone(), left_lo);
            let (hi_top, hi_right) = self.solve(hi, lo_top, left_hi);
            (hi_top, merge_concat(lo_right, hi_right))
        }
    }
}

fn shrink_box(b: &mut BoxSpan, bottom_in: &CIntervals, left_in: &CIntervals) {
    if let (Some(first), Some(last)) = (bottom_in.first(), bottom_in.last()) {
        let lo = first.begin.point().max(b.i1);
        let hi = last.end.ceil().point().min(b.i2);
        if lo < hi {
            b.i1 = lo;
            b.i2 = hi;
        }
    }
    if let (Some(first), Some(last)) = (left_in.first(), left_in.last()) {
        let lo = first.begin.point().max(b.j1);
        let hi = last.end.ceil().point().min(b.j2);
        if lo < hi {
            b.j1 = lo;
            b.j2 = hi;
        }
    }
}

fn restrict_to_p(list: &CIntervals, lo: usize, hi: usize) -> CIntervals {
    let lo_pt = CPoint::at_vertex(lo);
    let hi_pt = CPoint::at_vertex(hi);
    list.iter()
        .filter_map(|iv| {
            let begin = iv.begin.max(lo_pt);
            let end = iv.end.min(hi_pt);
            if begin <= end {
                Some(CInterval { begin, end, ..*iv })
            } else {
                None
            }
        })
        .collect()
}

fn restrict_to_q(list: &CIntervals, lo: usize, hi: usize) -> CIntervals {
    restrict_to_p(list, lo, hi)
}

/// Merges two (already internally sorted, non-overlapping) candidate lists
/// from sibling sub-boxes into one sorted, non-overlapping list, unioning
/// touching or overlapping entries. Spec §4.3 "Merging".
fn merge_concat(mut a: CIntervals, b: CIntervals) -> CIntervals {
    a.extend(b);
    a.sort_by(|x, y| x.begin.cmp(&y.begin));
    let mut out: CIntervals = CIntervals::new();
    for iv in a {
        if let Some(last) = out.last_mut() {
            if iv.begin <= last.end {
                if iv.end > last.end {
                    last.end = iv.end;
                }
                continue;
            }
        }
        out.push(iv);
    }
    out
}

/// Decides `d_F(p, q) <= delta` using the recursive box decomposition,
/// bypassing the filter pipeline (callers wanting filters first should use
/// `crate::query::less_than`). Handles the degenerate 1-point-curve cases
/// the same way `naive::decide` does, since the box recursion assumes at
/// least one cell on each axis.
pub fn decide(p: &Curve, q: &Curve, delta: f64, flags: DeciderFlags, metrics: &mut Metrics) -> bool {
    if p.len() == 1 && q.len() == 1 {
        return p.front().dist(q.front()) <= delta;
    }
    if p.len() == 1 {
        return crate::naive::farthest_point_distance(p.front(), q) <= delta;
    }
    if q.len() == 1 {
        return crate::naive::farthest_point_distance(q.front(), p) <= delta;
    }

    let n = p.last_index();
    let m = q.last_index();
    let mut decider = Decider { p, q, delta, flags, metrics };

    let bottom_in = decider.initial_bottom();
    let left_in = decider.initial_left();

    let root = BoxSpan { i1: 0, i2: n, j1: 0, j2: m };
    let (top_out, right_out) = decider.solve(root, bottom_in, left_in);

    let corner_p = CPoint::at_vertex(n);
    let corner_q = CPoint::at_vertex(m);
    top_out.iter().any(|iv| iv.begin <= corner_p && corner_p <= iv.end)
        || right_out.iter().any(|iv| iv.begin <= corner_q && corner_q <= iv.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::geometry::Point;

    fn run(p: &Curve, q: &Curve, delta: f64) -> bool {
        let mut metrics = Metrics::default();
        decide(p, q, delta, DeciderFlags::all(), &mut metrics)
    }

    #[test]
    fn matches_naive_on_spec_scenarios() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.5), Point::new(2.0, 1.0)], "q");
        assert_eq!(run(&p, &q, 1.5), crate::naive::decide(&p, &q, 1.5));
        assert_eq!(run(&p, &q, 1.4999), crate::naive::decide(&p, &q, 1.4999));
    }

    #[test]
    fn matches_naive_on_random_like_zigzag() {
        let p = Curve::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(2.0, 0.0),
                Point::new(3.0, 1.0),
                Point::new(4.0, 0.0),
            ],
            "p",
        );
        let q = Curve::new(
            vec![
                Point::new(0.0, 0.5),
                Point::new(1.0, -0.5),
                Point::new(2.0, 0.5),
                Point::new(3.0, -0.5),
                Point::new(4.0, 0.5),
            ],
            "q",
        );
        for d in [0.1, 0.3, 0.5, 0.9, 1.0, 1.5] {
            assert_eq!(run(&p, &q, d), crate::naive::decide(&p, &q, d), "delta={d}");
        }
    }

    #[test]
    fn propagation_strips_agree_with_naive_and_actually_fire() {
        let p = Curve::new(
            (0..20).map(|i| Point::new(i as f64, (i % 3) as f64 * 0.1)).collect(),
            "p",
        );
        let q = Curve::new((0..2).map(|i| Point::new(i as f64 * 19.0, 0.2)).collect(), "q");
        let delta = 0.6;

        let mut metrics = Metrics::default();
        let light = decide(&p, &q, delta, DeciderFlags::all(), &mut metrics);
        assert_eq!(light, crate::naive::decide(&p, &q, delta));
        assert!(
            metrics.boxes_qsimple_resolved > 0,
            "a 19x1 free-space diagram should resolve through the propagation strips"
        );
    }

    #[test]
    fn empty_inputs_rule_short_circuits_far_boxes() {
        let p = Curve::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)], "p");
        let q = Curve::new(vec![Point::new(0.0, 100.0), Point::new(1.0, 100.0), Point::new(2.0, 100.0)], "q");
        let mut metrics = Metrics::default();
        assert!(!decide(&p, &q, 1.0, DeciderFlags::all(), &mut metrics));
    }
}
