//! Candidate pruning over a stored collection of curves via an 8-D KD-tree,
//! plus the per-candidate filter -> decider query pipeline (spec §4.7).

use crate::config::DeciderFlags;
use crate::curve::Curve;
use crate::filters::{self, FilterVerdict};
use crate::id::CurveId;
use crate::metrics::Metrics;

const DIMS: usize = 8;

/// `(front.x, front.y, back.x, back.y, min_x, min_y, max_x, max_y)`.
fn signature(c: &Curve) -> [f64; DIMS] {
    let bbox = c.bbox();
    let front = c.front();
    let back = c.back();
    [front.x, front.y, back.x, back.y, bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y]
}

struct KdNode {
    id: CurveId,
    point: [f64; DIMS],
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// A fixed collection of curves, pre-indexed by an 8-D KD-tree over their
/// endpoint/bounding-box signatures.
pub struct Database {
    curves: Vec<Curve>,
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

impl Database {
    pub fn build(curves: Vec<Curve>) -> Self {
        let mut items: Vec<(CurveId, [f64; DIMS])> =
            curves.iter().enumerate().map(|(i, c)| (CurveId::new(i), signature(c))).collect();
        let mut nodes = Vec::with_capacity(items.len());
        let root = build_subtree(&mut items, 0, &mut nodes);
        Self { curves, nodes, root }
    }

    pub fn curve(&self, id: CurveId) -> &Curve {
        &self.curves[id.get()]
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Every stored curve whose signature is within `delta` of `query`'s
    /// under the product metric of §4.7: Euclidean on each endpoint pair,
    /// Chebyshev on the bounding-box coordinates. A sound lower bound on
    /// `d_F`, so this candidate set never misses a true positive.
    pub fn range_candidates(&self, query: &Curve, delta: f64) -> Vec<CurveId> {
        let q_sig = signature(query);
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.search(root, &q_sig, delta, &mut out);
        }
        out
    }

    fn search(&self, node_idx: usize, q_sig: &[f64; DIMS], delta: f64, out: &mut Vec<CurveId>) {
        let node = &self.nodes[node_idx];
        if within_bound(&node.point, q_sig, delta) {
            out.push(node.id);
        }
        let diff = node.point[node.axis] - q_sig[node.axis];
        let (near, far) = if diff >= 0.0 { (node.left, node.right) } else { (node.right, node.left) };
        if let Some(n) = near {
            self.search(n, q_sig, delta, out);
        }
        if diff.abs() <= delta {
            if let Some(f) = far {
                self.search(f, q_sig, delta, out);
            }
        }
    }

    /// Full range-query pipeline: KD-tree pruning, then filters, then the
    /// full decider as a last resort. Optionally checks an independent
    /// certificate on every match.
    pub fn query(&self, q: &Curve, delta: f64, flags: DeciderFlags, certify: bool, metrics: &mut Metrics) -> Vec<CurveId> {
        let candidates = self.range_candidates(q, delta);
        metrics.candidates_before_kdtree += self.len();
        metrics.candidates_after_kdtree += candidates.len();
        log::debug!("candidates: {} before kd-tree, {} after", self.len(), candidates.len());

        let mut matches = Vec::new();
        for id in candidates {
            let c = self.curve(id);
            let verdict = filters::run(q, c, delta, metrics);
            let is_match = match verdict {
                FilterVerdict::Yes => true,
                FilterVerdict::No => false,
                FilterVerdict::Unknown => crate::decider::decide(q, c, delta, flags, metrics),
            };
            if is_match {
                if certify {
                    let cert = crate::certificate::build(q, c, delta);
                    metrics.certificates_checked += 1;
                    if !crate::certificate::check(&cert, q, c, delta) {
                        metrics.certificates_failed += 1;
                        log::warn!("certificate check failed for curve {:?}", id);
                    }
                }
                matches.push(id);
            }
        }
        matches
    }

    /// Sharded variant of `query`: each candidate is evaluated on its own
    /// task with private decider scratch state, sharing only immutable
    /// curve data and this KD-tree (spec §4.7, §5).
    #[cfg(feature = "parallel")]
    pub fn query_parallel(&self, q: &Curve, delta: f64, flags: DeciderFlags, certify: bool) -> (Vec<CurveId>, Metrics) {
        use rayon::prelude::*;

        let candidates = self.range_candidates(q, delta);
        let mut merged = Metrics::default();
        merged.candidates_before_kdtree = self.len();
        merged.candidates_after_kdtree = candidates.len();

        let per_candidate: Vec<(Option<CurveId>, Metrics)> = candidates
            .par_iter()
            .map(|&id| {
                let mut metrics = Metrics::default();
                let c = self.curve(id);
                let verdict = filters::run(q, c, delta, &mut metrics);
                let is_match = match verdict {
                    FilterVerdict::Yes => true,
                    FilterVerdict::No => false,
                    FilterVerdict::Unknown => crate::decider::decide(q, c, delta, flags, &mut metrics),
                };
                if is_match && certify {
                    let cert = crate::certificate::build(q, c, delta);
                    metrics.certificates_checked += 1;
                    if !crate::certificate::check(&cert, q, c, delta) {
                        metrics.certificates_failed += 1;
                    }
                }
                (if is_match { Some(id) } else { None }, metrics)
            })
            .collect();

        let mut matches = Vec::new();
        for (found, metrics) in per_candidate {
            merged += metrics;
            if let Some(id) = found {
                matches.push(id);
            }
        }
        (matches, merged)
    }
}

fn within_bound(sig: &[f64; DIMS], query: &[f64; DIMS], delta: f64) -> bool {
    let front_ok = ((sig[0] - query[0]).powi(2) + (sig[1] - query[1]).powi(2)).sqrt() <= delta;
    let back_ok = ((sig[2] - query[2]).powi(2) + (sig[3] - query[3]).powi(2)).sqrt() <= delta;
    let bbox_ok = (4..8).all(|k| (sig[k] - query[k]).abs() <= delta);
    front_ok && back_ok && bbox_ok
}

fn build_subtree(items: &mut [(CurveId, [f64; DIMS])], depth: usize, nodes: &mut Vec<KdNode>) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let axis = depth % DIMS;
    let mid = items.len() / 2;
    items.select_nth_unstable_by(mid, |a, b| a.1[axis].partial_cmp(&b.1[axis]).unwrap());
    let (id, point) = items[mid];

    let idx = nodes.len();
    nodes.push(KdNode { id, point, axis, left: None, right: None });

    let (left_items, rest) = items.split_at_mut(mid);
    let right_items = &mut rest[1..];
    let left = build_subtree(left_items, depth + 1, nodes);
    let right = build_subtree(right_items, depth + 1, nodes);
    nodes[idx].left = left;
    nodes[idx].right = right;
    Some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn line(y: f64) -> Curve {
        Curve::new(vec![Point::new(0.0, y), Point::new(10.0, y)], "c")
    }

    #[test]
    fn range_candidates_include_all_true_positives() {
        let db = Database::build(vec![line(0.0), line(0.5), line(5.0), line(-0.4)]);
        let q = line(0.0);
        let candidates = db.range_candidates(&q, 1.0);
        let ids: Vec<usize> = candidates.iter().map(|c| c.get()).collect();
        assert!(ids.contains(&0));
        assert!(ids.contains(&1));
        assert!(ids.contains(&3));
        assert!(!ids.contains(&2));
    }

    #[test]
    fn query_matches_agree_with_naive_decider() {
        let db = Database::build(vec![line(0.0), line(0.5), line(5.0)]);
        let q = line(0.0);
        let mut metrics = Metrics::default();
        let matches = db.query(&q, 1.0, DeciderFlags::all(), false, &mut metrics);
        let ids: Vec<usize> = matches.iter().map(|c| c.get()).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
