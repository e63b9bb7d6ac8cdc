//! A static, array-embedded priority search tree supporting `report_and_delete`:
//! report every point dominated to the lower-right of a query corner and
//! remove it from the structure. Used by the NO-certificate builder to scan
//! a monotone staircase of candidate positions (spec §4.4).

/// A 2-D point with an attached value, keyed by `(x, y)` for the tree's
/// dual heap-on-y / BST-on-x invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PstPoint {
    pub x: f64,
    pub y: f64,
}

struct Node<V> {
    valid: bool,
    point: PstPoint,
    value: Option<V>,
    x_split: f64,
}

impl<V> Node<V> {
    fn empty() -> Self {
        Self {
            valid: false,
            point: PstPoint { x: 0.0, y: 0.0 },
            value: None,
            x_split: 0.0,
        }
    }
}

fn left(id: usize) -> usize {
    2 * id + 1
}
fn right(id: usize) -> usize {
    2 * id + 2
}

fn to_lower_right(p: PstPoint, corner: PstPoint) -> bool {
    p.x >= corner.x && p.y <= corner.y
}

/// Priority search tree over `(PstPoint, V)` pairs. `add` accumulates raw
/// points; `build` must be called once before `report_and_delete`.
pub struct PrioritySearchTree<V> {
    pending: Vec<(PstPoint, V)>,
    nodes: Vec<Node<V>>,
    ready: bool,
}

impl<V> Default for PrioritySearchTree<V> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            nodes: Vec::new(),
            ready: false,
        }
    }
}

impl<V> PrioritySearchTree<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, point: PstPoint, value: V) {
        self.pending.push((point, value));
        self.ready = false;
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.nodes.clear();
        self.ready = false;
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.nodes.is_empty()
    }

    /// Builds the tree from the accumulated points. Ported from the
    /// reference `build()`: a work-stack of `(id, range)` triples, each
    /// step peeling off the minimum-y point as the subtree root and
    /// splitting the remainder on the x-median.
    pub fn build(&mut self) {
        if self.pending.is_empty() {
            self.ready = true;
            return;
        }

        let mut work: Vec<(PstPoint, V)> = std::mem::take(&mut self.pending);
        let mut ids = vec![0usize; work.len()];

        struct BuildRange {
            id: usize,
            begin: usize,
            end: usize,
        }
        let mut stack = vec![BuildRange {
            id: 0,
            begin: 0,
            end: work.len(),
        }];

        let mut x_splits = vec![0.0f64; work.len()];

        while let Some(range) = stack.pop() {
            if range.end - range.begin == 1 {
                ids[range.begin] = range.id;
                continue;
            }

            let min_idx = (range.begin..range.end)
                .min_by(|&a, &b| work[a].0.y.partial_cmp(&work[b].0.y).unwrap())
                .unwrap();
            work.swap(range.begin, min_idx);

            let lo = range.begin + 1;
            let hi = range.end;
            debug_assert!(lo < hi, "a range with >1 elements has >=1 remaining after removing the min");
            let median = lo + (hi - lo) / 2;

            // nth_element on x within [lo, hi), pivoting at `median`.
            select_nth_by_x(&mut work, lo, median, hi);

            ids[range.begin] = range.id;
            x_splits[range.begin] = work[median].0.x;

            if lo < median {
                stack.push(BuildRange {
                    id: left(range.id),
                    begin: lo,
                    end: median,
                });
            }
            if median < hi {
                stack.push(BuildRange {
                    id: right(range.id),
                    begin: median,
                    end: hi,
                });
            }
        }

        let max_id = *ids.iter().max().unwrap();
        let mut nodes: Vec<Node<V>> = Vec::with_capacity(max_id + 1);
        nodes.resize_with(max_id + 1, Node::empty);

        for (i, (point, value)) in work.into_iter().enumerate() {
            let id = ids[i];
            nodes[id] = Node {
                valid: true,
                point,
                value: Some(value),
                x_split: x_splits[i],
            };
        }

        self.nodes = nodes;
        self.ready = true;
    }

    /// Reports, and removes, every stored point `p` with `p.x >= corner.x
    /// && p.y <= corner.y`, appending their values (in arbitrary order) to
    /// `result`.
    pub fn report_and_delete(&mut self, corner: PstPoint, result: &mut Vec<V>)
    where
        V: Clone,
    {
        debug_assert!(self.ready, "build() must run before report_and_delete()");
        if self.nodes.is_empty() {
            return;
        }

        let mut roots = Vec::new();
        let mut to_delete = Vec::new();

        let mut current_id = 0usize;
        while current_id < self.nodes.len() {
            if !self.nodes[current_id].valid {
                break;
            }
            let point = self.nodes[current_id].point;
            if to_lower_right(point, corner) {
                result.push(self.nodes[current_id].value.clone().unwrap());
                to_delete.push(current_id);
            }

            if corner.x > self.nodes[current_id].x_split {
                current_id = right(current_id);
            } else {
                roots.push(right(current_id));
                current_id = left(current_id);
            }
        }

        for root in roots {
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if id >= self.nodes.len() {
                    continue;
                }
                if !self.nodes[id].valid {
                    continue;
                }
                if self.nodes[id].point.y <= corner.y {
                    result.push(self.nodes[id].value.clone().unwrap());
                    to_delete.push(id);
                    stack.push(left(id));
                    stack.push(right(id));
                }
            }
        }

        self.delete_nodes(to_delete);
    }

    fn delete_nodes(&mut self, mut to_delete: Vec<usize>) {
        while let Some(mut current_id) = to_delete.pop() {
            self.nodes[current_id].valid = false;

            loop {
                let left_id = left(current_id);
                let right_id = right(current_id);
                let has_left = left_id < self.nodes.len() && self.nodes[left_id].valid;
                let has_right = right_id < self.nodes.len() && self.nodes[right_id].valid;

                if !has_left && !has_right {
                    break;
                } else if has_left && has_right {
                    if self.nodes[left_id].point.y < self.nodes[right_id].point.y {
                        self.rotate(current_id, left_id);
                        current_id = left_id;
                    } else {
                        self.rotate(current_id, right_id);
                        current_id = right_id;
                    }
                } else if has_left {
                    self.rotate(current_id, left_id);
                    current_id = left_id;
                } else {
                    self.rotate(current_id, right_id);
                    current_id = right_id;
                }
            }
        }
    }

    fn rotate(&mut self, parent_id: usize, child_id: usize) {
        debug_assert!(child_id == left(parent_id) || child_id == right(parent_id));
        self.nodes[parent_id].valid = true;
        self.nodes[parent_id].point = self.nodes[child_id].point;
        self.nodes[parent_id].value = self.nodes[child_id].value.take();
        self.nodes[child_id].valid = false;
    }
}

/// Partitions `work[begin..end]` so that `work[nth]` holds the element that
/// would be there under a full sort by x, as `std::nth_element` does.
fn select_nth_by_x<V>(work: &mut [(PstPoint, V)], begin: usize, nth: usize, end: usize) {
    if nth >= end || begin >= end {
        return;
    }
    let slice = &mut work[begin..end];
    let k = nth - begin;
    slice.select_nth_unstable_by(k, |a, b| a.0.x.partial_cmp(&b.0.x).unwrap());
}
