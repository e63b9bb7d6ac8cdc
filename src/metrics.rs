//! Explicit replacement for the reference implementation's process-wide
//! timing/counter bank (see design note in spec §9): a plain value threaded
//! through the query driver and summed across worker threads at batch end.

use derive_more::AddAssign;
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Copy, AddAssign, Serialize, Deserialize, Debug)]
pub struct Metrics {
    /// Number of boxes resolved by the empty-inputs rule.
    pub boxes_empty_inputs: usize,
    /// Number of boxes resolved directly as a single cell.
    pub boxes_cell_resolved: usize,
    /// Number of boxes resolved via quasi-simple propagation.
    pub boxes_qsimple_resolved: usize,
    /// Number of boxes resolved via the boundary-pruning rule.
    pub boxes_boundary_pruned: usize,
    /// Number of boxes that had to be split and recursed into.
    pub boxes_split: usize,

    /// Candidates resolved by each filter (indices match `FilterKind::ALL`).
    pub filter_bichromatic_hits: usize,
    pub filter_adaptive_greedy_hits: usize,
    pub filter_negative_hits: usize,
    pub filter_simultaneous_greedy_hits: usize,
    /// Candidates that needed the full decider because no filter resolved them.
    pub full_decider_calls: usize,

    /// Database-level counters.
    pub candidates_before_kdtree: usize,
    pub candidates_after_kdtree: usize,

    /// Certificates independently checked, and how many failed.
    pub certificates_checked: usize,
    pub certificates_failed: usize,
}

impl Metrics {
    pub fn record_filter_hit(&mut self, filter: FilterKind) {
        match filter {
            FilterKind::BichromaticFarthest => self.filter_bichromatic_hits += 1,
            FilterKind::AdaptiveGreedy => self.filter_adaptive_greedy_hits += 1,
            FilterKind::Negative => self.filter_negative_hits += 1,
            FilterKind::AdaptiveSimultaneousGreedy => self.filter_simultaneous_greedy_hits += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    BichromaticFarthest,
    AdaptiveGreedy,
    Negative,
    AdaptiveSimultaneousGreedy,
}
