//! Tunable constants and runtime flags, mirroring the reference
//! implementation's compile-time `bool` constants but made runtime-values so
//! the CLI and property tests can sweep them.

/// Absolute tolerance used throughout the geometry and certificate layers.
pub const EPS: f64 = 1e-8;

/// Half of `EPS`; the bisection fallback in `geometry::free_interval` treats
/// an interval narrower than this as converged.
pub const SAVE_EPS: f64 = EPS / 2.0;

/// Quarter of `EPS`; the shift applied around the quadratic's closed-form
/// root before falling back to bisection.
pub const SAVE_EPS_HALF: f64 = EPS / 4.0;

/// Per-rule enable flags for the free-space decider, gating the pruning
/// rules of spec §4.3 independently for ablation experiments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeciderFlags {
    pub box_shrinking: bool,
    pub empty_outputs: bool,
    pub propagation1: bool,
    pub propagation2: bool,
    pub boundary_pruning: bool,
}

impl DeciderFlags {
    pub const fn all() -> Self {
        Self {
            box_shrinking: true,
            empty_outputs: true,
            propagation1: true,
            propagation2: true,
            boundary_pruning: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            box_shrinking: false,
            empty_outputs: false,
            propagation1: false,
            propagation2: false,
            boundary_pruning: false,
        }
    }

    /// Derive the flag set for a pruning level in `0..=6`, per spec §4.3:
    /// level 0 is full enumeration, each level after enables one more rule.
    pub fn for_level(level: PruningLevel) -> Self {
        let level = level.0;
        Self {
            empty_outputs: level >= 1,
            box_shrinking: level >= 2,
            propagation1: level >= 3,
            propagation2: level >= 4,
            boundary_pruning: level >= 6,
        }
    }
}

impl Default for DeciderFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// A pruning level in `0..=6`, see spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PruningLevel(u8);

impl PruningLevel {
    pub const MAX: PruningLevel = PruningLevel(6);
    pub const NONE: PruningLevel = PruningLevel(0);

    pub fn new(level: u8) -> Self {
        Self(level.min(6))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for PruningLevel {
    fn default() -> Self {
        Self::MAX
    }
}

/// Capabilities that are wired up orthogonally to the core decider, per the
/// "conditional compilation as capabilities" design note: `onEmpty` and
/// `onReachable` are only ever invoked when a `Certificate` is being built,
/// never gated by a separate bool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub certify: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { certify: false }
    }
}
