//! Phantom-typed integer indices, so a point index on curve `P` can never be
//! silently passed where a point index on curve `Q` is expected.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// An index into a sequence of `T`s. Two `Id<T>`/`Id<U>` values never unify
/// unless `T == U`, even though both are backed by a plain `usize`.
pub struct Id<T> {
    value: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: usize) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(self) -> usize {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Add<usize> for Id<T> {
    type Output = Id<T>;
    fn add(self, rhs: usize) -> Id<T> {
        Id::new(self.value + rhs)
    }
}

impl<T> Sub<usize> for Id<T> {
    type Output = Id<T>;
    fn sub(self, rhs: usize) -> Id<T> {
        Id::new(self.value - rhs)
    }
}

impl<T> Sub<Id<T>> for Id<T> {
    type Output = usize;
    fn sub(self, rhs: Id<T>) -> usize {
        self.value - rhs.value
    }
}

/// Marker type: an `Id<Point>` indexes a vertex of a single curve.
pub enum PointTag {}
pub type PointId = Id<PointTag>;

/// Marker type: an `Id<Curve>` indexes a curve within a database.
pub enum CurveTag {}
pub type CurveId = Id<CurveTag>;
