//! Real intervals with open, closed and unbounded ends
//!
//! [`Interval`] is a small immutable value type with the set algebra needed to
//! reason about continuous scope ranges (salary bands, validity windows)
//! before they are discretized into range dimensions:
//!
//! - `overlaps` / `intersect` / `union` / `contains`
//! - [`normalize`] to collapse a list of overlapping or touching definitions
//!
//! A missing bound (`None`) means −∞ on the left or +∞ on the right. The
//! inclusivity flag of a missing bound is always `false`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, ScopeError};

/// An interval over the reals
///
/// # Invariants
///
/// - `left <= right` whenever both bounds are present
/// - `left == right` implies both ends are inclusive (a single point)
/// - an unbounded end is never inclusive
///
/// # Examples
///
/// ```
/// use datascope_core::Interval;
///
/// let a = Interval::right_open(1.0, 5.0).unwrap(); // [1, 5)
/// let b = Interval::closed(5.0, 9.0).unwrap();     // [5, 9]
///
/// assert!(!a.overlaps(&b));
/// assert_eq!(a.union(&b), vec![Interval::closed(1.0, 9.0).unwrap()]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr")]
pub struct Interval {
    left: Option<f64>,
    left_inclusive: bool,
    right: Option<f64>,
    right_inclusive: bool,
}

/// Unvalidated wire form, checked through [`Interval::new`] on deserialize
#[derive(Deserialize)]
struct IntervalRepr {
    left: Option<f64>,
    #[serde(default)]
    left_inclusive: bool,
    right: Option<f64>,
    #[serde(default)]
    right_inclusive: bool,
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = ScopeError;

    fn try_from(repr: IntervalRepr) -> Result<Self> {
        Interval::new(
            repr.left,
            repr.left_inclusive,
            repr.right,
            repr.right_inclusive,
        )
    }
}

/// One end of an interval: the bound value (if any) and its inclusivity
#[derive(Debug, Clone, Copy)]
struct End {
    value: Option<f64>,
    inclusive: bool,
}

impl End {
    fn new(value: Option<f64>, inclusive: bool) -> Self {
        Self { value, inclusive }
    }
}

impl Interval {
    /// Creates a new interval
    ///
    /// Inclusivity flags of unbounded ends are forced to `false`; equal bounds
    /// force both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInterval`] if `left > right` or either
    /// bound is NaN.
    pub fn new(
        left: Option<f64>,
        left_inclusive: bool,
        right: Option<f64>,
        right_inclusive: bool,
    ) -> Result<Self> {
        if left.is_some_and(f64::is_nan) || right.is_some_and(f64::is_nan) {
            return Err(ScopeError::invalid_interval("bounds must not be NaN"));
        }

        if let (Some(l), Some(r)) = (left, right) {
            if l > r {
                return Err(ScopeError::invalid_interval(format!(
                    "left bound {} is greater than right bound {}",
                    l, r
                )));
            }
        }

        Ok(Self::from_ends(
            End::new(left, left_inclusive),
            End::new(right, right_inclusive),
        ))
    }

    /// Builds an interval from ends already known to be ordered
    fn from_ends(left: End, right: End) -> Self {
        debug_assert!(match (left.value, right.value) {
            (Some(l), Some(r)) => l <= r,
            _ => true,
        });

        let mut left_inclusive = left.value.is_some() && left.inclusive;
        let mut right_inclusive = right.value.is_some() && right.inclusive;

        if let (Some(l), Some(r)) = (left.value, right.value) {
            if l == r {
                left_inclusive = true;
                right_inclusive = true;
            }
        }

        Self {
            left: left.value,
            left_inclusive,
            right: right.value,
            right_inclusive,
        }
    }

    /// `[left, right]`
    pub fn closed(left: f64, right: f64) -> Result<Self> {
        Self::new(Some(left), true, Some(right), true)
    }

    /// `(left, right)`
    pub fn open(left: f64, right: f64) -> Result<Self> {
        Self::new(Some(left), false, Some(right), false)
    }

    /// `(left, right]`
    pub fn left_open(left: f64, right: f64) -> Result<Self> {
        Self::new(Some(left), false, Some(right), true)
    }

    /// `[left, right)`
    pub fn right_open(left: f64, right: f64) -> Result<Self> {
        Self::new(Some(left), true, Some(right), false)
    }

    /// `[left, +∞)`
    pub fn at_least(left: f64) -> Result<Self> {
        Self::new(Some(left), true, None, false)
    }

    /// `(left, +∞)`
    pub fn greater_than(left: f64) -> Result<Self> {
        Self::new(Some(left), false, None, false)
    }

    /// `(-∞, right]`
    pub fn at_most(right: f64) -> Result<Self> {
        Self::new(None, false, Some(right), true)
    }

    /// `(-∞, right)`
    pub fn less_than(right: f64) -> Result<Self> {
        Self::new(None, false, Some(right), false)
    }

    /// `[value, value]`
    pub fn point(value: f64) -> Result<Self> {
        Self::closed(value, value)
    }

    /// `(-∞, +∞)`
    pub fn unbounded() -> Self {
        Self {
            left: None,
            left_inclusive: false,
            right: None,
            right_inclusive: false,
        }
    }

    pub fn left(&self) -> Option<f64> {
        self.left
    }

    pub fn right(&self) -> Option<f64> {
        self.right
    }

    pub fn is_left_inclusive(&self) -> bool {
        self.left_inclusive
    }

    pub fn is_right_inclusive(&self) -> bool {
        self.right_inclusive
    }

    /// Returns true for a degenerate single-point interval
    pub fn is_point(&self) -> bool {
        matches!((self.left, self.right), (Some(l), Some(r)) if l == r)
    }

    /// Returns true if neither end is bounded
    pub fn is_unbounded(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn left_end(&self) -> End {
        End::new(self.left, self.left_inclusive)
    }

    fn right_end(&self) -> End {
        End::new(self.right, self.right_inclusive)
    }

    /// Checks whether a single real lies inside this interval
    pub fn contains_value(&self, x: f64) -> bool {
        if x.is_nan() {
            return false;
        }

        let above_left = match self.left {
            None => true,
            Some(l) => l < x || (l == x && self.left_inclusive),
        };
        let below_right = match self.right {
            None => true,
            Some(r) => x < r || (x == r && self.right_inclusive),
        };

        above_left && below_right
    }

    /// Checks whether the two intervals share at least one point
    ///
    /// Intervals that touch at a bound only overlap when both sides include
    /// that bound. An unbounded end never rules out an overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        let ends_before = match (self.right, other.left) {
            (Some(r), Some(l)) => {
                r < l || (r == l && !(self.right_inclusive && other.left_inclusive))
            }
            _ => false,
        };

        let starts_after = match (self.left, other.right) {
            (Some(l), Some(r)) => {
                l > r || (l == r && !(self.left_inclusive && other.right_inclusive))
            }
            _ => false,
        };

        !(ends_before || starts_after)
    }

    /// Returns the common part of both intervals, or `None` if disjoint
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }

        let left = tighter_left(self.left_end(), other.left_end());
        let right = tighter_right(self.right_end(), other.right_end());

        // overlap guarantees left <= right
        Interval::new(left.value, left.inclusive, right.value, right.inclusive).ok()
    }

    /// Returns the union as one interval when possible, otherwise both inputs
    ///
    /// Overlapping intervals merge into their hull. Disjoint intervals merge
    /// only when they touch at a shared bound that at least one side
    /// includes; otherwise `[self, other]` is returned unchanged.
    pub fn union(&self, other: &Interval) -> Vec<Interval> {
        if !self.overlaps(other) {
            if touches(self.right_end(), other.left_end()) {
                return vec![Interval::from_ends(self.left_end(), other.right_end())];
            }
            if touches(other.right_end(), self.left_end()) {
                return vec![Interval::from_ends(other.left_end(), self.right_end())];
            }
            return vec![*self, *other];
        }

        let left = looser_left(self.left_end(), other.left_end());
        let right = looser_right(self.right_end(), other.right_end());

        vec![Interval::from_ends(left, right)]
    }

    /// Checks whether `other` lies inside this interval
    ///
    /// Bounds are compared by value: an exclusive bound of `self` equal to an
    /// inclusive bound of `other` does not rule out containment.
    pub fn contains(&self, other: &Interval) -> bool {
        if !self.overlaps(other) {
            return false;
        }
        if self.left.is_some() && other.left.is_none() {
            return false;
        }
        if self.right.is_some() && other.right.is_none() {
            return false;
        }

        if let (Some(sl), Some(ol)) = (self.left, other.left) {
            if sl > ol {
                return false;
            }
        }
        if let (Some(sr), Some(or)) = (self.right, other.right) {
            if sr < or {
                return false;
            }
        }

        true
    }
}

/// Two bounded ends at the same point, at least one of them inclusive
fn touches(upper: End, lower: End) -> bool {
    match (upper.value, lower.value) {
        (Some(u), Some(l)) => u == l && (upper.inclusive || lower.inclusive),
        _ => false,
    }
}

/// The larger of two left ends; equal values keep a point only if both do
fn tighter_left(a: End, b: End) -> End {
    match (a.value, b.value) {
        (None, _) => b,
        (_, None) => a,
        (Some(x), Some(y)) if x < y => b,
        (Some(x), Some(y)) if x > y => a,
        (Some(x), Some(_)) => End::new(Some(x), a.inclusive && b.inclusive),
    }
}

/// The smaller of two right ends; equal values keep a point only if both do
fn tighter_right(a: End, b: End) -> End {
    match (a.value, b.value) {
        (None, _) => b,
        (_, None) => a,
        (Some(x), Some(y)) if x < y => a,
        (Some(x), Some(y)) if x > y => b,
        (Some(x), Some(_)) => End::new(Some(x), a.inclusive && b.inclusive),
    }
}

/// The smaller of two left ends; −∞ wins over any bound
fn looser_left(a: End, b: End) -> End {
    match (a.value, b.value) {
        (None, _) | (_, None) => End::new(None, false),
        (Some(x), Some(y)) if x < y => a,
        (Some(x), Some(y)) if x > y => b,
        (Some(x), Some(_)) => End::new(Some(x), a.inclusive || b.inclusive),
    }
}

/// The larger of two right ends; +∞ wins over any bound
fn looser_right(a: End, b: End) -> End {
    match (a.value, b.value) {
        (None, _) | (_, None) => End::new(None, false),
        (Some(x), Some(y)) if x > y => a,
        (Some(x), Some(y)) if x < y => b,
        (Some(x), Some(_)) => End::new(Some(x), a.inclusive || b.inclusive),
    }
}

/// Orders intervals by their left end: −∞ first, then by value, with an
/// inclusive end before an exclusive one at the same value
fn cmp_left(a: &Interval, b: &Interval) -> Ordering {
    match (a.left, b.left) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x
            .total_cmp(&y)
            .then_with(|| b.left_inclusive.cmp(&a.left_inclusive)),
    }
}

/// Collapses overlapping and touching intervals
///
/// The result is sorted by left end and no two of its elements can be merged
/// by [`Interval::union`].
///
/// # Examples
///
/// ```
/// use datascope_core::interval::{normalize, Interval};
///
/// let merged = normalize(vec![
///     Interval::closed(5.0, 9.0).unwrap(),
///     Interval::right_open(1.0, 5.0).unwrap(),
///     Interval::closed(20.0, 30.0).unwrap(),
/// ]);
///
/// assert_eq!(merged, vec![
///     Interval::closed(1.0, 9.0).unwrap(),
///     Interval::closed(20.0, 30.0).unwrap(),
/// ]);
/// ```
pub fn normalize<I>(intervals: I) -> Vec<Interval>
where
    I: IntoIterator<Item = Interval>,
{
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    sorted.sort_by(cmp_left);

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for next in sorted {
        match merged.last_mut() {
            Some(last) => {
                let mut union = last.union(&next);
                if union.len() == 1 {
                    *last = union.remove(0);
                } else {
                    merged.push(next);
                }
            }
            None => merged.push(next),
        }
    }

    merged
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.left {
            Some(l) if self.left_inclusive => write!(f, "[{}", l)?,
            Some(l) => write!(f, "({}", l)?,
            None => write!(f, "(-∞")?,
        }
        write!(f, ", ")?;
        match self.right {
            Some(r) if self.right_inclusive => write!(f, "{}]", r),
            Some(r) => write!(f, "{})", r),
            None => write!(f, "+∞)"),
        }
    }
}
