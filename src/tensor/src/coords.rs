//! Row-major enumeration of coordinate tuples

use std::iter::FusedIterator;

use datascope_core::{Coordinate, Result, ScopeError};

/// Iterator over the Cartesian product `[0, shape[0]) × … × [0, shape[n-1])`
///
/// Tuples come out in row-major order: the last dimension varies fastest.
/// The iterator is finite, cloneable (so enumeration can be restarted) and
/// knows its exact length. A shape containing a zero-length dimension yields
/// nothing; the empty shape yields a single empty tuple.
///
/// # Examples
///
/// ```
/// use datascope_tensor::Coordinates;
///
/// let all: Vec<_> = Coordinates::try_new(&[2, 2]).unwrap().collect();
/// assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
/// ```
#[derive(Debug, Clone)]
pub struct Coordinates {
    shape: Vec<usize>,
    next: Option<Coordinate>,
    remaining: usize,
}

impl Coordinates {
    /// Creates an enumeration over `shape`
    ///
    /// # Errors
    ///
    /// [`ScopeError::InvalidSchema`] when the number of tuples does not fit
    /// in a `usize`.
    pub fn try_new(shape: &[usize]) -> Result<Self> {
        let remaining = if shape.contains(&0) {
            0
        } else {
            shape
                .iter()
                .try_fold(1usize, |acc, &len| acc.checked_mul(len))
                .ok_or_else(|| {
                    ScopeError::invalid_schema(format!(
                        "shape {:?} overflows the address space",
                        shape
                    ))
                })?
        };

        Ok(Self::with_len(shape, remaining))
    }

    /// Enumeration over a shape whose product is already known to fit
    pub(crate) fn new(shape: &[usize]) -> Self {
        Self::with_len(shape, shape.iter().product())
    }

    fn with_len(shape: &[usize], remaining: usize) -> Self {
        Self {
            shape: shape.to_vec(),
            next: (remaining > 0).then(|| vec![0; shape.len()]),
            remaining,
        }
    }

    /// Advances `coord` to its row-major successor; false once exhausted
    fn advance(shape: &[usize], coord: &mut [usize]) -> bool {
        for dim in (0..shape.len()).rev() {
            coord[dim] += 1;
            if coord[dim] < shape[dim] {
                return true;
            }
            coord[dim] = 0;
        }
        false
    }
}

impl Iterator for Coordinates {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining -= 1;

        let mut successor = current.clone();
        if Self::advance(&self.shape, &mut successor) {
            self.next = Some(successor);
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Coordinates {}

impl FusedIterator for Coordinates {}
