//! Flat N-dimensional boolean tensor
//!
//! Cells live in one `Vec<bool>` addressed through a mixed-radix stride
//! table derived from the shape: `offset = Σ coord[i] * stride[i]`, with
//! the last dimension contiguous. Equality is a plain buffer comparison.
//!
//! All algebra is `O(cells)` where `cells = Π shape`; callers choosing very
//! large shapes pay for it in both memory and time.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Not;
use tracing::{debug, trace, warn};

use datascope_core::{Coordinate, Result, ScopeConfig, ScopeError};

use crate::coords::Coordinates;

/// A boolean tensor over a fixed shape (the multi-dimensional bitmap)
///
/// Algebra (`and`, `or`, `not`) never mutates its operands; it returns a
/// fresh tensor of the same shape.
///
/// # Examples
///
/// ```
/// use datascope_tensor::BitTensor;
///
/// // 3×4 bitmap with (0,1) and (2,3) set:
/// // 0 1 0 0
/// // 0 0 0 0
/// // 0 0 0 1
/// let t = BitTensor::from_coordinates(vec![3, 4], &[vec![0, 1], vec![2, 3]]).unwrap();
///
/// assert!(t.get(&[0, 1]).unwrap());
/// assert!(!t.get(&[1, 1]).unwrap());
/// assert_eq!(t.count_ones(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BitTensorRepr")]
pub struct BitTensor {
    shape: Vec<usize>,
    #[serde(skip)]
    strides: Vec<usize>,
    values: Vec<bool>,
}

#[derive(Deserialize)]
struct BitTensorRepr {
    shape: Vec<usize>,
    values: Vec<bool>,
}

impl TryFrom<BitTensorRepr> for BitTensor {
    type Error = ScopeError;

    fn try_from(repr: BitTensorRepr) -> Result<Self> {
        let (strides, cells) = layout(&repr.shape)?;
        if repr.values.len() != cells {
            return Err(ScopeError::ShapeMismatch {
                left: repr.shape,
                right: vec![repr.values.len()],
            });
        }

        Ok(Self {
            shape: repr.shape,
            strides,
            values: repr.values,
        })
    }
}

/// Validates a shape and returns its stride table and cell count
fn layout(shape: &[usize]) -> Result<(Vec<usize>, usize)> {
    if shape.is_empty() {
        return Err(ScopeError::EmptyShape);
    }

    if let Some(dimension) = shape.iter().position(|&len| len == 0) {
        return Err(ScopeError::NonPositiveDimension {
            dimension,
            shape: shape.to_vec(),
        });
    }

    let mut strides = vec![1; shape.len()];
    let mut cells: usize = 1;
    for dim in (0..shape.len()).rev() {
        strides[dim] = cells;
        cells = cells.checked_mul(shape[dim]).ok_or_else(|| {
            ScopeError::invalid_schema(format!("shape {:?} overflows the address space", shape))
        })?;
    }

    Ok((strides, cells))
}

impl BitTensor {
    fn filled(shape: Vec<usize>, value: bool) -> Result<Self> {
        let (strides, cells) = layout(&shape)?;
        debug!(shape = ?shape, cells, value, "Allocating bit tensor");

        Ok(Self {
            shape,
            strides,
            values: vec![value; cells],
        })
    }

    /// Creates an all-false tensor
    ///
    /// # Errors
    ///
    /// [`ScopeError::EmptyShape`] for a zero-rank shape and
    /// [`ScopeError::NonPositiveDimension`] for a zero-length dimension.
    pub fn new(shape: impl Into<Vec<usize>>) -> Result<Self> {
        Self::filled(shape.into(), false)
    }

    /// Creates an all-true tensor
    pub fn full(shape: impl Into<Vec<usize>>) -> Result<Self> {
        Self::filled(shape.into(), true)
    }

    /// Creates a tensor with exactly the listed coordinates set
    ///
    /// Fails on the first malformed coordinate; nothing is returned in that
    /// case.
    pub fn from_coordinates<C>(shape: impl Into<Vec<usize>>, coordinates: &[C]) -> Result<Self>
    where
        C: AsRef<[usize]>,
    {
        let mut tensor = Self::new(shape)?;
        for coordinate in coordinates {
            tensor.set(coordinate.as_ref(), true)?;
        }
        Ok(tensor)
    }

    /// Per-dimension lengths
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Number of true cells
    pub fn count_ones(&self) -> usize {
        self.values.iter().filter(|&&v| v).count()
    }

    /// True if no cell is set
    pub fn is_empty(&self) -> bool {
        !self.values.iter().any(|&v| v)
    }

    /// True if every cell is set
    pub fn is_full(&self) -> bool {
        self.values.iter().all(|&v| v)
    }

    fn offset(&self, coordinate: &[usize]) -> Result<usize> {
        if coordinate.len() != self.shape.len() {
            return Err(ScopeError::CoordinateArityMismatch {
                coordinate: coordinate.to_vec(),
                expected: self.shape.len(),
                actual: coordinate.len(),
            });
        }

        let mut offset = 0;
        for ((&c, &len), &stride) in coordinate.iter().zip(&self.shape).zip(&self.strides) {
            if c >= len {
                return Err(ScopeError::CoordinateOutOfRange {
                    coordinate: coordinate.to_vec(),
                    shape: self.shape.clone(),
                });
            }
            offset += c * stride;
        }

        Ok(offset)
    }

    fn coordinate_of(&self, mut offset: usize) -> Coordinate {
        self.strides
            .iter()
            .map(|&stride| {
                let c = offset / stride;
                offset %= stride;
                c
            })
            .collect()
    }

    /// Reads one cell
    pub fn get(&self, coordinate: &[usize]) -> Result<bool> {
        Ok(self.values[self.offset(coordinate)?])
    }

    /// Writes one cell
    pub fn set(&mut self, coordinate: &[usize], value: bool) -> Result<()> {
        let offset = self.offset(coordinate)?;
        self.values[offset] = value;
        Ok(())
    }

    /// Every coordinate of the tensor in row-major order
    pub fn all_coordinates(&self) -> Coordinates {
        Coordinates::new(&self.shape)
    }

    /// Coordinates of the set cells in row-major order
    pub fn true_coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(offset, _)| self.coordinate_of(offset))
    }

    fn check_shape(&self, other: &BitTensor) -> Result<()> {
        if self.shape != other.shape {
            warn!(left = ?self.shape, right = ?other.shape, "Rejecting algebra on mismatched shapes");
            return Err(ScopeError::ShapeMismatch {
                left: self.shape.clone(),
                right: other.shape.clone(),
            });
        }
        Ok(())
    }

    fn zip_cells<F>(&self, other: &BitTensor, config: &ScopeConfig, op: F) -> Result<BitTensor>
    where
        F: Fn(bool, bool) -> bool + Sync + Send,
    {
        self.check_shape(other)?;

        let parallel = config.should_parallelize(self.values.len());
        trace!(cells = self.values.len(), parallel, "Combining bit tensors");

        let values: Vec<bool> = if parallel {
            self.values
                .par_iter()
                .zip(other.values.par_iter())
                .map(|(&a, &b)| op(a, b))
                .collect()
        } else {
            self.values
                .iter()
                .zip(&other.values)
                .map(|(&a, &b)| op(a, b))
                .collect()
        };

        Ok(BitTensor {
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            values,
        })
    }

    /// Cell-wise AND
    pub fn and(&self, other: &BitTensor) -> Result<BitTensor> {
        self.and_with(other, &ScopeConfig::default())
    }

    /// Cell-wise AND, using the rayon pool above `config.parallel_threshold`
    pub fn and_with(&self, other: &BitTensor, config: &ScopeConfig) -> Result<BitTensor> {
        self.zip_cells(other, config, |a, b| a && b)
    }

    /// Cell-wise OR
    pub fn or(&self, other: &BitTensor) -> Result<BitTensor> {
        self.or_with(other, &ScopeConfig::default())
    }

    /// Cell-wise OR, using the rayon pool above `config.parallel_threshold`
    pub fn or_with(&self, other: &BitTensor, config: &ScopeConfig) -> Result<BitTensor> {
        self.zip_cells(other, config, |a, b| a || b)
    }

    /// Cell-wise negation
    pub fn not(&self) -> BitTensor {
        BitTensor {
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            values: self.values.iter().map(|&v| !v).collect(),
        }
    }

    /// Same shape and same cells
    pub fn equals(&self, other: &BitTensor) -> bool {
        self == other
    }

    /// Checks whether every cell set in `other` is also set in `self`
    ///
    /// Equivalent to `self.and(other)? == *other`, without allocating the
    /// intermediate tensor.
    pub fn contains(&self, other: &BitTensor) -> Result<bool> {
        self.check_shape(other)?;
        Ok(self
            .values
            .iter()
            .zip(&other.values)
            .all(|(&granted, &requested)| granted || !requested))
    }
}

impl Not for BitTensor {
    type Output = BitTensor;

    fn not(self) -> Self::Output {
        BitTensor::not(&self)
    }
}

impl Not for &BitTensor {
    type Output = BitTensor;

    fn not(self) -> Self::Output {
        BitTensor::not(self)
    }
}
