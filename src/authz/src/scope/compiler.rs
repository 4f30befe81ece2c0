//! Scope index compiler
//!
//! Turns one predicate over one dimension into the tensor coordinates it
//! activates. Every other dimension stays unconstrained, so the result is
//! the full cross-product of the activated slots with every other
//! dimension's complete slot range:
//!
//! ```text
//! department in ["eng"]          department × role
//!                                  hr   0 0
//!                                  eng  1 1   → [(1,0), (1,1)]
//! ```
//!
//! Order predicates (`>`, `>=`, `<`, `<=`) only work on range dimensions and
//! reduce to a contiguous slot interval thanks to the breakpoint-doubling
//! encoding (see [`super::schema`]). No value comparison happens here.
//!
//! Output size is `activated slots × Π(other dimension lengths)`, bounded by
//! the tensor's cell count.

use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use datascope_core::{Coordinate, Result, ScopeConfig, ScopeError, ScopeValue};
use datascope_tensor::{BitTensor, Coordinates};

use super::predicate::{Direction, ScopePredicate};
use super::schema::{Dimension, DimensionKind, DimensionSchema};

/// Compiles scope predicates against one dimension schema
///
/// # Examples
///
/// ```
/// use datascope_authz::scope::{DimensionSchema, ScopeIndexCompiler, ScopePredicate};
///
/// let schema = DimensionSchema::builder()
///     .categorical("a", ["a0", "a1"])
///     .categorical("b", ["b0", "b1"])
///     .build()
///     .unwrap();
/// let compiler = ScopeIndexCompiler::new(schema);
///
/// let coords = compiler.compile(&ScopePredicate::is_in("a", ["a1"])).unwrap();
/// assert_eq!(coords, vec![vec![1, 0], vec![1, 1]]);
/// ```
#[derive(Debug, Clone)]
pub struct ScopeIndexCompiler {
    schema: Arc<DimensionSchema>,
    config: ScopeConfig,
}

impl ScopeIndexCompiler {
    /// Creates a compiler with the default configuration
    pub fn new(schema: impl Into<Arc<DimensionSchema>>) -> Self {
        Self::with_config(schema, ScopeConfig::default())
    }

    /// Creates a compiler with a custom configuration
    pub fn with_config(schema: impl Into<Arc<DimensionSchema>>, config: ScopeConfig) -> Self {
        Self {
            schema: schema.into(),
            config,
        }
    }

    pub fn schema(&self) -> &DimensionSchema {
        &self.schema
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Tensor shape for this schema
    pub fn compute_shape(&self) -> Vec<usize> {
        self.schema.shape()
    }

    /// Rejects schemas whose tensor would exceed `max_cells`
    fn check_budget(&self) -> Result<usize> {
        match self.schema.cell_count() {
            Some(cells) if cells <= self.config.max_cells => Ok(cells),
            cells => Err(ScopeError::invalid_schema(format!(
                "shape {:?} has {} cells, limit is {}",
                self.schema.shape(),
                cells.map_or_else(|| "too many".to_string(), |c| c.to_string()),
                self.config.max_cells
            ))),
        }
    }

    /// Coordinates where `function` takes one of `values`
    ///
    /// On a categorical dimension each value maps to its slot; on a range
    /// dimension each value must be a breakpoint and maps to its odd slot.
    /// Repeated values are activated once.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownDimension`], [`ScopeError::UnknownValue`]
    /// (categorical) or [`ScopeError::UnknownBreakpoint`] (range).
    pub fn membership_coords(&self, function: &str, values: &[ScopeValue]) -> Result<Vec<Coordinate>> {
        let dimension = self.schema.dimension(function)?;
        let slots = membership_slots(dimension, values)?;
        self.expand(dimension, &slots)
    }

    /// Coordinates where `function` lies above or below `bound`
    ///
    /// `Greater` keeps slots `s + (inclusive ? 0 : 1) ..= 2n`, `Less` keeps
    /// `0 ..= s - (inclusive ? 0 : 1)`, where `s` is the breakpoint's slot.
    ///
    /// # Errors
    ///
    /// [`ScopeError::UnknownDimension`], or [`ScopeError::UnknownBreakpoint`]
    /// when `bound` is not a breakpoint of a range dimension named `function`.
    pub fn order_coords(
        &self,
        function: &str,
        bound: &ScopeValue,
        inclusive: bool,
        direction: Direction,
    ) -> Result<Vec<Coordinate>> {
        let dimension = self.schema.dimension(function)?;
        let slots: Vec<usize> = order_slots(dimension, bound, inclusive, direction)?.collect();
        self.expand(dimension, &slots)
    }

    /// Slots of the constrained dimension a predicate activates
    pub fn activated_slots(&self, predicate: &ScopePredicate) -> Result<Vec<usize>> {
        let dimension = self.schema.dimension(&predicate.function)?;
        match predicate.operator.order() {
            None => membership_slots(dimension, &predicate.values),
            Some((direction, inclusive)) => {
                let bound = single_operand(predicate)?;
                Ok(order_slots(dimension, bound, inclusive, direction)?.collect())
            }
        }
    }

    /// Coordinates activated by a predicate
    pub fn compile(&self, predicate: &ScopePredicate) -> Result<Vec<Coordinate>> {
        let result = self.compile_inner(predicate);

        match &result {
            Ok(coords) => debug!(
                predicate = %predicate,
                coordinates = coords.len(),
                "Compiled scope predicate"
            ),
            Err(e) => warn!(predicate = %predicate, error = %e, "Rejected scope predicate"),
        }

        result
    }

    fn compile_inner(&self, predicate: &ScopePredicate) -> Result<Vec<Coordinate>> {
        match predicate.operator.order() {
            None => self.membership_coords(&predicate.function, &predicate.values),
            Some((direction, inclusive)) => {
                let bound = single_operand(predicate)?;
                self.order_coords(&predicate.function, bound, inclusive, direction)
            }
        }
    }

    /// Tensor with exactly the predicate's coordinates set
    pub fn compile_tensor(&self, predicate: &ScopePredicate) -> Result<BitTensor> {
        let coords = self.compile(predicate)?;
        BitTensor::from_coordinates(self.schema.shape(), &coords)
    }

    /// All-false tensor of this schema's shape
    pub fn empty_tensor(&self) -> Result<BitTensor> {
        self.check_budget()?;
        BitTensor::new(self.schema.shape())
    }

    /// All-true tensor of this schema's shape
    pub fn full_tensor(&self) -> Result<BitTensor> {
        self.check_budget()?;
        BitTensor::full(self.schema.shape())
    }

    /// Cross-product of `slots` on `dimension` with every other dimension
    ///
    /// Coordinates are grouped by slot in the given order, row-major over the
    /// remaining dimensions within each group.
    fn expand(&self, dimension: &Dimension, slots: &[usize]) -> Result<Vec<Coordinate>> {
        self.check_budget()?;

        let position = dimension.position();
        let mut others = self.schema.shape();
        others[position] = 1;

        let per_slot: usize = others.iter().product();
        let total = per_slot * slots.len();
        let parallel = self.config.should_parallelize(total);
        trace!(
            dimension = dimension.name(),
            slots = ?slots,
            coordinates = total,
            parallel,
            "Expanding activated slots"
        );

        let rest = Coordinates::try_new(&others)?;
        let fan_out = |slot: usize| {
            rest.clone().map(move |mut coord| {
                coord[position] = slot;
                coord
            })
        };

        let coords: Vec<Coordinate> = if parallel {
            slots.par_iter().flat_map_iter(|&slot| fan_out(slot)).collect()
        } else {
            let mut coords = Vec::with_capacity(total);
            for &slot in slots {
                coords.extend(fan_out(slot));
            }
            coords
        };

        Ok(coords)
    }
}

fn single_operand(predicate: &ScopePredicate) -> Result<&ScopeValue> {
    match predicate.values.as_slice() {
        [bound] => Ok(bound),
        values => Err(ScopeError::invalid_predicate(format!(
            "'{}' on '{}' takes exactly one operand, got {}",
            predicate.operator,
            predicate.function,
            values.len()
        ))),
    }
}

fn membership_slots(dimension: &Dimension, values: &[ScopeValue]) -> Result<Vec<usize>> {
    let mut slots = Vec::with_capacity(values.len());
    for value in values {
        let slot = dimension.slot(value).ok_or_else(|| match dimension.kind() {
            DimensionKind::Categorical => ScopeError::UnknownValue {
                dimension: dimension.name().to_string(),
                value: value.clone(),
            },
            DimensionKind::Range => ScopeError::UnknownBreakpoint {
                dimension: dimension.name().to_string(),
                value: value.clone(),
            },
        })?;

        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }
    Ok(slots)
}

fn order_slots(
    dimension: &Dimension,
    bound: &ScopeValue,
    inclusive: bool,
    direction: Direction,
) -> Result<RangeInclusive<usize>> {
    let slot = match dimension.kind() {
        DimensionKind::Range => dimension.slot(bound),
        DimensionKind::Categorical => None,
    }
    .ok_or_else(|| ScopeError::UnknownBreakpoint {
        dimension: dimension.name().to_string(),
        value: bound.clone(),
    })?;

    // breakpoints sit on odd slots, so both neighbours exist
    let skip = usize::from(!inclusive);
    Ok(match direction {
        Direction::Greater => slot + skip..=dimension.last_slot(),
        Direction::Less => 0..=slot - skip,
    })
}
