//! Dimension schema: the per-field metadata the compiler works against
//!
//! A schema bundles three maps that must agree with each other:
//!
//! - `function_index`: dimension name → position in the tensor shape
//! - `categorical_index`: dimension name → (value → slot) for enumerable
//!   dimensions, length = number of values
//! - `range_index`: dimension name → (breakpoint → slot) for ordered
//!   dimensions, using the breakpoint-doubling encoding
//!
//! # Breakpoint-doubling encoding
//!
//! A range dimension with `n` sorted breakpoints has length `2n + 1`.
//! Breakpoint `k` sits at odd slot `2k + 1`; the even slots `0, 2, …, 2n`
//! are the open gaps below, between and above the breakpoints:
//!
//! ```text
//! breakpoints:      10      20      30
//! slots:        0   1   2   3   4   5   6
//!             (<10) =10 (..) =20 (..) =30 (>30)
//! ```
//!
//! The schema is validated once at construction; compiler calls never
//! re-check it.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use datascope_core::{Result, ScopeError, ScopeValue};

/// Dimension name → position
pub type FunctionIndex = HashMap<String, usize>;

/// Value → slot within one dimension
pub type ValueIndex = HashMap<ScopeValue, usize>;

/// Dimension name → value index
pub type DimensionValueIndex = HashMap<String, ValueIndex>;

/// How a dimension's slots are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    /// One slot per enumerated value
    Categorical,
    /// Breakpoint-doubling encoding over sorted breakpoints
    Range,
}

/// One axis of the scope tensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: String,
    position: usize,
    kind: DimensionKind,
    slots: ValueIndex,
}

impl Dimension {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> DimensionKind {
        self.kind
    }

    /// Number of values (categorical) or breakpoints (range)
    pub fn value_count(&self) -> usize {
        self.slots.len()
    }

    /// Length of this axis in the tensor shape
    pub fn len(&self) -> usize {
        match self.kind {
            DimensionKind::Categorical => self.slots.len(),
            DimensionKind::Range => 2 * self.slots.len() + 1,
        }
    }

    /// True for a categorical dimension without values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot of a value or breakpoint
    pub fn slot(&self, value: &ScopeValue) -> Option<usize> {
        self.slots.get(value).copied()
    }

    /// Highest slot index, the `+∞` gap of a range dimension
    pub(crate) fn last_slot(&self) -> usize {
        self.len().saturating_sub(1)
    }
}

/// Validated dimension metadata for one field's scope tensor
///
/// # Examples
///
/// ```
/// use datascope_authz::scope::DimensionSchema;
///
/// let schema = DimensionSchema::builder()
///     .categorical("department", ["hr", "engineering"])
///     .range("salary", [30, 10, 20])
///     .build()
///     .unwrap();
///
/// assert_eq!(schema.shape(), vec![2, 7]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSchema {
    /// Dimensions ordered by position
    dimensions: Vec<Dimension>,
    /// Name → position
    positions: FunctionIndex,
}

impl DimensionSchema {
    /// Builds a schema from the three raw index maps
    ///
    /// # Errors
    ///
    /// [`ScopeError::InvalidSchema`] when the maps disagree: a dimension in
    /// both value maps, a value map without a position (or the reverse),
    /// positions that are not exactly `0..D`, categorical slots that are not
    /// `0..n`, or range slots that are not the odd slots `1, 3, …, 2n - 1`.
    pub fn new(
        function_index: FunctionIndex,
        categorical_index: DimensionValueIndex,
        range_index: DimensionValueIndex,
    ) -> Result<Self> {
        for name in categorical_index.keys() {
            if range_index.contains_key(name) {
                return Err(ScopeError::invalid_schema(format!(
                    "dimension '{}' is both categorical and range",
                    name
                )));
            }
        }

        let described = categorical_index
            .iter()
            .map(|(name, slots)| (name, DimensionKind::Categorical, slots))
            .chain(
                range_index
                    .iter()
                    .map(|(name, slots)| (name, DimensionKind::Range, slots)),
            );

        let mut by_position: Vec<Option<Dimension>> = vec![None; function_index.len()];
        for (name, kind, slots) in described {
            let position = *function_index.get(name).ok_or_else(|| {
                ScopeError::invalid_schema(format!("dimension '{}' has values but no position", name))
            })?;

            if position >= by_position.len() || by_position[position].is_some() {
                return Err(ScopeError::invalid_schema(format!(
                    "dimension '{}' has position {}, positions must be exactly 0..{}",
                    name,
                    position,
                    function_index.len()
                )));
            }

            validate_slots(name, kind, slots)?;

            by_position[position] = Some(Dimension {
                name: name.clone(),
                position,
                kind,
                slots: slots.clone(),
            });
        }

        let mut dimensions = Vec::with_capacity(by_position.len());
        for (position, dimension) in by_position.into_iter().enumerate() {
            match dimension {
                Some(d) => dimensions.push(d),
                None => {
                    let name = function_index
                        .iter()
                        .find(|(_, p)| **p == position)
                        .map(|(n, _)| n.as_str())
                        .unwrap_or("<none>");
                    return Err(ScopeError::invalid_schema(format!(
                        "dimension '{}' at position {} has no value index",
                        name, position
                    )));
                }
            }
        }

        let schema = Self {
            dimensions,
            positions: function_index,
        };
        debug!(rank = schema.rank(), shape = ?schema.shape(), "Validated dimension schema");

        Ok(schema)
    }

    /// Starts a schema declaration from plain value lists
    pub fn builder() -> DimensionSchemaBuilder {
        DimensionSchemaBuilder::default()
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Dimensions in position order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Looks a dimension up by name
    pub fn dimension(&self, name: &str) -> Result<&Dimension> {
        self.positions
            .get(name)
            .map(|&position| &self.dimensions[position])
            .ok_or_else(|| ScopeError::unknown_dimension(name))
    }

    /// Per-dimension lengths: `n` for categorical, `2n + 1` for range
    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(Dimension::len).collect()
    }

    /// Product of the shape, `None` on overflow
    pub fn cell_count(&self) -> Option<usize> {
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
    }
}

fn validate_slots(name: &str, kind: DimensionKind, slots: &ValueIndex) -> Result<()> {
    let n = slots.len();
    let expected: HashSet<usize> = match kind {
        DimensionKind::Categorical => (0..n).collect(),
        DimensionKind::Range => (0..n).map(|k| 2 * k + 1).collect(),
    };
    let actual: HashSet<usize> = slots.values().copied().collect();

    if actual != expected {
        let mut got: Vec<usize> = slots.values().copied().collect();
        got.sort_unstable();
        return Err(ScopeError::invalid_schema(format!(
            "dimension '{}' ({:?}) has slots {:?}, expected {}",
            name,
            kind,
            got,
            match kind {
                DimensionKind::Categorical => format!("0..{}", n),
                DimensionKind::Range => format!("the odd slots below {}", 2 * n + 1),
            }
        )));
    }

    Ok(())
}

/// Declarative construction of a [`DimensionSchema`]
///
/// Positions follow declaration order. Categorical values keep their
/// declaration order (first occurrence wins); range breakpoints are sorted
/// ascending and deduplicated before slots `2k + 1` are assigned.
#[derive(Debug, Clone, Default)]
pub struct DimensionSchemaBuilder {
    dimensions: Vec<(String, DimensionKind, Vec<ScopeValue>)>,
}

impl DimensionSchemaBuilder {
    /// Declares an enumerable dimension
    pub fn categorical<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScopeValue>,
    {
        self.dimensions.push((
            name.into(),
            DimensionKind::Categorical,
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Declares an ordered dimension from its breakpoints
    pub fn range<I, V>(mut self, name: impl Into<String>, breakpoints: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScopeValue>,
    {
        self.dimensions.push((
            name.into(),
            DimensionKind::Range,
            breakpoints.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Assigns positions and slots and validates the result
    pub fn build(self) -> Result<DimensionSchema> {
        let mut function_index = FunctionIndex::new();
        let mut categorical_index = DimensionValueIndex::new();
        let mut range_index = DimensionValueIndex::new();

        for (position, (name, kind, mut values)) in self.dimensions.into_iter().enumerate() {
            if function_index.insert(name.clone(), position).is_some() {
                return Err(ScopeError::invalid_schema(format!(
                    "dimension '{}' declared twice",
                    name
                )));
            }

            let mut slots = ValueIndex::new();
            match kind {
                DimensionKind::Categorical => {
                    for value in values {
                        let next = slots.len();
                        slots.entry(value).or_insert(next);
                    }
                    categorical_index.insert(name, slots);
                }
                DimensionKind::Range => {
                    values.sort();
                    values.dedup();
                    for (k, value) in values.into_iter().enumerate() {
                        slots.insert(value, 2 * k + 1);
                    }
                    range_index.insert(name, slots);
                }
            }
        }

        DimensionSchema::new(function_index, categorical_index, range_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<const N: usize>(pairs: [(&str, usize); N]) -> ValueIndex {
        pairs
            .into_iter()
            .map(|(v, s)| (ScopeValue::from(v), s))
            .collect()
    }

    fn names<const N: usize>(pairs: [(&str, usize); N]) -> FunctionIndex {
        pairs.into_iter().map(|(n, p)| (n.to_string(), p)).collect()
    }

    #[test]
    fn test_shape_from_raw_maps() {
        let schema = DimensionSchema::new(
            names([("salary", 0), ("department", 1)]),
            HashMap::from([(
                "department".to_string(),
                values([("hr", 0), ("eng", 1), ("ops", 2)]),
            )]),
            HashMap::from([(
                "salary".to_string(),
                HashMap::from([
                    (ScopeValue::from(10), 1),
                    (ScopeValue::from(20), 3),
                ]),
            )]),
        )
        .unwrap();

        assert_eq!(schema.shape(), vec![5, 3]);
        assert_eq!(schema.cell_count(), Some(15));
        assert_eq!(schema.dimension("department").unwrap().position(), 1);
        assert_eq!(
            schema.dimension("salary").unwrap().kind(),
            DimensionKind::Range
        );
    }

    #[test]
    fn test_unknown_dimension() {
        let schema = DimensionSchema::builder()
            .categorical("a", ["a0"])
            .build()
            .unwrap();
        assert_eq!(
            schema.dimension("b"),
            Err(ScopeError::UnknownDimension("b".to_string()))
        );
    }

    #[test]
    fn test_dimension_in_both_maps() {
        let result = DimensionSchema::new(
            names([("a", 0)]),
            HashMap::from([("a".to_string(), values([("x", 0)]))]),
            HashMap::from([("a".to_string(), values([("x", 1)]))]),
        );
        assert!(matches!(result, Err(ScopeError::InvalidSchema(_))));
    }

    #[test]
    fn test_position_without_values() {
        let result = DimensionSchema::new(
            names([("a", 0), ("b", 1)]),
            HashMap::from([("a".to_string(), values([("x", 0)]))]),
            HashMap::new(),
        );
        assert!(matches!(result, Err(ScopeError::InvalidSchema(_))));
    }

    #[test]
    fn test_values_without_position() {
        let result = DimensionSchema::new(
            names([("a", 0)]),
            HashMap::from([
                ("a".to_string(), values([("x", 0)])),
                ("b".to_string(), values([("y", 0)])),
            ]),
            HashMap::new(),
        );
        assert!(matches!(result, Err(ScopeError::InvalidSchema(_))));
    }

    #[test]
    fn test_positions_must_be_dense() {
        let result = DimensionSchema::new(
            names([("a", 0), ("b", 2)]),
            HashMap::from([
                ("a".to_string(), values([("x", 0)])),
                ("b".to_string(), values([("y", 0)])),
            ]),
            HashMap::new(),
        );
        assert!(matches!(result, Err(ScopeError::InvalidSchema(_))));

        let result = DimensionSchema::new(
            names([("a", 0), ("b", 0)]),
            HashMap::from([
                ("a".to_string(), values([("x", 0)])),
                ("b".to_string(), values([("y", 0)])),
            ]),
            HashMap::new(),
        );
        assert!(matches!(result, Err(ScopeError::InvalidSchema(_))));
    }

    #[test]
    fn test_slot_layout_is_checked() {
        let categorical_gap = DimensionSchema::new(
            names([("a", 0)]),
            HashMap::from([("a".to_string(), values([("x", 0), ("y", 2)]))]),
            HashMap::new(),
        );
        assert!(matches!(categorical_gap, Err(ScopeError::InvalidSchema(_))));

        let range_on_even_slot = DimensionSchema::new(
            names([("r", 0)]),
            HashMap::new(),
            HashMap::from([("r".to_string(), values([("x", 1), ("y", 2)]))]),
        );
        assert!(matches!(range_on_even_slot, Err(ScopeError::InvalidSchema(_))));
    }

    #[test]
    fn test_builder_sorts_breakpoints() {
        let schema = DimensionSchema::builder()
            .range("salary", [30, 10, 20, 10])
            .categorical("role", ["admin", "viewer", "admin"])
            .build()
            .unwrap();

        let salary = schema.dimension("salary").unwrap();
        assert_eq!(salary.value_count(), 3);
        assert_eq!(salary.len(), 7);
        assert_eq!(salary.slot(&ScopeValue::from(10)), Some(1));
        assert_eq!(salary.slot(&ScopeValue::from(20)), Some(3));
        assert_eq!(salary.slot(&ScopeValue::from(30)), Some(5));

        let role = schema.dimension("role").unwrap();
        assert_eq!(role.len(), 2);
        assert_eq!(role.slot(&ScopeValue::from("viewer")), Some(1));

        assert_eq!(schema.shape(), vec![7, 2]);
    }

    #[test]
    fn test_builder_rejects_duplicate_names() {
        let result = DimensionSchema::builder()
            .categorical("a", ["x"])
            .range("a", [1])
            .build();
        assert!(matches!(result, Err(ScopeError::InvalidSchema(_))));
    }

    #[test]
    fn test_empty_range_dimension() {
        let schema = DimensionSchema::builder()
            .range("r", Vec::<i64>::new())
            .build()
            .unwrap();
        assert_eq!(schema.shape(), vec![1]);
    }
}
