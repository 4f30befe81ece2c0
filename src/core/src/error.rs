//! Unified error types for the data-scope engine
//!
//! Every failure the interval algebra, the bit tensor and the scope index
//! compiler can report is a variant of [`ScopeError`]. None of them are
//! transient: they indicate malformed input or inconsistent dimension
//! metadata, and no partial result is ever returned alongside them.

use thiserror::Error;

use crate::value::ScopeValue;

pub type Result<T> = std::result::Result<T, ScopeError>;

/// Core error type for the data-scope engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScopeError {
    /// A tensor shape with zero dimensions
    #[error("Tensor shape must have at least one dimension")]
    EmptyShape,

    /// A tensor dimension of length zero
    #[error("Dimension {dimension} has non-positive length in shape {shape:?}")]
    NonPositiveDimension { dimension: usize, shape: Vec<usize> },

    /// A coordinate whose length differs from the tensor rank
    #[error("Coordinate {coordinate:?} has {actual} components, tensor rank is {expected}")]
    CoordinateArityMismatch {
        coordinate: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// A coordinate component outside `[0, shape[i])`
    #[error("Coordinate {coordinate:?} is out of range for shape {shape:?}")]
    CoordinateOutOfRange {
        coordinate: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Binary algebra between tensors of different shapes
    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// A predicate names a dimension the schema does not define
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// An order bound that is not a breakpoint of its range dimension
    #[error("Unknown breakpoint {value} for dimension {dimension}")]
    UnknownBreakpoint { dimension: String, value: ScopeValue },

    /// A membership value that is not enumerated by its categorical dimension
    #[error("Unknown value {value} for dimension {dimension}")]
    UnknownValue { dimension: String, value: ScopeValue },

    /// Interval construction with left > right or a NaN bound
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Dimension metadata failed the consistency check
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Predicate operands do not fit the operator
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScopeError {
    /// Create an invalid interval error
    pub fn invalid_interval<S: Into<String>>(msg: S) -> Self {
        ScopeError::InvalidInterval(msg.into())
    }

    /// Create an invalid schema error
    pub fn invalid_schema<S: Into<String>>(msg: S) -> Self {
        ScopeError::InvalidSchema(msg.into())
    }

    /// Create an invalid predicate error
    pub fn invalid_predicate<S: Into<String>>(msg: S) -> Self {
        ScopeError::InvalidPredicate(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ScopeError::Config(msg.into())
    }

    /// Create an unknown dimension error
    pub fn unknown_dimension<S: Into<String>>(name: S) -> Self {
        ScopeError::UnknownDimension(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let err = ScopeError::invalid_schema("test");
        assert!(matches!(err, ScopeError::InvalidSchema(_)));

        let err = ScopeError::unknown_dimension("region");
        assert_eq!(err, ScopeError::UnknownDimension("region".to_string()));
    }

    #[test]
    fn test_error_display() {
        let err = ScopeError::ShapeMismatch {
            left: vec![2, 3],
            right: vec![3, 2],
        };
        assert_eq!(err.to_string(), "Shape mismatch: [2, 3] vs [3, 2]");

        let err = ScopeError::UnknownBreakpoint {
            dimension: "salary".to_string(),
            value: ScopeValue::Integer(25),
        };
        assert_eq!(err.to_string(), "Unknown breakpoint 25 for dimension salary");

        assert_eq!(
            ScopeError::EmptyShape.to_string(),
            "Tensor shape must have at least one dimension"
        );
    }
}
