//! Structured scope predicates
//!
//! A predicate constrains one dimension: `department in ["hr", "ops"]`,
//! `salary >= 20`. Rule parsing happens upstream; the compiler only ever
//! sees these already-structured values.

use serde::{Deserialize, Serialize};
use std::fmt;

use datascope_core::ScopeValue;

/// Which side of a breakpoint an order predicate keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Slots above the breakpoint
    Greater,
    /// Slots below the breakpoint
    Less,
}

/// Predicate operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeOperator {
    In,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ScopeOperator {
    /// Direction and inclusivity of an order operator, `None` for `in`
    pub fn order(&self) -> Option<(Direction, bool)> {
        match self {
            ScopeOperator::In => None,
            ScopeOperator::Gt => Some((Direction::Greater, false)),
            ScopeOperator::Gte => Some((Direction::Greater, true)),
            ScopeOperator::Lt => Some((Direction::Less, false)),
            ScopeOperator::Lte => Some((Direction::Less, true)),
        }
    }
}

impl fmt::Display for ScopeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ScopeOperator::In => "in",
            ScopeOperator::Gt => ">",
            ScopeOperator::Gte => ">=",
            ScopeOperator::Lt => "<",
            ScopeOperator::Lte => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// One predicate over one named dimension
///
/// ```
/// use datascope_authz::scope::{ScopeOperator, ScopePredicate};
///
/// let p: ScopePredicate = serde_json::from_str(
///     r#"{"function": "salary", "operator": "gte", "values": [20]}"#,
/// ).unwrap();
///
/// assert_eq!(p, ScopePredicate::gte("salary", 20));
/// assert_eq!(p.operator, ScopeOperator::Gte);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopePredicate {
    /// Dimension name
    pub function: String,

    /// Operator applied to the dimension
    pub operator: ScopeOperator,

    /// Operands: any number for `in`, exactly one breakpoint otherwise
    #[serde(default)]
    pub values: Vec<ScopeValue>,
}

impl ScopePredicate {
    /// Create a predicate
    pub fn new(
        function: impl Into<String>,
        operator: ScopeOperator,
        values: Vec<ScopeValue>,
    ) -> Self {
        Self {
            function: function.into(),
            operator,
            values,
        }
    }

    /// `function in [values…]`
    pub fn is_in<I, V>(function: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScopeValue>,
    {
        Self::new(
            function,
            ScopeOperator::In,
            values.into_iter().map(Into::into).collect(),
        )
    }

    /// `function > bound`
    pub fn gt(function: impl Into<String>, bound: impl Into<ScopeValue>) -> Self {
        Self::new(function, ScopeOperator::Gt, vec![bound.into()])
    }

    /// `function >= bound`
    pub fn gte(function: impl Into<String>, bound: impl Into<ScopeValue>) -> Self {
        Self::new(function, ScopeOperator::Gte, vec![bound.into()])
    }

    /// `function < bound`
    pub fn lt(function: impl Into<String>, bound: impl Into<ScopeValue>) -> Self {
        Self::new(function, ScopeOperator::Lt, vec![bound.into()])
    }

    /// `function <= bound`
    pub fn lte(function: impl Into<String>, bound: impl Into<ScopeValue>) -> Self {
        Self::new(function, ScopeOperator::Lte, vec![bound.into()])
    }
}

impl fmt::Display for ScopePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        match self.operator {
            ScopeOperator::In => write!(f, "{} in [{}]", self.function, operands.join(", ")),
            op => write!(f, "{} {} {}", self.function, op, operands.join(", ")),
        }
    }
}
