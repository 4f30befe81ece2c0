//! # Datascope Authz
//!
//! The decision core of a field/row-level data-scope authorization engine.
//!
//! Scope rules over independent categorical or ordered dimensions are
//! compiled into coordinates of a multi-dimensional boolean tensor, and the
//! tensor algebra combines and compares grants:
//!
//! ```text
//! DimensionSchema ─→ ScopeIndexCompiler ─→ coordinates ─→ BitTensor
//!                          ↑                                 │ and / or / not
//!                    ScopePredicate                          ↓
//!                                             granted.contains(requested)
//! ```
//!
//! Combining several rules into a final decision is left to the caller.

pub mod scope;

pub use scope::{
    Direction, DimensionKind, DimensionSchema, ScopeIndexCompiler, ScopeOperator, ScopePredicate,
};

pub use datascope_core::{
    normalize, Coordinate, Interval, Result, ScopeConfig, ScopeError, ScopeValue,
};
pub use datascope_tensor::{BitTensor, Coordinates};
