//! # Datascope Tensor
//!
//! A generic N-dimensional boolean tensor (multi-dimensional bitmap) with
//! the set algebra used to combine and compare data-scope grants:
//! AND / OR / NOT, equality and containment, plus row-major coordinate
//! enumeration.
//!
//! A granted scope is built by OR-ing the tensors of a field's rules and
//! AND-ing across fields; access is allowed when the granted tensor
//! `contains` the requested one.

pub mod coords;
pub mod tensor;

pub use coords::Coordinates;
pub use tensor::BitTensor;

pub use datascope_core::{Coordinate, Result, ScopeError};
