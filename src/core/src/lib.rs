//! # Datascope Core
//!
//! Shared value types, the interval algebra, configuration and the error
//! catalogue for the data-scope authorization engine. The tensor and
//! compiler crates build on these.

pub mod config;
pub mod error;
pub mod interval;
pub mod value;

// Re-export commonly used types
pub use config::ScopeConfig;
pub use error::{Result, ScopeError};
pub use interval::{normalize, Interval};
pub use value::ScopeValue;

/// A full address into a tensor, one slot per dimension
pub type Coordinate = Vec<usize>;
