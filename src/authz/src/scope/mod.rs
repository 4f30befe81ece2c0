//! Predicate-to-coordinate compilation over named scope dimensions
//!
//! This module turns structured scope predicates (`department in [...]`,
//! `salary >= 20`) into the coordinates they activate in a bit tensor whose
//! shape is derived from a [`DimensionSchema`].
//!
//! # Examples
//!
//! ```
//! use datascope_authz::scope::{DimensionSchema, ScopeIndexCompiler, ScopePredicate};
//!
//! let schema = DimensionSchema::builder()
//!     .categorical("department", ["hr", "engineering"])
//!     .range("salary", [10, 20, 30])
//!     .build()
//!     .unwrap();
//! let compiler = ScopeIndexCompiler::new(schema);
//!
//! let granted = compiler
//!     .compile_tensor(&ScopePredicate::is_in("department", ["engineering"]))
//!     .unwrap();
//! let requested = compiler
//!     .compile_tensor(&ScopePredicate::is_in("department", ["engineering"]))
//!     .unwrap()
//!     .and(&compiler.compile_tensor(&ScopePredicate::gt("salary", 20)).unwrap())
//!     .unwrap();
//!
//! assert!(granted.contains(&requested).unwrap());
//! ```

mod compiler;
mod predicate;
mod schema;


pub use compiler::ScopeIndexCompiler;
pub use predicate::{Direction, ScopeOperator, ScopePredicate};
pub use schema::{
    Dimension, DimensionKind, DimensionSchema, DimensionSchemaBuilder, DimensionValueIndex,
    FunctionIndex, ValueIndex,
};
