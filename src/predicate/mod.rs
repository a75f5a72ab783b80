//! Predicate language for row filtering
//!
//! Per VERSIONING.md §6, mutations select rows with a small, strict
//! expression language: field comparisons combined with AND / OR / NOT.
//! This is not a query language: no projections, no joins,
//! no functions. Just enough to say which rows an update or delete touches.
//!
//! Evaluation is strict: no type coercion, missing field = no match,
//! null never satisfies a comparison.

mod ast;
mod errors;
mod filter;
mod parser;

pub use ast::{CompareOp, Predicate};
pub use errors::PredicateError;
pub use filter::RowFilter;
