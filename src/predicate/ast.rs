//! Predicate expression AST
//!
//! A predicate is a boolean expression over a row's field mapping.
//! Comparisons carry a field name, an operator, and a literal value;
//! combinators are explicit nodes, never inferred.

use serde_json::Value;

use super::errors::PredicateError;
use super::parser;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equals: `field = value`
    Eq,
    /// Not equals: `field != value`
    Ne,
    /// Greater than: `field > value`
    Gt,
    /// Greater than or equal: `field >= value`
    Gte,
    /// Less than: `field < value`
    Lt,
    /// Less than or equal: `field <= value`
    Lte,
}

impl CompareOp {
    /// Returns the operator as written in predicate source
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// A boolean expression over a row's fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field <op> literal`
    Compare {
        /// Field name
        field: String,
        /// Comparison operator
        op: CompareOp,
        /// Literal value to compare against
        value: Value,
    },
    /// Both sides must match
    And(Box<Predicate>, Box<Predicate>),
    /// Either side must match
    Or(Box<Predicate>, Box<Predicate>),
    /// Inner expression must not match
    Not(Box<Predicate>),
}

impl Predicate {
    /// Parse a predicate from its string form, e.g. `author = 'Richard'`.
    pub fn parse(input: &str) -> Result<Self, PredicateError> {
        parser::parse(input)
    }

    /// Create an equality comparison
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Eq,
            value,
        }
    }

    /// Create an inequality comparison
    pub fn ne(field: impl Into<String>, value: Value) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Ne,
            value,
        }
    }

    /// Create a greater-than comparison
    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Gt,
            value,
        }
    }

    /// Create a greater-than-or-equal comparison
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Gte,
            value,
        }
    }

    /// Create a less-than comparison
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Lt,
            value,
        }
    }

    /// Create a less-than-or-equal comparison
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self::Compare {
            field: field.into(),
            op: CompareOp::Lte,
            value,
        }
    }

    /// Combine two predicates with AND
    pub fn and(self, other: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Combine two predicates with OR
    pub fn or(self, other: Predicate) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Negate a predicate
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}
