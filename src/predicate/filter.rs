//! Strict predicate evaluation against rows
//!
//! Filters rows strictly according to the predicate AST.
//! No type coercion, exact match only. A row with a missing field never
//! matches a comparison on that field, not even `!=`; absence is not a
//! value. A null field value never satisfies any comparison (SQL-style:
//! `field = null` is not a match).

use std::cmp::Ordering;

use serde_json::Value;

use super::ast::{CompareOp, Predicate};
use crate::storage::Row;

/// Evaluates predicates against rows
pub struct RowFilter;

impl RowFilter {
    /// Checks if a row matches the predicate
    pub fn matches(row: &Row, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Compare { field, op, value } => Self::matches_compare(row, field, *op, value),
            Predicate::And(left, right) => Self::matches(row, left) && Self::matches(row, right),
            Predicate::Or(left, right) => Self::matches(row, left) || Self::matches(row, right),
            Predicate::Not(inner) => !Self::matches(row, inner),
        }
    }

    /// Checks a single comparison against a row
    fn matches_compare(row: &Row, field: &str, op: CompareOp, expected: &Value) -> bool {
        let actual = match row.get(field) {
            Some(v) => v,
            None => return false, // Missing field = no match
        };

        // Null values never satisfy a comparison
        if actual.is_null() {
            return false;
        }

        match op {
            CompareOp::Eq => actual == expected,
            CompareOp::Ne => actual != expected,
            CompareOp::Gt => Self::ordered(actual, expected, |o| o == Ordering::Greater),
            CompareOp::Gte => Self::ordered(actual, expected, |o| o != Ordering::Less),
            CompareOp::Lt => Self::ordered(actual, expected, |o| o == Ordering::Less),
            CompareOp::Lte => Self::ordered(actual, expected, |o| o != Ordering::Greater),
        }
    }

    /// Ordered comparison for numbers and strings; anything else never matches
    fn ordered<F>(actual: &Value, bound: &Value, check: F) -> bool
    where
        F: FnOnce(Ordering) -> bool,
    {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                // Exact integer comparison first, f64 as the general case
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return check(ai.cmp(&bi));
                }
                if let (Some(af), Some(bf)) = (a.as_f64(), b.as_f64()) {
                    if let Some(ordering) = af.partial_cmp(&bf) {
                        return check(ordering);
                    }
                }
                false
            }
            (Value::String(a), Value::String(b)) => check(a.as_str().cmp(b.as_str())),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {:?}", other),
        }
    }

    #[test]
    fn test_equality_match() {
        let r = row(json!({"author": "Richard", "id": 1}));

        assert!(RowFilter::matches(&r, &Predicate::eq("author", json!("Richard"))));
        assert!(!RowFilter::matches(&r, &Predicate::eq("author", json!("Morty"))));
    }

    #[test]
    fn test_inequality_match() {
        let r = row(json!({"author": "Morty"}));

        assert!(RowFilter::matches(
            &r,
            &Predicate::ne("author", json!("Richard Daniel Sanchez"))
        ));
        assert!(!RowFilter::matches(&r, &Predicate::ne("author", json!("Morty"))));
    }

    #[test]
    fn test_no_type_coercion() {
        let r = row(json!({"value": 123}));

        // String "123" must NOT match integer 123
        assert!(!RowFilter::matches(&r, &Predicate::eq("value", json!("123"))));
        assert!(RowFilter::matches(&r, &Predicate::eq("value", json!(123))));
    }

    #[test]
    fn test_range_predicates() {
        let r = row(json!({"age": 25}));

        assert!(RowFilter::matches(&r, &Predicate::gte("age", json!(18))));
        assert!(RowFilter::matches(&r, &Predicate::lte("age", json!(30))));
        assert!(!RowFilter::matches(&r, &Predicate::gt("age", json!(25))));
        assert!(!RowFilter::matches(&r, &Predicate::lt("age", json!(25))));
    }

    #[test]
    fn test_string_ordering() {
        let r = row(json!({"name": "Morty"}));

        assert!(RowFilter::matches(&r, &Predicate::gt("name", json!("Jerry"))));
        assert!(!RowFilter::matches(&r, &Predicate::gt("name", json!("Rick"))));
    }

    #[test]
    fn test_and_or_not() {
        let r = row(json!({"author": "Richard", "id": 3}));

        let both = Predicate::eq("author", json!("Richard")).and(Predicate::gt("id", json!(1)));
        assert!(RowFilter::matches(&r, &both));

        let either = Predicate::eq("author", json!("Morty")).or(Predicate::eq("id", json!(3)));
        assert!(RowFilter::matches(&r, &either));

        let negated = Predicate::eq("author", json!("Richard")).not();
        assert!(!RowFilter::matches(&r, &negated));
    }

    #[test]
    fn test_missing_field_no_match() {
        let r = row(json!({"name": "Alice"}));

        assert!(!RowFilter::matches(&r, &Predicate::eq("age", json!(30))));
        // Absence is not a value: != does not match a missing field either
        assert!(!RowFilter::matches(&r, &Predicate::ne("age", json!(30))));
    }

    #[test]
    fn test_null_value_no_match() {
        let r = row(json!({"name": null}));

        assert!(!RowFilter::matches(&r, &Predicate::eq("name", json!("Alice"))));
        assert!(!RowFilter::matches(&r, &Predicate::eq("name", Value::Null)));
    }

    #[test]
    fn test_cross_type_range_no_match() {
        let r = row(json!({"age": "25"}));

        assert!(!RowFilter::matches(&r, &Predicate::gte("age", json!(18))));
    }
}
