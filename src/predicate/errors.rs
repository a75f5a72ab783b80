//! Predicate parse errors

use thiserror::Error;

/// Errors raised while parsing a predicate expression.
///
/// Parse errors are user errors: they surface immediately and leave the
/// version log untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// The expression ended where more input was required.
    #[error("unexpected end of predicate expression")]
    UnexpectedEnd,

    /// A token that does not belong at this position.
    #[error("unexpected token `{token}` at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// A string literal without a closing quote.
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A numeric literal that does not parse.
    #[error("invalid number `{literal}` at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },

    /// Input remained after a complete expression was parsed.
    #[error("trailing input `{token}` after predicate at offset {offset}")]
    TrailingInput { token: String, offset: usize },
}

impl PredicateError {
    /// Returns the stable error code, per ERRORS.md.
    pub fn code(&self) -> &'static str {
        "CHRONO_PREDICATE_PARSE"
    }
}
