use thiserror::Error;

use crate::modifier::Modifier;

/// Errors raised while evaluating a criteria document.
///
/// A missing value in the record is never an error; it just makes the
/// criterion fail. Everything here points at a broken criteria document.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("unknown modifier => {0}")]
    UnknownModifier(String),

    #[error("invalid operand for `{modifier}`: {reason}")]
    InvalidOperand { modifier: Modifier, reason: String },

    #[error("criterion mapping has no entries")]
    EmptyCriterion,

    #[error("invalid criteria document: {0}")]
    InvalidCriteria(String),

    #[error("combinator nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),
}

pub type Result<T> = std::result::Result<T, EvalError>;
