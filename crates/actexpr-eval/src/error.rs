//! Evaluation error types.

use crate::functions::Arity;
use thiserror::Error;

/// Errors raised while evaluating an expression.
///
/// Every error aborts the whole evaluation; there are no partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A top-level name is not present in the context.
    #[error("unknown variable access: {0}")]
    UnknownVariable(String),

    /// A property is missing from an object.
    #[error("unknown context access: {0}")]
    UnknownProperty(String),

    /// An operation received a value of the wrong shape.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A numeric index resolved outside `[0, len)`.
    #[error("index out of range: {index} (length {len})")]
    IndexOutOfRange { index: f64, len: usize },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The argument count violates the function's arity contract.
    #[error("invalid number of arguments for {function}. expected {expected}, got {got}")]
    ArityMismatch {
        function: String,
        expected: Arity,
        got: usize,
    },

    /// A built-in rejected one of its arguments.
    #[error("invalid argument to {function}: {message}")]
    InvalidArgument { function: String, message: String },

    /// An internal consistency check failed.
    #[error("internal evaluator error: {0}")]
    Internal(String),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_messages() {
        let exact = EvalError::ArityMismatch {
            function: "startsWith".into(),
            expected: Arity::Exactly(2),
            got: 1,
        };
        assert_eq!(
            exact.to_string(),
            "invalid number of arguments for startsWith. expected 2, got 1"
        );

        let min = EvalError::ArityMismatch {
            function: "join".into(),
            expected: Arity::AtLeast(1),
            got: 0,
        };
        assert_eq!(
            min.to_string(),
            "invalid number of arguments for join. expected at least 1, got 0"
        );
    }

    #[test]
    fn test_lookup_messages() {
        assert_eq!(
            EvalError::UnknownVariable("inputs".into()).to_string(),
            "unknown variable access: inputs"
        );
        assert_eq!(
            EvalError::UnknownProperty("sha".into()).to_string(),
            "unknown context access: sha"
        );
        assert_eq!(
            EvalError::IndexOutOfRange { index: 5.0, len: 2 }.to_string(),
            "index out of range: 5 (length 2)"
        );
    }
}
