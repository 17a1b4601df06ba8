//! Error types for binding a surface to a shared string
//!
//! Errors are only produced while a binding is being set up. Once bound,
//! every reconciliation step is infallible: diffs are total over any two
//! strings and collaborators are trusted to deliver consistent notifications.

use thiserror::Error;

/// Result type alias for binding operations
pub type Result<T> = std::result::Result<T, BindError>;

/// Errors raised by [`bind`](crate::bind) and the host adapters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// An argument failed validation before any listener was registered
    #[error("expected {expected} for `{argument}`, but was: {actual}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: &'static str,
        /// What the argument was required to be
        expected: &'static str,
        /// Description of what was actually passed
        actual: String,
    },
}

impl BindError {
    /// Shorthand for building an [`BindError::InvalidArgument`]
    pub fn invalid_argument(
        argument: &'static str,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        BindError::InvalidArgument {
            argument,
            expected,
            actual: actual.into(),
        }
    }

    /// Name of the argument that was rejected
    pub fn argument(&self) -> &'static str {
        match self {
            BindError::InvalidArgument { argument, .. } => *argument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = BindError::invalid_argument("surface", "text or textarea element", "select");
        assert_eq!(
            err.to_string(),
            "expected text or textarea element for `surface`, but was: select"
        );
        assert_eq!(err.argument(), "surface");
    }
}
