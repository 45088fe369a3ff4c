//! # Error Types: Precondition Violations
//!
//! sculpt separates two tiers of failure:
//!
//! - **Precondition violations** (programmer misuse) are returned as
//!   [`SculptError`] before any traversal begins: bad options, a non-array
//!   input in many mode, or a schema nested deeper than the configured limit.
//! - **Data-validation outcomes** are never errors in this sense. They are
//!   accumulated into the path-keyed [`ErrorMap`](crate::ErrorMap) carried
//!   by the serializer output.

use thiserror::Error;

/// Precondition violation raised before a serialize call traverses any data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SculptError {
    /// A serialize option had the wrong type or an unrecognized value.
    #[error("invalid option '{option}': {reason}")]
    InvalidOption {
        /// Name of the offending option (`many`, `mode`, `context`, ...).
        option: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// `many` was requested but the input is not an array.
    #[error("expected array input when many=true, got {found}")]
    ExpectedArray {
        /// JSON type name of the input that was supplied.
        found: &'static str,
    },

    /// The schema graph nests deeper than the configured guard allows.
    #[error("schema depth {depth} exceeds the maximum of {max_depth}")]
    DepthExceeded {
        /// Depth of the schema being serialized.
        depth: usize,
        /// Configured limit.
        max_depth: usize,
    },
}

impl SculptError {
    pub(crate) fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let err = SculptError::invalid_option("mode", "expected one of both, input, output");
        assert_eq!(
            err.to_string(),
            "invalid option 'mode': expected one of both, input, output"
        );
    }

    #[test]
    fn test_expected_array_display() {
        let err = SculptError::ExpectedArray { found: "object" };
        assert!(err.to_string().contains("many=true"));
        assert!(err.to_string().contains("object"));
    }
}
