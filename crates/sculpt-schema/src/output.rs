//! Result of a serialize call.

use serde::Serialize;
use serde_json::Value;

use sculpt_core::{ErrorEntry, ErrorMap};

/// Sanitized data plus the flat error report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    /// An object in single mode, an array of objects in many mode.
    pub data: Value,
    /// Path-keyed data-validation failures.
    pub errors: ErrorMap,
}

impl Output {
    pub(crate) fn new(data: Value, errors: ErrorMap) -> Self {
        Self { data, errors }
    }

    /// Returns true if no errors were reported.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message of the earliest-reported error.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|(_, message)| message)
    }

    /// All errors as ordered `{path, message}` entries.
    pub fn verbose_error_list(&self) -> Vec<ErrorEntry> {
        self.errors.entries()
    }

    /// Split into data and errors.
    pub fn into_parts(self) -> (Value, ErrorMap) {
        (self.data, self.errors)
    }
}
