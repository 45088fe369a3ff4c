//! # Error Report
//!
//! Data-validation outcomes are collected into an [`ErrorMap`]: a flat,
//! insertion-ordered mapping from path to message. Nested serializers
//! report into their own map, which the parent merges under a prefixed
//! path, so the final shape is always flat.
//!
//! ## One Message Per Path
//!
//! Reporting a second message for a path that already has one replaces
//! the message and keeps the path at its original position. A field with
//! several failing validators therefore surfaces only the last failure.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Destination for data-validation failures during a traversal.
pub trait ErrorSink {
    /// Record `message` at `path`, replacing any earlier message there.
    fn report(&mut self, path: &str, message: &str);
}

/// Flat, insertion-ordered `path → message` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, String>);

impl ErrorMap {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paths with an error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no errors were reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message recorded at `path`, if any.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    /// Whether `path` has an error.
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// The earliest-reported error.
    pub fn first(&self) -> Option<(&str, &str)> {
        self.0.first().map(|(p, m)| (p.as_str(), m.as_str()))
    }

    /// Iterate `(path, message)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, m)| (p.as_str(), m.as_str()))
    }

    /// Paths in report order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Re-report every entry into `sink`, with each path
    /// rewritten by `prefix`.
    pub fn merge_into(self, sink: &mut dyn ErrorSink, prefix: impl Fn(&str) -> String) {
        for (path, message) in self.0 {
            sink.report(&prefix(&path), &message);
        }
    }

    /// Ordered `{path, message}` entries.
    pub fn entries(&self) -> Vec<ErrorEntry> {
        self.iter()
            .map(|(path, message)| ErrorEntry {
                path: path.to_string(),
                message: message.to_string(),
            })
            .collect()
    }
}

impl ErrorSink for ErrorMap {
    fn report(&mut self, path: &str, message: &str) {
        if let Some(existing) = self.0.get_mut(path) {
            *existing = message.to_string();
        } else {
            self.0.insert(path.to_string(), message.to_string());
        }
    }
}

/// One entry of a verbose error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Location of the failure.
    pub path: String,
    /// Human-readable failure message.
    pub message: String,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    proptest! {
        /// Every path keeps exactly its last reported message.
        #[test]
        fn last_report_wins(reports in prop::collection::vec(("[a-c]", "[a-z]{1,6}"), 0..32)) {
            let mut errors = ErrorMap::new();
            let mut expected: HashMap<String, String> = HashMap::new();
            for (path, message) in &reports {
                errors.report(path, message);
                expected.insert(path.clone(), message.clone());
            }
            prop_assert_eq!(errors.len(), expected.len());
            for (path, message) in &expected {
                prop_assert_eq!(errors.get(path), Some(message.as_str()));
            }
        }

        /// Paths stay in first-report order.
        #[test]
        fn first_report_fixes_position(reports in prop::collection::vec("[a-e]", 0..32)) {
            let mut errors = ErrorMap::new();
            let mut order: Vec<String> = Vec::new();
            for path in &reports {
                errors.report(path, "x");
                if !order.contains(path) {
                    order.push(path.clone());
                }
            }
            let paths: Vec<String> = errors.paths().map(str::to_string).collect();
            prop_assert_eq!(paths, order);
        }
    }
}
