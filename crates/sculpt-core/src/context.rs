//! # Caller Context
//!
//! A [`Context`] is an arbitrary JSON mapping handed in by the caller and
//! passed, read-only, to every context rule, validator, and computed
//! default during a serialize call. Typical contents are the requesting
//! user's role or the tenant the data belongs to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SculptError;
use crate::truthy::json_type_name;

/// Plain, non-null, non-array JSON mapping supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns `SculptError::InvalidOption` for `null`, arrays, and scalars.
    pub fn from_value(value: Value) -> Result<Self, SculptError> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(SculptError::invalid_option(
                "context",
                format!("expected a plain object, got {}", json_type_name(&other)),
            )),
        }
    }

    /// Add an entry, returning the context for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` holds the JSON value `true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the context has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Context {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_object() {
        let ctx = Context::from_value(json!({"isAdmin": true})).unwrap();
        assert!(ctx.flag("isAdmin"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_rejects_non_objects() {
        for bad in [json!(null), json!([1, 2]), json!("admin"), json!(3)] {
            let err = Context::from_value(bad).unwrap_err();
            assert!(matches!(
                err,
                SculptError::InvalidOption { option: "context", .. }
            ));
        }
    }

    #[test]
    fn test_map_conversions_round_trip() {
        let mut map = Map::new();
        map.insert("tenant".into(), json!("acme"));
        map.insert("isAdmin".into(), json!(true));

        let ctx = Context::from(map.clone());
        assert_eq!(ctx.as_map(), &map);
        assert_eq!(ctx.as_map().keys().collect::<Vec<_>>(), vec!["tenant", "isAdmin"]);
        assert_eq!(ctx, Context::new().with("tenant", "acme").with("isAdmin", true));
    }

    #[test]
    fn test_flag_requires_literal_true() {
        let ctx = Context::new().with("a", 1).with("b", "true").with("c", true);
        assert!(!ctx.flag("a"));
        assert!(!ctx.flag("b"));
        assert!(ctx.flag("c"));
        assert!(!ctx.flag("missing"));
    }
}
