//! # Serialize Options
//!
//! Per-call configuration for a serializer run. Options are either built
//! in code through the consuming builder methods or parsed from a loosely
//! typed JSON object with [`SerializeOptions::from_value`], which checks
//! every recognized key eagerly so that misuse fails before traversal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::Context;
use crate::error::SculptError;
use crate::mode::Mode;
use crate::truthy::json_type_name;

/// Default schema nesting guard.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options for a single serialize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeOptions {
    /// Which fields take part, see [`Mode`].
    pub mode: Mode,
    /// Treat the input as an array of items.
    pub many: bool,
    /// Caller-supplied mapping for context rules and validators.
    pub context: Context,
    /// Deepest schema nesting the call will accept.
    pub max_depth: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Both,
            many: false,
            context: Context::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl SerializeOptions {
    /// Options with every default: `both` mode, single item, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the traversal mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set many mode.
    pub fn many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    /// Set the caller context.
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Set the schema nesting guard.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse options from a loosely typed JSON object.
    ///
    /// `null` yields the defaults. Absent keys take their defaults; unknown
    /// keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SculptError::InvalidOption` if:
    /// - the options value is neither an object nor `null`,
    /// - `many` is not a boolean,
    /// - `mode` is not one of `both`, `input`, `output`,
    /// - `context` is not a plain object,
    /// - `max_depth` is not a non-negative integer.
    pub fn from_value(options: &Value) -> Result<Self, SculptError> {
        let map = match options {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(SculptError::invalid_option(
                    "options",
                    format!("expected an object, got {}", json_type_name(other)),
                ))
            }
        };

        let mut parsed = Self::default();

        if let Some(many) = map.get("many") {
            parsed.many = many.as_bool().ok_or_else(|| {
                SculptError::invalid_option(
                    "many",
                    format!("expected a boolean, got {}", json_type_name(many)),
                )
            })?;
        }

        if let Some(mode) = map.get("mode") {
            let name = mode.as_str().ok_or_else(|| {
                SculptError::invalid_option(
                    "mode",
                    format!("expected a string, got {}", json_type_name(mode)),
                )
            })?;
            parsed.mode = name.parse()?;
        }

        if let Some(context) = map.get("context") {
            parsed.context = Context::from_value(context.clone())?;
        }

        if let Some(depth) = map.get("max_depth") {
            let depth = depth.as_u64().ok_or_else(|| {
                SculptError::invalid_option(
                    "max_depth",
                    format!("expected a non-negative integer, got {depth}"),
                )
            })?;
            parsed.max_depth = usize::try_from(depth).unwrap_or(usize::MAX);
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let opts = SerializeOptions::default();
        assert_eq!(opts.mode, Mode::Both);
        assert!(!opts.many);
        assert!(opts.context.is_empty());
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_from_null_is_default() {
        assert_eq!(
            SerializeOptions::from_value(&Value::Null).unwrap(),
            SerializeOptions::default()
        );
    }

    #[test]
    fn test_from_value_full() {
        let opts = SerializeOptions::from_value(&json!({
            "mode": "output",
            "many": true,
            "context": {"isAdmin": true},
            "max_depth": 4
        }))
        .unwrap();
        assert_eq!(opts.mode, Mode::Output);
        assert!(opts.many);
        assert!(opts.context.flag("isAdmin"));
        assert_eq!(opts.max_depth, 4);
    }

    #[test]
    fn test_many_must_be_boolean() {
        let err = SerializeOptions::from_value(&json!({"many": 1})).unwrap_err();
        assert!(matches!(err, SculptError::InvalidOption { option: "many", .. }));

        let err = SerializeOptions::from_value(&json!({"many": "true"})).unwrap_err();
        assert!(matches!(err, SculptError::InvalidOption { option: "many", .. }));
    }

    #[test]
    fn test_mode_must_be_recognized() {
        let err = SerializeOptions::from_value(&json!({"mode": "inbound"})).unwrap_err();
        assert!(matches!(err, SculptError::InvalidOption { option: "mode", .. }));

        let err = SerializeOptions::from_value(&json!({"mode": 1})).unwrap_err();
        assert!(matches!(err, SculptError::InvalidOption { option: "mode", .. }));
    }

    #[test]
    fn test_context_must_be_plain_object() {
        for bad in [json!(null), json!([]), json!("ctx")] {
            let err = SerializeOptions::from_value(&json!({"context": bad})).unwrap_err();
            assert!(matches!(
                err,
                SculptError::InvalidOption { option: "context", .. }
            ));
        }
    }

    #[test]
    fn test_options_must_be_object() {
        let err = SerializeOptions::from_value(&json!([true])).unwrap_err();
        assert!(matches!(
            err,
            SculptError::InvalidOption { option: "options", .. }
        ));
    }

    #[test]
    fn test_builder_chain() {
        let opts = SerializeOptions::new()
            .mode(Mode::Input)
            .many(true)
            .context(Context::new().with("tenant", "acme"))
            .max_depth(2);
        assert_eq!(opts.mode, Mode::Input);
        assert!(opts.many);
        assert_eq!(opts.context.get("tenant"), Some(&json!("acme")));
        assert_eq!(opts.max_depth, 2);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let opts: SerializeOptions = serde_json::from_value(json!({"mode": "input"})).unwrap();
        assert_eq!(opts.mode, Mode::Input);
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    }
}
