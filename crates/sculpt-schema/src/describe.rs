//! # Schema Reflection
//!
//! Two side-effect-free views of a serializer's schema, used for
//! documentation rather than validation:
//!
//! - [`Serializer::describe`]: a recursive tree of kind names, required
//!   flags, array child kinds, and nested object descriptions.
//! - [`Serializer::json_schema`]: a JSON Schema (Draft 2020-12) document
//!   for one traversal mode.
//!
//! ## JSON Schema Approximation
//!
//! The exported document covers what is declarative: kinds, mode flags,
//! required fields and the builder extras (`min_length`, `max_length`,
//! `enum_options`, `min`, `max`). Custom validators, context rules, and
//! the falsy-as-absent rule cannot be expressed and are left out. A field
//! is listed as required only when it is required, has no default, has no
//! context rule, and the mode is not `output`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use sculpt_core::Mode;

use crate::field::{DefaultValue, FieldContract};
use crate::kind::{ArrayChild, FieldKind};
use crate::serializer::Serializer;

/// JSON Schema dialect of exported documents.
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Field name → description, in schema order.
pub type SchemaDescription = IndexMap<String, FieldDescription>;

/// Reflection of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Kind name, e.g. `CharField`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether absence is reported.
    pub required: bool,
    /// For array fields: the child's kind name, or `"Serializer"`.
    pub child: Option<String>,
    /// For object fields: the nested serializer's description.
    pub serializer: Option<SchemaDescription>,
}

impl Serializer {
    /// Recursive reflection of the schema.
    pub fn describe(&self) -> SchemaDescription {
        self.schema()
            .iter()
            .map(|(name, field)| (name.to_string(), describe_field(field)))
            .collect()
    }

    /// JSON Schema document describing what this serializer accepts in
    /// `mode`.
    pub fn json_schema(&self, mode: Mode) -> Value {
        let mut document = self.object_schema(mode);
        if let Value::Object(map) = &mut document {
            map.insert("$schema".into(), JSON_SCHEMA_DIALECT.into());
        }
        document
    }

    fn object_schema(&self, mode: Mode) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, field) in self.schema().iter() {
            if field.excluded_in(mode) {
                continue;
            }
            properties.insert(name.to_string(), field_schema(field, mode));
            if field.is_required()
                && field.default_value().is_none()
                && !field.has_context_rule()
                && mode != Mode::Output
            {
                required.push(Value::String(name.to_string()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn describe_field(field: &FieldContract) -> FieldDescription {
    let (child, serializer) = match field.kind() {
        FieldKind::Array(child) => (Some(child.name().to_string()), None),
        FieldKind::Object(nested) => (None, Some(nested.describe())),
        _ => (None, None),
    };
    FieldDescription {
        kind: field.kind().name().to_string(),
        required: field.is_required(),
        child,
        serializer,
    }
}

fn field_schema(field: &FieldContract, mode: Mode) -> Value {
    let mut schema = match field.kind() {
        FieldKind::Char => json!({"type": "string"}),
        FieldKind::Email => json!({"type": "string", "format": "email"}),
        FieldKind::Url => json!({"type": "string", "format": "uri"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Integer => json!({"type": "integer"}),
        FieldKind::Boolean => json!({"type": "boolean"}),
        FieldKind::DateTime | FieldKind::Date => json!({"type": "string", "format": "date-time"}),
        FieldKind::Json => json!({"type": ["object", "array"]}),
        FieldKind::Object(nested) => nested.object_schema(mode),
        FieldKind::Array(ArrayChild::Field(child)) => {
            json!({"type": "array", "items": field_schema(child, mode)})
        }
        FieldKind::Array(ArrayChild::Nested(nested)) => {
            json!({"type": "array", "items": nested.object_schema(mode)})
        }
    };

    if let Value::Object(map) = &mut schema {
        let extras = field.constraints();
        if let Some(n) = extras.min_length {
            map.insert("minLength".into(), json!(n));
        }
        if let Some(n) = extras.max_length {
            map.insert("maxLength".into(), json!(n));
        }
        if let Some(options) = &extras.options {
            map.insert("enum".into(), json!(options));
        }
        if let Some(n) = extras.min {
            map.insert("minimum".into(), json!(n));
        }
        if let Some(n) = extras.max {
            map.insert("maximum".into(), json!(n));
        }
        if mode == Mode::Both && field.is_read_only() {
            map.insert("readOnly".into(), Value::Bool(true));
        }
        if mode == Mode::Both && field.is_write_only() {
            map.insert("writeOnly".into(), Value::Bool(true));
        }
        if let Some(DefaultValue::Static(value)) = field.default_value() {
            map.insert("default".into(), value.clone());
        }
    }

    schema
}
