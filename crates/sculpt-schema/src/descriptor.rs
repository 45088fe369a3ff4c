//! # Schema Descriptors
//!
//! Builds a [`Schema`] from a declarative YAML or JSON document, for
//! schemas that live in configuration rather than code. Everything a
//! descriptor can say maps onto a builder call; closures (custom
//! validators, context rules, computed defaults) can only be attached in
//! code.
//!
//! ```yaml
//! name:
//!   type: string
//!   min_length: 2
//! age:
//!   type: integer
//!   min: 18
//!   required: false
//! address:
//!   type: object
//!   fields:
//!     city: { type: string }
//! tags:
//!   type: array
//!   items: { type: string }
//! ```
//!
//! Field order in the document is the schema order.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::field::FieldContract;
use crate::kind::ArrayChild;
use crate::serializer::{Schema, Serializer};

/// Error while building a schema from a descriptor.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// The document could not be parsed into field specs.
    #[error("descriptor parse error: {0}")]
    Parse(String),

    /// A field named a type that does not exist.
    #[error("unknown field type '{kind}' at '{path}'")]
    UnknownType {
        /// Path of the field in the descriptor.
        path: String,
        /// The unrecognized type name.
        kind: String,
    },

    /// A composite field is missing its child definition.
    #[error("field '{path}' of type {kind} requires '{key}'")]
    MissingChild {
        /// Path of the field in the descriptor.
        path: String,
        /// Type of the field.
        kind: &'static str,
        /// Missing key (`fields` or `items`).
        key: &'static str,
    },

    /// A field name would make error paths ambiguous.
    #[error("invalid field name '{name}' under '{prefix}': must be non-empty without '.', '[' or ']'")]
    InvalidName {
        /// Path of the enclosing object, empty at the top level.
        prefix: String,
        /// The rejected name.
        name: String,
    },

    /// An option does not apply to the field's type.
    #[error("field '{path}': option '{option}' does not apply to type {kind}")]
    Inapplicable {
        /// Path of the field in the descriptor.
        path: String,
        /// Type of the field.
        kind: String,
        /// The misplaced option.
        option: &'static str,
    },
}

/// Declarative description of one field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    /// Type name: `string`, `number`, `integer`, `boolean`, `datetime`,
    /// `date`, `email`, `url`, `json`, `object`, `array`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether absence is reported. Defaults to true.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Fallback for absent values.
    #[serde(default)]
    pub default: Option<Value>,
    /// Skip in `input` mode.
    #[serde(default)]
    pub read_only: bool,
    /// Skip in `output` mode.
    #[serde(default)]
    pub write_only: bool,
    /// String extra.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// String extra.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// String extra.
    #[serde(default, rename = "enum")]
    pub options: Option<Vec<String>>,
    /// Numeric extra.
    #[serde(default)]
    pub min: Option<f64>,
    /// Numeric extra.
    #[serde(default)]
    pub max: Option<f64>,
    /// Nested fields of an `object`.
    #[serde(default)]
    pub fields: Option<SchemaDescriptor>,
    /// Element declaration of an `array`. An `object` element becomes a nested
    /// serializer.
    #[serde(default)]
    pub items: Option<Box<FieldDescriptor>>,
}

fn default_required() -> bool {
    true
}

/// Field name → declaration, in document order.
pub type SchemaDescriptor = IndexMap<String, FieldDescriptor>;

impl Schema {
    /// Build a schema from a YAML descriptor.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::Parse` for malformed YAML or unknown keys,
    /// and the other variants for semantically invalid fields.
    pub fn from_yaml_str(source: &str) -> Result<Self, DescriptorError> {
        let decl: SchemaDescriptor =
            serde_yaml::from_str(source).map_err(|e| DescriptorError::Parse(e.to_string()))?;
        build_schema(&decl, "")
    }

    /// Build a schema from a JSON descriptor.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::from_yaml_str`].
    pub fn from_json_value(source: &Value) -> Result<Self, DescriptorError> {
        let decl: SchemaDescriptor = serde_json::from_value(source.clone())
            .map_err(|e| DescriptorError::Parse(e.to_string()))?;
        build_schema(&decl, "")
    }
}

/// Characters that delimit error paths and so cannot appear in a field name.
const PATH_SEPARATORS: [char; 3] = ['.', '[', ']'];

fn build_schema(decl: &SchemaDescriptor, prefix: &str) -> Result<Schema, DescriptorError> {
    let mut schema = Schema::new();
    for (name, field) in decl {
        if name.is_empty() || name.contains(PATH_SEPARATORS) {
            return Err(DescriptorError::InvalidName {
                prefix: prefix.to_string(),
                name: name.clone(),
            });
        }
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        schema.insert(name.clone(), build_field(field, &path)?);
    }
    Ok(schema)
}

fn build_field(decl: &FieldDescriptor, path: &str) -> Result<FieldContract, DescriptorError> {
    let inapplicable = |option: &'static str| DescriptorError::Inapplicable {
        path: path.to_string(),
        kind: decl.kind.clone(),
        option,
    };

    if decl.kind != "object" && decl.fields.is_some() {
        return Err(inapplicable("fields"));
    }
    if decl.kind != "array" && decl.items.is_some() {
        return Err(inapplicable("items"));
    }

    let mut field = match decl.kind.as_str() {
        "string" => FieldContract::string(),
        "number" => FieldContract::number(),
        "integer" => FieldContract::integer(),
        "boolean" => FieldContract::boolean(),
        "datetime" => FieldContract::datetime(),
        "date" => FieldContract::date(),
        "email" => FieldContract::email(),
        "url" => FieldContract::url(),
        "json" => FieldContract::json(),
        "object" => {
            let fields = decl.fields.as_ref().ok_or_else(|| DescriptorError::MissingChild {
                path: path.to_string(),
                kind: "object",
                key: "fields",
            })?;
            FieldContract::object(Serializer::new(build_schema(fields, path)?))
        }
        "array" => {
            let items = decl.items.as_ref().ok_or_else(|| DescriptorError::MissingChild {
                path: path.to_string(),
                kind: "array",
                key: "items",
            })?;
            FieldContract::array(build_array_child(items, path)?)
        }
        other => {
            return Err(DescriptorError::UnknownType {
                path: path.to_string(),
                kind: other.to_string(),
            })
        }
    };

    let textual = field.kind().is_textual();
    let numeric = field.kind().is_numeric();

    if let Some(n) = decl.min_length {
        if !textual {
            return Err(inapplicable("min_length"));
        }
        field = field.min_length(n);
    }
    if let Some(n) = decl.max_length {
        if !textual {
            return Err(inapplicable("max_length"));
        }
        field = field.max_length(n);
    }
    if let Some(options) = &decl.options {
        if !textual {
            return Err(inapplicable("enum"));
        }
        field = field.enum_options(options.iter().cloned());
    }
    if let Some(bound) = decl.min {
        if !numeric {
            return Err(inapplicable("min"));
        }
        field = field.min(bound);
    }
    if let Some(bound) = decl.max {
        if !numeric {
            return Err(inapplicable("max"));
        }
        field = field.max(bound);
    }

    if !decl.required {
        field = field.optional();
    }
    if let Some(value) = &decl.default {
        field = field.default(value.clone());
    }
    if decl.read_only {
        field = field.read_only();
    }
    if decl.write_only {
        field = field.write_only();
    }

    Ok(field)
}

fn build_array_child(items: &FieldDescriptor, path: &str) -> Result<ArrayChild, DescriptorError> {
    let item_path = format!("{path}[]");
    if items.kind == "object" {
        reject_element_options(items, &item_path)?;
        let fields = items.fields.as_ref().ok_or_else(|| DescriptorError::MissingChild {
            path: item_path.clone(),
            kind: "object",
            key: "fields",
        })?;
        let nested = Serializer::new(build_schema(fields, &item_path)?);
        return Ok(ArrayChild::Nested(Arc::new(nested)));
    }
    Ok(build_field(items, &item_path)?.into())
}

/// An object element is traversed by a nested serializer, which has no
/// field-level settings of its own. Everything but `fields` is refused.
fn reject_element_options(items: &FieldDescriptor, path: &str) -> Result<(), DescriptorError> {
    let present = [
        ("required", !items.required),
        ("default", items.default.is_some()),
        ("read_only", items.read_only),
        ("write_only", items.write_only),
        ("min_length", items.min_length.is_some()),
        ("max_length", items.max_length.is_some()),
        ("enum", items.options.is_some()),
        ("min", items.min.is_some()),
        ("max", items.max.is_some()),
        ("items", items.items.is_some()),
    ];
    match present.into_iter().find(|(_, set)| *set) {
        Some((option, _)) => Err(DescriptorError::Inapplicable {
            path: path.to_string(),
            kind: "object element".to_string(),
            option,
        }),
        None => Ok(()),
    }
}
