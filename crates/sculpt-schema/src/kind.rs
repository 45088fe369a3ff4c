//! # Field Kinds
//!
//! A closed set of tagged variants, one per kind of schema leaf or
//! composite. Each variant carries its own type predicate; the composites
//! carry the nested serializer or child contract they delegate to.
//!
//! | Kind | Name | Accepts |
//! |------|------|---------|
//! | `Char` | `CharField` | string |
//! | `Number` | `NumberField` | any number |
//! | `Integer` | `IntegerField` | number without a fractional part |
//! | `Boolean` | `BooleanField` | bool |
//! | `DateTime` | `DateTimeField` | RFC 3339 string |
//! | `Date` | `DateField` | same as `DateTime` |
//! | `Email` | `EmailField` | string, no format check |
//! | `Url` | `UrlField` | string, no format check |
//! | `Json` | `JsonField` | any object or array |
//! | `Object` | `ObjectField` | object, traversed by a nested serializer |
//! | `Array` | `ArrayField` | array, traversed per element |
//!
//! `Date`, `Email` and `Url` add nothing to their parent
//! predicate. Attach a validator when the shape matters.

use std::sync::Arc;

use serde_json::Value;

use sculpt_core::temporal;

use crate::field::FieldContract;
use crate::serializer::Serializer;

/// Kind of a field contract.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Text.
    Char,
    /// Any JSON number.
    Number,
    /// Whole numbers.
    Integer,
    /// `true` / `false`.
    Boolean,
    /// RFC 3339 date-time string.
    DateTime,
    /// Date; shares the date-time predicate.
    Date,
    /// Email address; shares the string predicate.
    Email,
    /// URL; shares the string predicate.
    Url,
    /// Opaque object or array, passed through untouched.
    Json,
    /// Nested object validated by a shared serializer.
    Object(Arc<Serializer>),
    /// Array validated element by element.
    Array(ArrayChild),
}

/// What an array field applies to each element, decided once at
/// construction.
#[derive(Debug, Clone)]
pub enum ArrayChild {
    /// Scalar elements checked by a child contract. Failing elements are
    /// dropped from the output.
    Field(Box<FieldContract>),
    /// Object elements traversed by a nested serializer. Every element
    /// yields an output entry.
    Nested(Arc<Serializer>),
}

impl FieldKind {
    /// Name used in `"Invalid <name>"` messages and schema descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Char => "CharField",
            Self::Number => "NumberField",
            Self::Integer => "IntegerField",
            Self::Boolean => "BooleanField",
            Self::DateTime => "DateTimeField",
            Self::Date => "DateField",
            Self::Email => "EmailField",
            Self::Url => "UrlField",
            Self::Json => "JsonField",
            Self::Object(_) => "ObjectField",
            Self::Array(_) => "ArrayField",
        }
    }

    /// Type predicate for this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Char | Self::Email | Self::Url => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => is_integer(value),
            Self::Boolean => value.is_boolean(),
            Self::DateTime | Self::Date => temporal::is_datetime(value),
            Self::Json => value.is_object() || value.is_array(),
            Self::Object(_) => value.is_object(),
            Self::Array(_) => value.is_array(),
        }
    }

    /// Whether this kind delegates to a nested contract or serializer.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    /// Whether string extras (`min_length`, `max_length`, `enum_options`)
    /// apply to this kind.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Char | Self::Email | Self::Url)
    }

    /// Whether numeric extras (`min`, `max`) apply to this kind.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Integer)
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

impl ArrayChild {
    /// Kind name of the child, or `"Serializer"` for nested serializers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Field(field) => field.kind().name(),
            Self::Nested(_) => "Serializer",
        }
    }
}

impl From<FieldContract> for ArrayChild {
    fn from(field: FieldContract) -> Self {
        Self::Field(Box::new(field))
    }
}

impl From<Serializer> for ArrayChild {
    fn from(serializer: Serializer) -> Self {
        Self::Nested(Arc::new(serializer))
    }
}

impl From<Arc<Serializer>> for ArrayChild {
    fn from(serializer: Arc<Serializer>) -> Self {
        Self::Nested(serializer)
    }
}
