//! # Composite Fields
//!
//! Object and array fields hand a present value on to a nested serializer
//! or child contract once the shared gate (mode, context, absence) has let
//! it through.
//!
//! ## Partial Results
//!
//! Nested errors never abort the parent. A nested object's output is kept
//! even when it carries errors, and every element of an object array yields
//! an output entry, so an object array always has the input's length.
//!
//! Scalar arrays differ: an element the child contract skips (wrong type,
//! falsy, excluded) is dropped, so the output may be shorter than the input.
//!
//! Validators attached to the composite field itself are never called;
//! only the nested serializer's fields and the array's child contract
//! validate.

use serde_json::Value;

use sculpt_core::{path, ErrorMap, ErrorSink};

use crate::field::Outcome;
use crate::kind::ArrayChild;
use crate::serializer::{Serializer, Traversal};

/// Message reported when an array field receives a non-array value.
pub const EXPECTED_ARRAY_MESSAGE: &str = "Expected array";

/// Traverse `value` with the nested serializer and merge its errors
/// under `path`.
pub(crate) fn serialize_object(
    nested: &Serializer,
    value: &Value,
    path: &str,
    traversal: &Traversal<'_>,
    sink: &mut dyn ErrorSink,
) -> Outcome {
    Outcome::Value(serialize_nested(nested, value, path, traversal, sink))
}

/// Traverse every element of `value`, either through the nested serializer
/// or through the child contract.
pub(crate) fn serialize_array(
    child: &ArrayChild,
    value: &Value,
    root: Option<&Value>,
    path: &str,
    traversal: &Traversal<'_>,
    sink: &mut dyn ErrorSink,
) -> Outcome {
    let Value::Array(elements) = value else {
        sink.report(path, EXPECTED_ARRAY_MESSAGE);
        return Outcome::Skip;
    };

    let mut out = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let element_path = path::element_path(path, i);
        match child {
            ArrayChild::Nested(nested) => {
                out.push(serialize_nested(nested, element, &element_path, traversal, sink));
            }
            ArrayChild::Field(field) => {
                let outcome = field.serialize(Some(element), root, &element_path, traversal, sink);
                if let Outcome::Value(v) = outcome {
                    out.push(v);
                }
            }
        }
    }

    Outcome::Value(Value::Array(out))
}

fn serialize_nested(
    nested: &Serializer,
    item: &Value,
    path: &str,
    traversal: &Traversal<'_>,
    sink: &mut dyn ErrorSink,
) -> Value {
    let mut errors = ErrorMap::new();
    let data = nested.serialize_item(Some(item), None, traversal, &mut errors);
    errors.merge_into(sink, |child| path::nested_path(path, child));
    Value::Object(data)
}
