//! # Serializer
//!
//! A [`Serializer`] owns an ordered [`Schema`] and walks input values
//! against it, producing an [`Output`] with the sanitized data and a flat,
//! path-keyed error report.
//!
//! ## Purity
//!
//! `serialize()` borrows the serializer immutably. Mode, context, and the
//! error map live in the call frame, so a serializer can be shared across
//! threads and called concurrently; every call returns a fresh `Output`.
//! [`Serializer::serialize_par`] uses this to fan many-mode items out on
//! the rayon thread pool.
//!
//! ## Depth Guard
//!
//! Each serializer records its schema depth when it is built. A nested
//! serializer is frozen behind an `Arc` before any field can reference it,
//! so a schema graph cannot loop back on itself; the depth guard bounds how
//! deep an acyclic graph may go before a call is rejected up front.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::{Map, Value};

use sculpt_core::{
    json_type_name, path, Context, ErrorMap, ErrorSink, Mode, SculptError, SerializeOptions,
};

use crate::field::{FieldContract, Outcome};
use crate::output::Output;

/// Ordered mapping of field name to contract. Declaration order is the
/// output key order.
///
/// Field names should not contain `.`, `[` or `]`. Those characters
/// delimit error paths, so a name like `"address.city"` reports at the
/// same path as the `city` field of an `address` object and one of the
/// two messages is lost. Descriptors reject such names; schemas built in
/// code are not checked.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldContract>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, returning the schema for chaining. Re-adding a name
    /// replaces its contract and keeps its original position.
    pub fn field(mut self, name: impl Into<String>, contract: FieldContract) -> Self {
        self.insert(name, contract);
        self
    }

    /// Add or replace a field in place.
    pub fn insert(&mut self, name: impl Into<String>, contract: FieldContract) {
        self.fields.insert(name.into(), contract);
    }

    /// Look up a field's contract.
    pub fn get(&self, name: &str) -> Option<&FieldContract> {
        self.fields.get(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, contract)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldContract)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, FieldContract)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, FieldContract)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, contract) in iter {
            schema.insert(name, contract);
        }
        schema
    }
}

/// Per-call settings threaded through a traversal.
#[derive(Debug, Clone, Copy)]
pub struct Traversal<'a> {
    mode: Mode,
    context: &'a Context,
}

impl<'a> Traversal<'a> {
    /// Settings for a traversal in `mode` with `context`.
    pub fn new(mode: Mode, context: &'a Context) -> Self {
        Self { mode, context }
    }

    /// The traversal mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The caller context.
    pub fn context(&self) -> &'a Context {
        self.context
    }
}

/// Validates and reshapes input trees against a schema.
#[derive(Debug, Clone)]
pub struct Serializer {
    schema: Schema,
    depth: usize,
}

impl Serializer {
    /// Build a serializer over `schema`.
    pub fn new(schema: Schema) -> Self {
        let depth = 1 + schema
            .iter()
            .map(|(_, field)| field.nested_depth())
            .max()
            .unwrap_or(0);
        Self { schema, depth }
    }

    /// The schema this serializer walks.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Nesting depth: 1 plus the depth of the deepest nested serializer.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Wrap in an `Arc` for sharing between several composite fields.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Validate and reshape `input`.
    ///
    /// In single mode `data` is an object; in many mode `input` must be an
    /// array and `data` is an array with one object per item, whose error
    /// paths are prefixed with the item index.
    ///
    /// # Errors
    ///
    /// Returns `SculptError::DepthExceeded` if the schema nests deeper than
    /// `options.max_depth`, and `SculptError::ExpectedArray` if `many` is
    /// set and `input` is not an array. Data-validation failures are never
    /// errors; they are reported in [`Output::errors`].
    pub fn serialize(
        &self,
        input: &Value,
        options: &SerializeOptions,
    ) -> Result<Output, SculptError> {
        let items = self.check_preconditions(input, options)?;
        let traversal = Traversal::new(options.mode, &options.context);
        tracing::debug!(
            mode = %options.mode,
            many = options.many,
            fields = self.schema.len(),
            "serializing input"
        );

        let mut errors = ErrorMap::new();
        let data = match items {
            Some(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let data = self.serialize_item(Some(item), Some(i), &traversal, &mut errors);
                    out.push(Value::Object(data));
                }
                Value::Array(out)
            }
            None => {
                Value::Object(self.serialize_item(Some(input), None, &traversal, &mut errors))
            }
        };

        tracing::debug!(errors = errors.len(), "serialization complete");
        Ok(Output::new(data, errors))
    }

    /// Like [`Serializer::serialize`], with options given as a loosely
    /// typed JSON object (`{"mode": "input", "many": false, "context": {}}`).
    ///
    /// # Errors
    ///
    /// Returns `SculptError::InvalidOption` for malformed options, before
    /// any traversal, and otherwise the errors of [`Serializer::serialize`].
    pub fn serialize_value(&self, input: &Value, options: &Value) -> Result<Output, SculptError> {
        let options = SerializeOptions::from_value(options)?;
        self.serialize(input, &options)
    }

    /// Like [`Serializer::serialize`], but many-mode items are processed
    /// in parallel. Results are merged in index order, so the output is
    /// identical to the sequential call.
    ///
    /// # Errors
    ///
    /// Same as [`Serializer::serialize`].
    pub fn serialize_par(
        &self,
        input: &Value,
        options: &SerializeOptions,
    ) -> Result<Output, SculptError> {
        let Some(items) = self.check_preconditions(input, options)? else {
            return self.serialize(input, options);
        };
        let traversal = Traversal::new(options.mode, &options.context);
        tracing::debug!(
            mode = %options.mode,
            items = items.len(),
            fields = self.schema.len(),
            "serializing input in parallel"
        );

        let results: Vec<(Map<String, Value>, ErrorMap)> = items
            .par_iter()
            .enumerate()
            .map(|(i, item)| {
                let mut item_errors = ErrorMap::new();
                let data = self.serialize_item(Some(item), Some(i), &traversal, &mut item_errors);
                (data, item_errors)
            })
            .collect();

        let mut errors = ErrorMap::new();
        let mut data = Vec::with_capacity(results.len());
        for (item, item_errors) in results {
            data.push(Value::Object(item));
            item_errors.merge_into(&mut errors, str::to_string);
        }

        tracing::debug!(errors = errors.len(), "serialization complete");
        Ok(Output::new(Value::Array(data), errors))
    }

    /// Checks run before traversal. Returns the items in many mode.
    fn check_preconditions<'v>(
        &self,
        input: &'v Value,
        options: &SerializeOptions,
    ) -> Result<Option<&'v Vec<Value>>, SculptError> {
        if self.depth > options.max_depth {
            return Err(SculptError::DepthExceeded {
                depth: self.depth,
                max_depth: options.max_depth,
            });
        }
        if !options.many {
            return Ok(None);
        }
        match input {
            Value::Array(items) => Ok(Some(items)),
            other => Err(SculptError::ExpectedArray {
                found: json_type_name(other),
            }),
        }
    }

    /// Walk one item. Only fields that produce a value appear in the
    /// returned map; each field receives `item` as its root.
    pub(crate) fn serialize_item(
        &self,
        item: Option<&Value>,
        index: Option<usize>,
        traversal: &Traversal<'_>,
        sink: &mut dyn ErrorSink,
    ) -> Map<String, Value> {
        let mut output = Map::new();
        for (key, field) in self.schema.iter() {
            let value = item.and_then(|it| it.get(key));
            let path = path::item_path(index, key);
            if let Outcome::Value(value) = field.serialize(value, item, &path, traversal, sink) {
                output.insert(key.to_string(), value);
            }
        }
        output
    }
}
