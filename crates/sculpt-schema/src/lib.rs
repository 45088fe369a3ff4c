//! # sculpt-schema: Field Contracts & Serializers
//!
//! Validates and reshapes arbitrary JSON trees against a declarative
//! schema, producing a sanitized output tree plus a flat, path-keyed error
//! report. Used at service boundaries to check incoming data (`input`
//! mode) and to shape outgoing data (`output` mode), with per-field
//! visibility controlled by mode and by a caller-supplied context.
//!
//! ## Building Blocks
//!
//! - [`FieldContract`] (`field`): one schema node: kind, required flag,
//!   default, validator chain, context rule, read-only / write-only flags.
//! - [`FieldKind`] (`kind`): the closed set of kinds and their type
//!   predicates, including the composite object and array kinds.
//! - [`Serializer`] (`serializer`): walks an input against an ordered
//!   [`Schema`] and returns an [`Output`].
//! - `describe`: schema reflection and JSON Schema export.
//! - `descriptor`: schemas from YAML / JSON documents.
//!
//! ## Example
//!
//! ```
//! use sculpt_core::{Mode, SerializeOptions};
//! use sculpt_schema::{FieldContract, Schema, Serializer};
//! use serde_json::json;
//!
//! let users = Serializer::new(
//!     Schema::new()
//!         .field("name", FieldContract::string())
//!         .field("age", FieldContract::integer().min(18.0)),
//! );
//!
//! let out = users
//!     .serialize(
//!         &json!({"name": "", "age": 10}),
//!         &SerializeOptions::new().mode(Mode::Output),
//!     )
//!     .unwrap();
//!
//! assert_eq!(out.data, json!({}));
//! assert_eq!(out.errors.get("age"), Some("Must be ≥ 18"));
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `sculpt-core` internally.
//! - Data-validation failures are reported, never returned as `Err`.
//! - A serializer is immutable once built and safe to share across threads.

pub mod composite;
pub mod describe;
pub mod descriptor;
pub mod field;
pub mod kind;
pub mod output;
pub mod serializer;
pub mod validators;

pub use describe::{FieldDescription, SchemaDescription, JSON_SCHEMA_DIALECT};
pub use descriptor::{DescriptorError, FieldDescriptor, SchemaDescriptor};
pub use field::{
    ComputedDefaultFn, ContextRule, DefaultValue, FieldContract, Outcome, ValidatorFn,
    REQUIRED_MESSAGE, VALIDATION_FAILED_MESSAGE,
};
pub use kind::{ArrayChild, FieldKind};
pub use output::Output;
pub use serializer::{Schema, Serializer, Traversal};
pub use validators::Constraints;
