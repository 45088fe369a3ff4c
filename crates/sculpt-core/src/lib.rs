//! # sculpt-core: Foundational Types for Field Contracts
//!
//! This crate is the leaf of the sculpt workspace. It defines the small,
//! dependency-light vocabulary that the serializer engine in
//! `sculpt-schema` is written against:
//!
//! - [`Mode`]: which direction data is flowing (`input`, `output`, `both`).
//! - [`Context`]: the caller-supplied mapping consulted by context rules
//!   and validators.
//! - [`SerializeOptions`]: per-call configuration, strongly typed or parsed
//!   from a loosely typed JSON object with fail-fast checks.
//! - [`ErrorMap`] and [`ErrorSink`]: the flat, insertion-ordered,
//!   path-keyed error report and the seam through which fields report into it.
//! - [`path`]: builders for the dotted / bracketed / index-prefixed paths.
//! - [`truthy`]: JS-style falsiness, which decides when a value counts as absent.
//! - [`temporal`]: RFC 3339 date-time recognition.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sculpt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Precondition violations are [`SculptError`] values, never panics.

pub mod context;
pub mod error;
pub mod mode;
pub mod options;
pub mod path;
pub mod report;
pub mod temporal;
pub mod truthy;

// Re-export primary types for ergonomic imports.
pub use context::Context;
pub use error::SculptError;
pub use mode::Mode;
pub use options::{SerializeOptions, DEFAULT_MAX_DEPTH};
pub use report::{ErrorEntry, ErrorMap, ErrorSink};
pub use truthy::{is_falsy, json_type_name};
