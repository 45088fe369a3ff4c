//! Convenience validators behind the kind-specific builder extras.
//!
//! Each one is a thin predicate over the field contract's validator
//! signature. String validators pass non-string values and numeric
//! validators pass non-numbers; the type check runs first, so on a
//! correctly kinded field they only ever see their own domain.

use serde_json::Value;

use sculpt_core::Context;

/// Kind-specific extras recorded on a contract for reflection.
///
/// Validation itself goes through the validator chain; these values only
/// feed [`Serializer::json_schema`](crate::Serializer::json_schema).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    /// Shortest accepted string, in characters.
    pub min_length: Option<usize>,
    /// Longest accepted string, in characters.
    pub max_length: Option<usize>,
    /// Accepted string values.
    pub options: Option<Vec<String>>,
    /// Smallest accepted number.
    pub min: Option<f64>,
    /// Largest accepted number.
    pub max: Option<f64>,
}

impl Constraints {
    /// Returns true if no extra is recorded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub(crate) fn min_length(n: usize) -> impl Fn(&Value, &Context) -> Result<(), String> {
    move |value, _| match value.as_str() {
        Some(s) if s.chars().count() < n => Err(format!("Must be at least {n} characters")),
        _ => Ok(()),
    }
}

pub(crate) fn max_length(n: usize) -> impl Fn(&Value, &Context) -> Result<(), String> {
    move |value, _| match value.as_str() {
        Some(s) if s.chars().count() > n => Err(format!("Must be at most {n} characters")),
        _ => Ok(()),
    }
}

pub(crate) fn enum_options(options: Vec<String>) -> impl Fn(&Value, &Context) -> Result<(), String> {
    move |value, _| match value.as_str() {
        Some(s) if !options.iter().any(|o| o == s) => {
            Err(format!("Must be one of: {}", options.join(", ")))
        }
        _ => Ok(()),
    }
}

pub(crate) fn min(bound: f64) -> impl Fn(&Value, &Context) -> Result<(), String> {
    move |value, _| match value.as_f64() {
        Some(n) if n < bound => Err(format!("Must be ≥ {bound}")),
        _ => Ok(()),
    }
}

pub(crate) fn max(bound: f64) -> impl Fn(&Value, &Context) -> Result<(), String> {
    move |value, _| match value.as_f64() {
        Some(n) if n > bound => Err(format!("Must be ≤ {bound}")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_length_counts_characters() {
        let ctx = Context::new();
        assert!(min_length(2)(&json!("ab"), &ctx).is_ok());
        assert_eq!(
            min_length(3)(&json!("ab"), &ctx).unwrap_err(),
            "Must be at least 3 characters"
        );
        assert!(max_length(2)(&json!("éé"), &ctx).is_ok());
        assert_eq!(
            max_length(1)(&json!("éé"), &ctx).unwrap_err(),
            "Must be at most 1 characters"
        );
    }

    #[test]
    fn test_enum_options() {
        let ctx = Context::new();
        let check = enum_options(vec!["red".into(), "blue".into()]);
        assert!(check(&json!("red"), &ctx).is_ok());
        assert_eq!(
            check(&json!("green"), &ctx).unwrap_err(),
            "Must be one of: red, blue"
        );
    }

    #[test]
    fn test_bounds_render_whole_numbers_plainly() {
        let ctx = Context::new();
        assert_eq!(min(18.0)(&json!(10), &ctx).unwrap_err(), "Must be ≥ 18");
        assert_eq!(max(2.5)(&json!(3), &ctx).unwrap_err(), "Must be ≤ 2.5");
        assert!(min(18.0)(&json!(18), &ctx).is_ok());
        assert!(max(2.5)(&json!(2.5), &ctx).is_ok());
    }

    #[test]
    fn test_out_of_domain_values_pass() {
        let ctx = Context::new();
        assert!(min_length(5)(&json!(1), &ctx).is_ok());
        assert!(min(5.0)(&json!("1"), &ctx).is_ok());
    }
}
