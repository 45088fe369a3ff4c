//! # Field Contracts
//!
//! A [`FieldContract`] is one schema node: its kind, whether it is
//! required, an optional default, an ordered validator chain, an optional
//! context rule, and the read-only / write-only mode flags.
//!
//! ## Evaluation Order
//!
//! [`FieldContract::serialize`] evaluates a value in a fixed precedence:
//!
//! 1. **Mode exclusion.** Read-only fields are skipped in `input` mode,
//!    write-only fields in `output` mode.
//! 2. **Context exclusion.** A context rule that returns `false` skips the
//!    field.
//! 3. **Absence.** A falsy value (missing, `null`, `false`, `0`, `""`)
//!    resolves to the default when one is configured. Otherwise a required
//!    field reports `"Field is required"` unless the mode is `output`, and
//!    the field is skipped.
//! 4. **Type check.** A value the kind rejects reports `"Invalid <Kind>"`.
//! 5. **Validators.** Every validator runs, in declared order, with no
//!    short-circuit. Each failure reports at the same path, so only the last
//!    failure message survives.
//! 6. **Result.** A value that passed the type check and every validator
//!    is included. A value with any failure is left out, like a type
//!    mismatch.
//!
//! Composite kinds stop after step 3 and hand the value to the nested
//! serializer or child contract (see [`crate::composite`]).
//!
//! A skip is not an error: the field is omitted from the output and nothing
//! is reported.
//!
//! ## Building
//!
//! Builders consume and return the contract. Once a contract is moved into
//! a [`Schema`](crate::Schema) it can no longer change. Reusing a contract
//! in several schemas takes an explicit `clone()`, and the clones evolve
//! independently from then on.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use sculpt_core::{is_falsy, Context, ErrorSink, Mode};

use crate::composite;
use crate::kind::{ArrayChild, FieldKind};
use crate::serializer::{Serializer, Traversal};
use crate::validators::{self, Constraints};

/// Message reported for a required field that is absent.
pub const REQUIRED_MESSAGE: &str = "Field is required";

/// Message reported for a validator failure that carries no text.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Validator: `Ok(())` passes, `Err(message)` fails. An empty message is
/// reported as [`VALIDATION_FAILED_MESSAGE`].
pub type ValidatorFn = Arc<dyn Fn(&Value, &Context) -> Result<(), String> + Send + Sync>;

/// Predicate deciding from the caller context whether a field takes part.
pub type ContextRule = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// Default computed from the current (falsy) value, the enclosing item,
/// and the caller context.
pub type ComputedDefaultFn =
    Arc<dyn Fn(Option<&Value>, Option<&Value>, &Context) -> Value + Send + Sync>;

/// A field's fallback for absent values.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value, cloned on use.
    Static(Value),
    /// Evaluated on use with the current value, the enclosing item and
    /// the caller context.
    Computed(ComputedDefaultFn),
}

impl DefaultValue {
    fn resolve(&self, current: Option<&Value>, root: Option<&Value>, context: &Context) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Computed(compute) => compute(current, root, context),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Result of serializing one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Include this value in the output.
    Value(Value),
    /// Omit the field; no error is implied.
    Skip,
}

impl Outcome {
    /// Returns true for [`Outcome::Skip`].
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// The produced value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Skip => None,
        }
    }
}

/// What the shared gate (steps 1–3) decided.
enum Gate<'v> {
    /// The value is present and continues to the kind-specific steps.
    Present(&'v Value),
    /// The gate settled the outcome itself.
    Settled(Outcome),
}

/// One schema node.
#[derive(Clone)]
pub struct FieldContract {
    kind: FieldKind,
    required: bool,
    default: Option<DefaultValue>,
    validators: Vec<ValidatorFn>,
    context_rule: Option<ContextRule>,
    read_only: bool,
    write_only: bool,
    constraints: Constraints,
}

impl FieldContract {
    /// A required contract of the given kind with no default, validators,
    /// context rule, or mode flags.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: true,
            default: None,
            validators: Vec::new(),
            context_rule: None,
            read_only: false,
            write_only: false,
            constraints: Constraints::default(),
        }
    }

    /// String field.
    pub fn string() -> Self {
        Self::new(FieldKind::Char)
    }

    /// Number field.
    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// Integer field; stricter than [`FieldContract::number`].
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    /// Boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// RFC 3339 date-time field.
    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    /// Date field. Accepts exactly what [`FieldContract::datetime`] accepts.
    pub fn date() -> Self {
        Self::new(FieldKind::Date)
    }

    /// Email field. No format check; attach a validator for one.
    pub fn email() -> Self {
        Self::new(FieldKind::Email)
    }

    /// URL field. No format check; attach a validator for one.
    pub fn url() -> Self {
        Self::new(FieldKind::Url)
    }

    /// Opaque JSON field accepting any object or array.
    pub fn json() -> Self {
        Self::new(FieldKind::Json)
    }

    /// Nested object traversed by `serializer`, which may be shared
    /// between several fields.
    ///
    /// Composite kinds never run the validator chain: validators and the
    /// string and numeric extras attached to an object or array field are
    /// ignored. Validate the nested fields instead.
    pub fn object(serializer: impl Into<Arc<Serializer>>) -> Self {
        Self::new(FieldKind::Object(serializer.into()))
    }

    /// Array whose elements are checked by a child contract (scalar
    /// elements) or traversed by a serializer (object elements).
    ///
    /// Like [`FieldContract::object`], the array field itself runs no
    /// validators. Attach them to the child contract.
    pub fn array(child: impl Into<ArrayChild>) -> Self {
        Self::new(FieldKind::Array(child.into()))
    }

    // ── builders ─────────────────────────────────────────────────────

    /// Absence is no longer an error.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Fixed fallback for absent values.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    /// Computed fallback for absent values. `compute` receives the current
    /// value, the enclosing item, and the caller context.
    pub fn default_with<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<&Value>, Option<&Value>, &Context) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(compute)));
        self
    }

    /// Append a validator to the chain.
    ///
    /// Only leaf kinds run the chain. On [`FieldContract::object`] and
    /// [`FieldContract::array`] the validator is kept but never called.
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value, &Context) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Include the field only when `rule` accepts the caller context.
    /// Replaces any earlier rule.
    pub fn only_if<F>(mut self, rule: F) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.context_rule = Some(Arc::new(rule));
        self
    }

    /// Skip the field in `input` mode.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Skip the field in `output` mode.
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Require at least `n` characters.
    pub fn min_length(mut self, n: usize) -> Self {
        self.constraints.min_length = Some(n);
        self.validate(validators::min_length(n))
    }

    /// Allow at most `n` characters.
    pub fn max_length(mut self, n: usize) -> Self {
        self.constraints.max_length = Some(n);
        self.validate(validators::max_length(n))
    }

    /// Restrict the value to one of `options`.
    pub fn enum_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.constraints.options = Some(options.clone());
        self.validate(validators::enum_options(options))
    }

    /// Require a value of at least `bound`.
    pub fn min(mut self, bound: f64) -> Self {
        self.constraints.min = Some(bound);
        self.validate(validators::min(bound))
    }

    /// Require a value of at most `bound`.
    pub fn max(mut self, bound: f64) -> Self {
        self.constraints.max = Some(bound);
        self.validate(validators::max(bound))
    }

    // ── accessors ────────────────────────────────────────────────────

    /// The field's kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether absence is reported as an error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the field is skipped in `input` mode.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether the field is skipped in `output` mode.
    pub fn is_write_only(&self) -> bool {
        self.write_only
    }

    /// Configured default, if any.
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Whether a context rule is attached.
    pub fn has_context_rule(&self) -> bool {
        self.context_rule.is_some()
    }

    /// Number of validators in the chain.
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Kind-specific extras recorded by the builders.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Whether mode filtering removes this field.
    pub fn excluded_in(&self, mode: Mode) -> bool {
        match mode {
            Mode::Input => self.read_only,
            Mode::Output => self.write_only,
            Mode::Both => false,
        }
    }

    /// Deepest serializer nesting reachable through this field.
    pub(crate) fn nested_depth(&self) -> usize {
        match &self.kind {
            FieldKind::Object(nested) | FieldKind::Array(ArrayChild::Nested(nested)) => {
                nested.depth()
            }
            FieldKind::Array(ArrayChild::Field(child)) => child.nested_depth(),
            _ => 0,
        }
    }

    // ── evaluation ───────────────────────────────────────────────────

    /// Evaluate `value` against this contract.
    ///
    /// `root` is the item that holds the field, handed to computed
    /// defaults. Failures are reported into `sink` at `path`; the return
    /// value says whether the field appears in the output.
    pub fn serialize(
        &self,
        value: Option<&Value>,
        root: Option<&Value>,
        path: &str,
        traversal: &Traversal<'_>,
        sink: &mut dyn ErrorSink,
    ) -> Outcome {
        let value = match self.gate(value, root, path, traversal, sink) {
            Gate::Present(value) => value,
            Gate::Settled(outcome) => return outcome,
        };

        match &self.kind {
            FieldKind::Object(nested) => {
                composite::serialize_object(nested, value, path, traversal, sink)
            }
            FieldKind::Array(child) => {
                composite::serialize_array(child, value, root, path, traversal, sink)
            }
            _ => self.check(value, path, traversal.context(), sink),
        }
    }

    /// Steps 1–3, shared by every kind.
    fn gate<'v>(
        &self,
        value: Option<&'v Value>,
        root: Option<&Value>,
        path: &str,
        traversal: &Traversal<'_>,
        sink: &mut dyn ErrorSink,
    ) -> Gate<'v> {
        let mode = traversal.mode();
        if self.excluded_in(mode) {
            tracing::trace!(path, %mode, "field skipped by mode");
            return Gate::Settled(Outcome::Skip);
        }

        let context = traversal.context();
        if let Some(rule) = &self.context_rule {
            if !rule(context) {
                tracing::trace!(path, "field skipped by context rule");
                return Gate::Settled(Outcome::Skip);
            }
        }

        match value {
            Some(present) if !is_falsy(Some(present)) => Gate::Present(present),
            absent => {
                if let Some(default) = &self.default {
                    return Gate::Settled(Outcome::Value(default.resolve(absent, root, context)));
                }
                if self.required && mode != Mode::Output {
                    sink.report(path, REQUIRED_MESSAGE);
                }
                Gate::Settled(Outcome::Skip)
            }
        }
    }

    /// Steps 4–6, for leaf kinds.
    fn check(
        &self,
        value: &Value,
        path: &str,
        context: &Context,
        sink: &mut dyn ErrorSink,
    ) -> Outcome {
        if !self.kind.accepts(value) {
            sink.report(path, &format!("Invalid {}", self.kind.name()));
            return Outcome::Skip;
        }

        let mut failed = false;
        for validator in &self.validators {
            if let Err(message) = validator(value, context) {
                let message = if message.is_empty() {
                    VALIDATION_FAILED_MESSAGE
                } else {
                    message.as_str()
                };
                sink.report(path, message);
                failed = true;
            }
        }

        if failed {
            Outcome::Skip
        } else {
            Outcome::Value(value.clone())
        }
    }
}

impl fmt::Debug for FieldContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldContract")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("validators", &self.validators.len())
            .field("context_rule", &self.context_rule.is_some())
            .field("read_only", &self.read_only)
            .field("write_only", &self.write_only)
            .field("constraints", &self.constraints)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sculpt_core::ErrorMap;
    use serde_json::json;

    fn run(field: &FieldContract, value: Option<Value>, mode: Mode) -> (Outcome, ErrorMap) {
        run_with(field, value, None, mode, &Context::new())
    }

    fn run_with(
        field: &FieldContract,
        value: Option<Value>,
        root: Option<Value>,
        mode: Mode,
        context: &Context,
    ) -> (Outcome, ErrorMap) {
        let traversal = Traversal::new(mode, context);
        let mut errors = ErrorMap::new();
        let outcome = field.serialize(value.as_ref(), root.as_ref(), "f", &traversal, &mut errors);
        (outcome, errors)
    }

    #[test]
    fn test_present_value_passes_through() {
        let (outcome, errors) = run(&FieldContract::string(), Some(json!("Ada")), Mode::Both);
        assert_eq!(outcome, Outcome::Value(json!("Ada")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_required_absent_reports() {
        let (outcome, errors) = run(&FieldContract::string(), None, Mode::Input);
        assert!(outcome.is_skip());
        assert_eq!(errors.get("f"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_required_absent_tolerated_in_output_mode() {
        let (outcome, errors) = run(&FieldContract::string(), None, Mode::Output);
        assert!(outcome.is_skip());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_optional_absent_is_silent() {
        let (outcome, errors) = run(&FieldContract::string().optional(), None, Mode::Input);
        assert!(outcome.is_skip());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_falsy_values_count_as_absent() {
        let field = FieldContract::integer();
        for falsy in [json!(0), json!(false), json!(""), json!(null)] {
            let (outcome, errors) = run(&field, Some(falsy), Mode::Input);
            assert!(outcome.is_skip());
            assert_eq!(errors.get("f"), Some(REQUIRED_MESSAGE));
        }
    }

    #[test]
    fn test_static_default_replaces_falsy() {
        let field = FieldContract::integer().default(42);
        let (outcome, errors) = run(&field, Some(json!(0)), Mode::Input);
        assert_eq!(outcome, Outcome::Value(json!(42)));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_default_skips_type_check_and_validators() {
        let field = FieldContract::integer().min(100.0).default("not a number");
        let (outcome, errors) = run(&field, None, Mode::Both);
        assert_eq!(outcome, Outcome::Value(json!("not a number")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_computed_default_sees_value_root_and_context() {
        let field = FieldContract::integer().default_with(|current, root, ctx| {
            let age = root.and_then(|r| r.get("age")).and_then(Value::as_i64).unwrap_or(0);
            let bonus = ctx.get("bonus").and_then(Value::as_i64).unwrap_or(0);
            json!({"current": current.cloned(), "value": age * 2 + bonus})
        });
        let ctx = Context::new().with("bonus", 1);
        let (outcome, _) = run_with(
            &field,
            Some(json!(false)),
            Some(json!({"age": 20})),
            Mode::Both,
            &ctx,
        );
        assert_eq!(
            outcome,
            Outcome::Value(json!({"current": false, "value": 41}))
        );
    }

    #[test]
    fn test_type_mismatch_reports_kind_name() {
        let (outcome, errors) = run(&FieldContract::integer(), Some(json!(1.5)), Mode::Both);
        assert!(outcome.is_skip());
        assert_eq!(errors.get("f"), Some("Invalid IntegerField"));

        let (_, errors) = run(&FieldContract::email(), Some(json!(7)), Mode::Both);
        assert_eq!(errors.get("f"), Some("Invalid EmailField"));
    }

    #[test]
    fn test_mode_exclusion_precedes_everything() {
        let read_only = FieldContract::string().read_only();
        let (outcome, errors) = run(&read_only, Some(json!(5)), Mode::Input);
        assert!(outcome.is_skip());
        assert!(errors.is_empty());

        let write_only = FieldContract::string().write_only();
        let (outcome, errors) = run(&write_only, None, Mode::Output);
        assert!(outcome.is_skip());
        assert!(errors.is_empty());

        let (outcome, _) = run(&read_only, Some(json!("x")), Mode::Output);
        assert_eq!(outcome, Outcome::Value(json!("x")));
    }

    #[test]
    fn test_context_rule_excludes_before_required_check() {
        let field = FieldContract::string().only_if(|ctx| ctx.flag("isAdmin"));
        let (outcome, errors) = run(&field, None, Mode::Input);
        assert!(outcome.is_skip());
        assert!(errors.is_empty());

        let ctx = Context::new().with("isAdmin", true);
        let (_, errors) = run_with(&field, None, None, Mode::Input, &ctx);
        assert_eq!(errors.get("f"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_validators_do_not_short_circuit_last_failure_wins() {
        let field = FieldContract::string()
            .validate(|_, _| Err("first".to_string()))
            .validate(|_, _| Ok(()))
            .validate(|_, _| Err("last".to_string()));
        let (outcome, errors) = run(&field, Some(json!("v")), Mode::Both);
        assert!(outcome.is_skip());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("f"), Some("last"));
    }

    #[test]
    fn test_every_validator_runs_after_a_failure() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let (a, b) = (Arc::clone(&calls), Arc::clone(&calls));
        let field = FieldContract::string()
            .validate(move |_, _| {
                a.fetch_add(1, Ordering::SeqCst);
                Err("first".to_string())
            })
            .validate(move |_, _| {
                b.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        let (outcome, errors) = run(&field, Some(json!("v")), Mode::Both);
        assert!(outcome.is_skip());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(errors.get("f"), Some("first"));
    }

    #[test]
    fn test_empty_failure_message_becomes_validation_failed() {
        let field = FieldContract::string().validate(|_, _| Err(String::new()));
        let (_, errors) = run(&field, Some(json!("v")), Mode::Both);
        assert_eq!(errors.get("f"), Some(VALIDATION_FAILED_MESSAGE));
    }

    #[test]
    fn test_validators_receive_context() {
        let field = FieldContract::string().validate(|value, ctx| {
            if ctx.get("reserved") == Some(value) {
                Err("Reserved name".to_string())
            } else {
                Ok(())
            }
        });
        let ctx = Context::new().with("reserved", "root");
        let (_, errors) = run_with(&field, Some(json!("root")), None, Mode::Both, &ctx);
        assert_eq!(errors.get("f"), Some("Reserved name"));
    }

    #[test]
    fn test_builders_record_constraints() {
        let field = FieldContract::string()
            .min_length(2)
            .max_length(8)
            .enum_options(["ab", "abc"]);
        assert_eq!(field.constraints().min_length, Some(2));
        assert_eq!(field.constraints().max_length, Some(8));
        assert_eq!(
            field.constraints().options.as_deref(),
            Some(&["ab".to_string(), "abc".to_string()][..])
        );
        assert_eq!(field.validator_count(), 3);
    }

    #[test]
    fn test_clones_evolve_independently() {
        let base = FieldContract::string();
        let strict = base.clone().min_length(3);
        assert_eq!(base.validator_count(), 0);
        assert_eq!(strict.validator_count(), 1);
    }
}
