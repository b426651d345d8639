//! The binder.
//!
//! Binding runs in three passes over a schema: collect every raw value,
//! run every rule, then convert. Nothing short-circuits, so a rejection
//! lists every problem with the request at once.

use std::sync::Arc;

use agora_extract::{ExtractionContext, RawValue, ValueKind};
use agora_validate::builtin::TYPE;
use agora_validate::{failure_message, RawValues, RuleRegistry, SchemaError};
use tracing::debug;

use crate::schema::{RecordSchemaBuilder, SchemaField};
use crate::{BindError, FieldSpec, RecordSchema, Record, ValidationError, Value, ValueType, Violation};

/// The outcome of binding one request.
pub type BindResult = Result<Record, BindError>;

/// Extracts, validates and converts request fields against a schema.
///
/// The binder holds only the frozen rule registry and can be shared across
/// requests freely.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use agora_bind::{Binder, FieldSpec, RecordSchema};
/// use agora_extract::{ExtractionContext, Source};
/// use agora_validate::RuleRegistry;
/// use http::Uri;
///
/// let binder = Binder::new(Arc::new(RuleRegistry::with_builtins()?));
/// let schema = binder.schema(
///     RecordSchema::builder("Lookup").field(FieldSpec::string("role", Source::Query).rules("oneof=Basic Admin")),
/// )?;
///
/// let mut ctx = ExtractionContext::builder().uri(Uri::from_static("/?role=Admin")).build();
/// let record = binder.bind(&mut ctx, &schema).unwrap();
/// assert_eq!(record.str("role"), Some("Admin"));
///
/// let mut ctx = ExtractionContext::builder().uri(Uri::from_static("/?role=admin")).build();
/// let err = binder.bind(&mut ctx, &schema).unwrap_err();
/// assert!(err.validation().unwrap().has("role", "oneof"));
/// # Ok::<(), agora_validate::SchemaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Binder {
    registry: Arc<RuleRegistry>,
}

impl Binder {
    /// Creates a binder over a frozen registry.
    #[must_use]
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Builds a schema against this binder's registry.
    ///
    /// # Errors
    ///
    /// See [`RecordSchemaBuilder::build`].
    pub fn schema(&self, builder: RecordSchemaBuilder) -> Result<RecordSchema, SchemaError> {
        builder.build(&self.registry)
    }

    /// Binds a request.
    ///
    /// When the schema reads the body, a JSON or URL-encoded body is decoded
    /// once, before any field is looked up. Multipart bodies must already be
    /// prepared; [`bind_request`](Self::bind_request) does that.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Malformed`] if the body cannot be decoded and
    /// [`BindError::Validation`] if any field fails.
    pub fn bind(&self, ctx: &mut ExtractionContext, schema: &RecordSchema) -> BindResult {
        if schema.reads_body() {
            if let Err(err) = ctx.decode_body() {
                debug!(schema = schema.name(), error = %err, "request body rejected");
                return Err(BindError::Malformed(err));
            }
        }

        let raw = collect(ctx, schema);
        let kinds: Vec<ValueKind> = schema
            .fields()
            .iter()
            .map(SchemaField::spec)
            .map(|spec| ctx.kind(spec.source(), spec.name()))
            .collect();
        self.check(&raw, &kinds, schema)
    }

    /// Decodes the body, then binds.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Malformed`] if the body cannot be decoded and
    /// [`BindError::Validation`] if any field fails.
    pub async fn bind_request(&self, ctx: &mut ExtractionContext, schema: &RecordSchema) -> BindResult {
        if schema.reads_body() {
            if let Err(err) = ctx.prepare_body().await {
                debug!(schema = schema.name(), error = %err, "request body rejected");
                return Err(BindError::Malformed(err));
            }
        }
        self.bind(ctx, schema)
    }

    /// Validates and converts values that were already collected. Every
    /// value is treated as untyped text.
    pub fn bind_values(&self, raw: &RawValues, schema: &RecordSchema) -> BindResult {
        self.check(raw, &[], schema)
    }

    // `kinds` is indexed like `schema.fields()`; missing entries are plain.
    fn check(&self, raw: &RawValues, kinds: &[ValueKind], schema: &RecordSchema) -> BindResult {
        let mut violations = Vec::new();
        let mut record = Record::default();

        for (index, field) in schema.fields().iter().enumerate() {
            let spec = field.spec();
            let kind = kinds.get(index).copied().unwrap_or_default();
            let value = raw.get(spec.name());
            let before = violations.len();

            violations.extend(failed_rules(field, value, raw));
            if violations.len() > before {
                continue;
            }

            match convert(spec, value, kind) {
                Some(converted) => record.insert(spec.name(), converted),
                None => violations.push(Violation {
                    field: spec.name().to_string(),
                    rule: TYPE.to_string(),
                    message: type_message(spec),
                }),
            }
        }

        debug!(
            schema = schema.name(),
            fields = schema.len(),
            failures = violations.len(),
            "record bound"
        );

        if violations.is_empty() {
            Ok(record)
        } else {
            Err(ValidationError::new(violations).into())
        }
    }
}

/// Reads every field of `schema` from its declared source.
#[must_use]
pub fn collect(ctx: &ExtractionContext, schema: &RecordSchema) -> RawValues {
    schema
        .fields()
        .iter()
        .map(SchemaField::spec)
        .map(|spec| (spec.name(), ctx.extract(spec.source(), spec.name(), spec.default())))
        .collect()
}

fn failed_rules<'a>(
    field: &'a SchemaField,
    value: &'a RawValue,
    raw: &'a RawValues,
) -> impl Iterator<Item = Violation> + 'a {
    let name = field.spec().name();
    field
        .rules()
        .iter()
        .filter(move |rule| !rule.check(value, raw))
        .map(move |rule| Violation {
            field: name.to_string(),
            rule: rule.name().to_string(),
            message: rule.message(name),
        })
}

fn convert(spec: &FieldSpec, value: &RawValue, kind: ValueKind) -> Option<Value> {
    match (spec.value_type(), value) {
        (ValueType::Str, RawValue::Absent) => Some(Value::Str(String::new())),
        (ValueType::Int, RawValue::Absent) => Some(Value::Int(0)),
        (ValueType::Str, RawValue::Present(text)) => {
            kind.is_textual().then(|| Value::Str(text.clone()))
        }
        (ValueType::Int, RawValue::Present(text)) if kind.is_numeric() => {
            text.parse().ok().map(Value::Int)
        }
        (ValueType::Int, RawValue::Present(_)) => None,
    }
}

fn type_message(spec: &FieldSpec) -> String {
    let expected = match spec.value_type() {
        ValueType::Str => "a string",
        ValueType::Int => "an integer",
    };
    format!("{}: expected {expected}", failure_message(spec.name(), TYPE))
}
