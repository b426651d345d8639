//! Rule registry.
//!
//! Rules are registered on a [`RuleRegistryBuilder`] at startup and frozen
//! into a [`RuleRegistry`], which is only ever read afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use agora_extract::RawValue;
use regex::Regex;
use tracing::debug;

use crate::builtin::{self, TYPE};
use crate::{RawValues, RuleSpec, SchemaError};

/// Everything a predicate sees when it runs.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// The raw value of the field under validation.
    pub value: &'a RawValue,
    /// The parameter declared with the rule, if any.
    pub param: Option<&'a str>,
    /// Raw values of every field in the record.
    pub fields: &'a RawValues,
}

/// A shared rule predicate.
pub type Predicate = Arc<dyn Fn(&RuleInput<'_>) -> bool + Send + Sync>;

type Detail = fn(&str) -> String;

/// What kind of parameter a rule takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A parameter may be given and is passed through.
    Optional,
    /// A parameter must be given.
    Required,
    /// A parameter must be given and must name a field of the same record.
    FieldRef,
}

/// A named predicate.
#[derive(Clone)]
pub struct Rule {
    name: String,
    param: ParamKind,
    predicate: Predicate,
    detail: Option<Detail>,
}

impl Rule {
    /// Creates a rule.
    pub fn new<F>(name: impl Into<String>, param: ParamKind, predicate: F) -> Self
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            param,
            predicate: Arc::new(predicate),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of parameter the rule takes.
    #[must_use]
    pub fn param_kind(&self) -> ParamKind {
        self.param
    }

    /// Runs the predicate.
    #[must_use]
    pub fn evaluate(&self, input: &RuleInput<'_>) -> bool {
        (self.predicate)(input)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

/// A rule resolved against a registry, ready to run for one field.
#[derive(Debug, Clone)]
pub struct BoundRule {
    rule: Rule,
    param: Option<String>,
}

impl BoundRule {
    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.rule.name()
    }

    /// Returns the declared parameter.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Checks `value` against the rule.
    #[must_use]
    pub fn check(&self, value: &RawValue, fields: &RawValues) -> bool {
        self.rule.evaluate(&RuleInput {
            value,
            param: self.param(),
            fields,
        })
    }

    /// Formats the failure message for `field`.
    #[must_use]
    pub fn message(&self, field: &str) -> String {
        let base = failure_message(field, self.name());
        match (self.rule.detail, self.param()) {
            (Some(detail), param) => format!("{base}: {}", detail(param.unwrap_or_default())),
            (None, _) => base,
        }
    }
}

/// Formats the standard failure message for a field and rule.
///
/// # Example
///
/// ```rust
/// assert_eq!(
///     agora_validate::failure_message("email", "required"),
///     "field validation for 'email' failed on the 'required' rule",
/// );
/// ```
#[must_use]
pub fn failure_message(field: &str, rule: &str) -> String {
    format!("field validation for '{field}' failed on the '{rule}' rule")
}

/// Collects custom rules before the registry is frozen.
///
/// # Example
///
/// ```rust
/// use agora_validate::RuleRegistry;
///
/// let registry = RuleRegistry::builder()
///     .register_pattern("password", r"[A-Za-z0-9_]{8,}")
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert!(registry.contains("password"));
/// assert!(registry.contains("required"));
/// ```
#[derive(Default)]
pub struct RuleRegistryBuilder {
    custom: Vec<Rule>,
}

impl RuleRegistryBuilder {
    /// Creates a builder. Built-in rules are added by [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom predicate under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateRule`] if the name is already taken,
    /// including by a built-in, and [`SchemaError::ReservedRule`] for `type`.
    pub fn register<F>(self, name: impl Into<String>, predicate: F) -> Result<Self, SchemaError>
    where
        F: Fn(&RuleInput<'_>) -> bool + Send + Sync + 'static,
    {
        self.push(Rule::new(name, ParamKind::Optional, predicate))
    }

    /// Registers a rule that passes when the value contains a match for
    /// `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] if the pattern does not
    /// compile, or any error [`register`](Self::register) returns.
    pub fn register_pattern(
        self,
        name: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            name: name.clone(),
            message: e.to_string(),
        })?;
        self.register(name, move |input: &RuleInput<'_>| {
            regex.is_match(input.value.as_str())
        })
    }

    fn push(mut self, rule: Rule) -> Result<Self, SchemaError> {
        let name = rule.name();
        if name.is_empty() {
            return Err(SchemaError::InvalidRuleSyntax {
                input: String::new(),
                reason: "empty rule name".to_string(),
            });
        }
        if name == TYPE {
            return Err(SchemaError::ReservedRule {
                name: name.to_string(),
            });
        }
        if builtin::BUILTIN_RULES.contains(&name) || self.custom.iter().any(|r| r.name() == name) {
            return Err(SchemaError::DuplicateRule {
                name: name.to_string(),
            });
        }
        self.custom.push(rule);
        Ok(self)
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] if a built-in pattern fails
    /// to compile.
    pub fn build(self) -> Result<RuleRegistry, SchemaError> {
        let mut rules = HashMap::new();
        for rule in builtin::all()?.into_iter().chain(self.custom) {
            rules.insert(rule.name().to_string(), rule);
        }
        debug!(rule_count = rules.len(), "rule registry built");
        Ok(RuleRegistry { rules })
    }
}

impl fmt::Debug for RuleRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistryBuilder")
            .field("custom", &self.custom.iter().map(Rule::name).collect::<Vec<_>>())
            .finish()
    }
}

/// An immutable map of rule name to predicate.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
}

impl RuleRegistry {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::new()
    }

    /// Returns a registry holding only the built-in rules.
    ///
    /// # Errors
    ///
    /// See [`RuleRegistryBuilder::build`].
    pub fn with_builtins() -> Result<Self, SchemaError> {
        RuleRegistryBuilder::new().build()
    }

    /// Returns the rule registered as `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves the rules declared on `field`.
    ///
    /// `declared` lists every field of the record, for cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownRule`], [`SchemaError::MissingRuleParam`]
    /// or [`SchemaError::UnknownFieldReference`].
    pub fn bind(
        &self,
        field: &str,
        specs: &[RuleSpec],
        declared: &[&str],
    ) -> Result<Vec<BoundRule>, SchemaError> {
        specs
            .iter()
            .map(|spec| {
                let rule = self.get(spec.name()).ok_or_else(|| SchemaError::UnknownRule {
                    field: field.to_string(),
                    rule: spec.name().to_string(),
                })?;

                match (rule.param_kind(), spec.param()) {
                    (ParamKind::Required | ParamKind::FieldRef, None) => {
                        return Err(SchemaError::MissingRuleParam {
                            field: field.to_string(),
                            rule: spec.name().to_string(),
                        });
                    }
                    (ParamKind::FieldRef, Some(reference)) if !declared.contains(&reference) => {
                        return Err(SchemaError::UnknownFieldReference {
                            field: field.to_string(),
                            rule: spec.name().to_string(),
                            reference: reference.to_string(),
                        });
                    }
                    _ => {}
                }

                Ok(BoundRule {
                    rule: rule.clone(),
                    param: spec.param().map(String::from),
                })
            })
            .collect()
    }
}
