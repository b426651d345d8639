//! # Agora Validate
//!
//! Named validation rules for the Agora binding layer.
//!
//! A [`RuleRegistry`] maps rule names to predicates. It always holds the
//! built-in rules and any custom rules an application registered through a
//! [`RuleRegistryBuilder`] before the registry was frozen.
//!
//! | Rule | Passes when |
//! |------|-------------|
//! | `required` | the value is present and non-empty |
//! | `email` | the value is `local@domain` with a dotted domain |
//! | `oneof=A B` | the value equals one of the listed words, case-sensitively |
//! | `required_with=other` | the value is non-empty, or `other` is absent or empty |
//!
//! Rules are declared per field with [`RuleSpec`] and resolved against the
//! registry with [`RuleRegistry::bind`], which reports every
//! misconfiguration as a [`SchemaError`] before the first request is served.
//!
//! ## Example
//!
//! ```rust
//! use agora_extract::RawValue;
//! use agora_validate::{RawValues, RuleRegistry, RuleSpec};
//!
//! let registry = RuleRegistry::builder()
//!     .register_pattern("password", r"[A-Za-z0-9_]{8,}")?
//!     .build()?;
//!
//! let rules = registry.bind("password", &RuleSpec::parse_list("required,password")?, &["password"])?;
//! let fields = RawValues::new();
//!
//! assert!(rules.iter().all(|r| r.check(&RawValue::present("abcdefgh"), &fields)));
//! assert!(!rules[1].check(&RawValue::present("ab-cdefg"), &fields));
//! # Ok::<(), agora_validate::SchemaError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/agora-validate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builtin;
mod error;
mod registry;
mod rule_spec;
mod values;

pub use error::SchemaError;
pub use registry::{
    failure_message, BoundRule, ParamKind, Predicate, Rule, RuleInput, RuleRegistry,
    RuleRegistryBuilder,
};
pub use rule_spec::RuleSpec;
pub use values::RawValues;
