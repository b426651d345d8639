//! # Agora Bind
//!
//! Declarative request binding.
//!
//! A [`RecordSchema`] lists the fields of one request shape: each
//! [`FieldSpec`] names a source, a type and a rule list. The [`Binder`]
//! reads every field from an [`ExtractionContext`](agora_extract::ExtractionContext),
//! runs every rule, converts the survivors and returns either a complete
//! [`Record`] or a [`BindError`]. A partial record is never returned.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use agora_bind::{Binder, FieldSpec, RecordSchema};
//! use agora_extract::{ExtractionContext, Source};
//! use agora_validate::RuleRegistry;
//!
//! let registry = RuleRegistry::builder()
//!     .register_pattern("password", r"[A-Za-z0-9_]{8,}")?
//!     .build()?;
//! let binder = Binder::new(Arc::new(registry));
//!
//! let schema = binder.schema(
//!     RecordSchema::builder("Customer")
//!         .field(FieldSpec::string("email", Source::Body).rules("required,email"))
//!         .field(FieldSpec::string("password", Source::Body).rules("required,password")),
//! )?;
//!
//! let mut ctx = ExtractionContext::builder()
//!     .header("content-type", "application/json")
//!     .body(r#"{"email": "a@b.com", "password": "ab-cdefg"}"#)
//!     .build();
//!
//! let err = binder.bind(&mut ctx, &schema).unwrap_err();
//! let violations = err.validation().unwrap().violations();
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].field, "password");
//! assert_eq!(violations[0].rule, "password");
//! # Ok::<(), agora_validate::SchemaError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/agora-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod error;
mod field;
mod record;
mod schema;

pub use binder::{collect, BindResult, Binder};
pub use error::{BindError, ValidationError, Violation};
pub use field::{FieldSpec, ValueType};
pub use record::{Record, Value};
pub use schema::{RecordSchema, RecordSchemaBuilder, SchemaField};

pub use agora_validate::{RawValues, RuleRegistry, RuleRegistryBuilder, SchemaError};
