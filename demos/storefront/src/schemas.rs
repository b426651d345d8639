//! Record schemas and the rule registry.

use agora_bind::{Binder, FieldSpec, RecordSchema, RuleRegistry, SchemaError};
use agora_extract::Source;
use agora_router::Router;

/// Eight or more consecutive word characters anywhere in the value.
pub const PASSWORD_PATTERN: &str = r"[A-Za-z0-9_]{8,}";

/// Builds the registry: built-ins plus `password`.
///
/// # Errors
///
/// Returns [`SchemaError`] if the rule set is inconsistent.
pub fn registry() -> Result<RuleRegistry, SchemaError> {
    RuleRegistry::builder()
        .register_pattern("password", PASSWORD_PATTERN)?
        .build()
}

/// Every schema the storefront binds.
#[derive(Debug, Clone)]
pub struct Schemas {
    /// `GET /api/v1/users/{id}`: path id and query flags.
    pub user_lookup: RecordSchema,
    /// `POST /api/v1/users`: form fields.
    pub user_signup: RecordSchema,
    /// `POST /api/v1/user`: JSON body, no rules.
    pub user: RecordSchema,
    /// `POST /api/v1/customers`: JSON body with rules.
    pub customer: RecordSchema,
}

impl Schemas {
    /// Declares and checks all schemas against the binder's registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found.
    pub fn build(binder: &Binder) -> Result<Self, SchemaError> {
        let user_lookup = binder.schema(
            RecordSchema::builder("UserLookup")
                .field(FieldSpec::string("id", Source::Path))
                .field(FieldSpec::string("isAddress", Source::Query))
                .field(FieldSpec::string("isAdmin", Source::Query)),
        )?;

        let user_signup = binder.schema(
            RecordSchema::builder("UserSignup")
                .field(FieldSpec::string("name", Source::Form))
                .field(FieldSpec::string("pincode", Source::Form))
                .field(FieldSpec::string("city", Source::Form))
                .field(FieldSpec::string("isAdmin", Source::Form).default_value("false")),
        )?;

        let user = binder.schema(
            RecordSchema::builder("User")
                .field(FieldSpec::string("id", Source::Body))
                .field(FieldSpec::string("name", Source::Body)),
        )?;

        let customer = binder.schema(
            RecordSchema::builder("Customer")
                .field(FieldSpec::string("email", Source::Body).rules("required,email"))
                .field(FieldSpec::string("password", Source::Body).rules("required,password"))
                .field(FieldSpec::string("role", Source::Body).rules("required,oneof=Basic Admin"))
                .field(FieldSpec::string("street_address", Source::Body))
                .field(FieldSpec::int("street_number", Source::Body).rules("required_with=street_address")),
        )?;

        Ok(Self {
            user_lookup,
            user_signup,
            user,
            customer,
        })
    }

    /// Checks that every path field has a capture on its route.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UndeclaredCapture`] on a mismatch.
    pub fn check_routes(&self, router: &Router) -> Result<(), SchemaError> {
        let bound = [
            (crate::routes::USERS_GET, &self.user_lookup),
            (crate::routes::USERS_CREATE, &self.user_signup),
            (crate::routes::USER_CREATE, &self.user),
            (crate::routes::CUSTOMERS_CREATE, &self.customer),
        ];
        for (route_id, schema) in bound {
            let captures = router.captures_of(route_id).unwrap_or_default();
            schema.check_captures(route_id, &captures)?;
        }
        Ok(())
    }
}
