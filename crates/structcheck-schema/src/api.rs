//! The façade: `validate`, `is`, `assert` and `create`.

use structcheck_value::{path, Value};
use tracing::{debug, trace};

use crate::check::check;
use crate::config::ValidateOptions;
use crate::error::StructError;
use crate::schema::Schema;

/// Check `value`, returning the (possibly coerced) output or the aggregate error.
pub fn validate(
    value: Value,
    schema: &Schema,
    options: ValidateOptions,
) -> Result<Value, StructError> {
    validate_with(value, schema, options, None)
}

/// True when `value` satisfies `schema` without coercion.
pub fn is(value: &Value, schema: &Schema) -> bool {
    check(value.clone(), schema, false).is_ok()
}

/// Fail with the first failure, or with `message` when given.
///
/// An overriding `message` keeps the failure's own message as the cause.
pub fn assert(value: &Value, schema: &Schema, message: Option<&str>) -> Result<(), StructError> {
    validate_with(value.clone(), schema, ValidateOptions::default(), message).map(|_| ())
}

/// Coerce, then assert; returns the coerced value.
pub fn create(value: Value, schema: &Schema, message: Option<&str>) -> Result<Value, StructError> {
    validate_with(value, schema, ValidateOptions::coercing(), message)
}

fn validate_with(
    value: Value,
    schema: &Schema,
    options: ValidateOptions,
    message: Option<&str>,
) -> Result<Value, StructError> {
    trace!(
        kind = schema.type_name(),
        name = schema.name(),
        coerce = options.coerce,
        "validating value"
    );
    check(value, schema, options.coerce).map_err(|failures| {
        let err = StructError::new(failures, message);
        debug!(
            kind = err.kind(),
            path = %path::join(err.path()),
            failures = err.failures().len(),
            "validation failed"
        );
        err
    })
}

impl Schema {
    /// See [`validate`](crate::api::validate).
    pub fn validate(&self, value: Value, options: ValidateOptions) -> Result<Value, StructError> {
        validate(value, self, options)
    }

    pub fn is(&self, value: &Value) -> bool {
        is(value, self)
    }

    pub fn assert(&self, value: &Value, message: Option<&str>) -> Result<(), StructError> {
        assert(value, self, message)
    }

    pub fn create(&self, value: Value, message: Option<&str>) -> Result<Value, StructError> {
        create(value, self, message)
    }
}
