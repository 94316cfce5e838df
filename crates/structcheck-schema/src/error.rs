use std::sync::Arc;

use structcheck_value::{path, PathSegment, Value};

use crate::failure::{Failure, Failures};

/// Errors raised while building schemas or using the registry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// The discriminator mapping cannot select branches unambiguously.
    #[error("invalid discriminator on `{field}`: {reason}")]
    InvalidDiscriminator { field: String, reason: String },

    /// A shape utility was applied to a schema without a shape.
    #[error("expected an `object` or `type` schema with a declared shape, but received a `{0}` schema")]
    NotAnObjectSchema(String),

    /// The value failed validation against a registered schema.
    #[error("validation failed for schema `{name}`: {source}")]
    ValidationFailed {
        name: String,
        #[source]
        source: StructError,
    },

    /// The schema name is empty or missing.
    #[error("invalid schema name: {0}")]
    InvalidName(String),

    /// No schema registered under the given name.
    #[error("no schema registered under `{0}`")]
    NoSchema(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Aggregate validation error returned by the façade operations.
///
/// The message describes the first failure. When the caller overrides it,
/// the original message is kept as [`cause`](StructError::cause).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct StructError {
    message: String,
    cause: Option<String>,
    failures: Failures,
}

impl StructError {
    pub(crate) fn new(failures: Failures, explanation: Option<&str>) -> Self {
        let first = failures.first();
        let described = if first.path.is_empty() {
            first.message.clone()
        } else {
            format!("At path: {} -- {}", path::join(&first.path), first.message)
        };

        match explanation {
            Some(explanation) => Self {
                message: explanation.to_string(),
                cause: Some(described),
                failures,
            },
            None => Self {
                message: described,
                cause: None,
                failures,
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The first failure's own message, present when the message was overridden.
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// The first failure.
    pub fn failure(&self) -> &Failure {
        self.failures.first()
    }

    /// Every failure in discovery order.
    pub fn failures(&self) -> &[Failure] {
        self.failures.as_slice()
    }

    pub fn into_failures(self) -> Failures {
        self.failures
    }

    pub fn value(&self) -> &Value {
        &self.failure().value
    }

    pub fn kind(&self) -> &str {
        &self.failure().kind
    }

    pub fn refinement(&self) -> Option<&str> {
        self.failure().refinement.as_deref()
    }

    pub fn key(&self) -> Option<&PathSegment> {
        self.failure().key.as_ref()
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.failure().path
    }

    pub fn branch(&self) -> &[Arc<Value>] {
        &self.failure().branch
    }
}
