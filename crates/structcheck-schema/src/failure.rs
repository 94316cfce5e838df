//! Failure records and the outcome type returned by validator hooks.

use std::sync::Arc;

use serde::Serialize;
use structcheck_value::{PathSegment, Value};

use crate::context::Context;

/// One recorded violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    /// The offending value.
    pub value: Value,
    /// Last path segment, `None` at the root.
    pub key: Option<PathSegment>,
    /// Kind of the schema that reported the failure.
    #[serde(rename = "type")]
    pub kind: String,
    /// Name of the refinement, `None` for structural failures.
    pub refinement: Option<String>,
    pub message: String,
    /// Segments from the root to the offending value.
    pub path: Vec<PathSegment>,
    /// Ancestor values from the root to the offending value.
    pub branch: Vec<Arc<Value>>,
}

impl Failure {
    /// Record a failure at the current position of `ctx`.
    pub fn at(
        ctx: &Context,
        value: &Value,
        kind: &str,
        refinement: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            value: value.clone(),
            key: ctx.key().cloned(),
            kind: kind.to_string(),
            refinement: refinement.map(str::to_string),
            message: message.into(),
            path: ctx.path().to_vec(),
            branch: ctx.branch().to_vec(),
        }
    }

    /// True when the failure came from a named refinement.
    pub fn is_refinement(&self) -> bool {
        self.refinement.is_some()
    }
}

/// A non-empty, ordered sequence of failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Failures(Vec<Failure>);

impl Failures {
    /// Wrap collected failures; `None` when nothing failed.
    pub fn new(failures: Vec<Failure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self(failures))
        }
    }

    /// The first failure in discovery order.
    pub fn first(&self) -> &Failure {
        &self.0[0]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[Failure] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Failure> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Failure> {
        self.0
    }
}

impl IntoIterator for Failures {
    type Item = Failure;
    type IntoIter = std::vec::IntoIter<Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of a validator or refiner hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Valid,
    Invalid(Vec<Issue>),
}

/// One problem reported by a hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// Use the generic "Expected a value of type ..." message.
    Default,
    /// A custom message; location and kind come from the context.
    Message(String),
    /// A fully formed failure, passed through as is.
    Failure(Box<Failure>),
}

impl Outcome {
    /// A single failure with a custom message.
    pub fn fail(message: impl Into<String>) -> Self {
        Outcome::Invalid(vec![Issue::Message(message.into())])
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Outcome::Valid => true,
            Outcome::Invalid(issues) => issues.is_empty(),
        }
    }
}

impl From<bool> for Outcome {
    fn from(valid: bool) -> Self {
        if valid {
            Outcome::Valid
        } else {
            Outcome::Invalid(vec![Issue::Default])
        }
    }
}

impl From<&str> for Outcome {
    fn from(message: &str) -> Self {
        Outcome::fail(message)
    }
}

impl From<String> for Outcome {
    fn from(message: String) -> Self {
        Outcome::fail(message)
    }
}

impl From<Result<(), String>> for Outcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Outcome::Valid,
            Err(message) => Outcome::fail(message),
        }
    }
}

impl From<Vec<Failure>> for Outcome {
    fn from(failures: Vec<Failure>) -> Self {
        if failures.is_empty() {
            Outcome::Valid
        } else {
            Outcome::Invalid(
                failures
                    .into_iter()
                    .map(|failure| Issue::Failure(Box::new(failure)))
                    .collect(),
            )
        }
    }
}

/// Shorthand for a check that either passes or fails with a lazily built message.
pub(crate) fn expect(valid: bool, message: impl FnOnce() -> String) -> Outcome {
    if valid {
        Outcome::Valid
    } else {
        Outcome::fail(message())
    }
}

/// Turn a hook outcome into failure records located at `ctx`.
///
/// Failures produced by a refinement are all tagged with its name, including
/// fully formed ones passed through from nested checks.
pub(crate) fn to_failures(
    outcome: Outcome,
    ctx: &Context,
    kind: &str,
    refinement: Option<&str>,
    value: &Value,
) -> Vec<Failure> {
    let issues = match outcome {
        Outcome::Valid => return Vec::new(),
        Outcome::Invalid(issues) => issues,
    };

    issues
        .into_iter()
        .map(|issue| match issue {
            Issue::Default => {
                let message = default_message(kind, refinement, value);
                Failure::at(ctx, value, kind, refinement, message)
            }
            Issue::Message(message) => Failure::at(ctx, value, kind, refinement, message),
            Issue::Failure(failure) => {
                let mut failure = *failure;
                if let Some(name) = refinement {
                    failure.refinement = Some(name.to_string());
                }
                failure
            }
        })
        .collect()
}

fn default_message(kind: &str, refinement: Option<&str>, value: &Value) -> String {
    match refinement {
        Some(name) => format!(
            "Expected a value of type `{kind}` with refinement `{name}`, but received: `{value}`"
        ),
        None => format!("Expected a value of type `{kind}`, but received: `{value}`"),
    }
}
