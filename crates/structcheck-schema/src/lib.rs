//! Composable runtime schemas for untyped values.
//!
//! Build a [`Schema`] from combinators, then check values against it.
//! A check coerces (when asked), validates each node's own shape, descends
//! into children, and runs named refinements once a subtree is clean.
//! Failures are data: every violation is recorded with its path and the
//! chain of ancestor values leading to it.
//!
//! ```
//! use structcheck_schema::{number, object, string, validate, ValidateOptions};
//! use structcheck_value::Value;
//!
//! let user = object([("id", number()), ("name", string())]);
//! let err = validate(Value::object([("id", "7")]), &user, ValidateOptions::default())
//!     .unwrap_err();
//! assert_eq!(err.message(), "At path: id -- Expected a number, but received: \"7\"");
//! ```

pub mod api;
pub mod check;
pub mod coercions;
pub mod config;
pub mod context;
pub mod error;
pub mod failure;
pub mod refinements;
pub mod registry;
pub mod schema;
pub mod types;
pub mod union;
pub mod utilities;

mod traversal;
mod validator;

pub use api::{assert, create, is, validate};
pub use check::{check, check_in};
pub use coercions::{coerce, defaulted, trimmed};
pub use config::{RegistryConfig, ValidateOptions};
pub use context::Context;
pub use error::{Result, SchemaError, StructError};
pub use failure::{Failure, Failures, Issue, Outcome};
pub use refinements::{empty, max, min, nonempty, pattern, refine, size};
pub use registry::SchemaRegistry;
pub use schema::{Kind, Lazy, Schema, Shape};
pub use types::{
    any, any_array, any_map, any_object, any_set, array, bigint, boolean, date, enums, instance,
    integer, literal, map, never, number, object, r#type, record, set, string, tuple, unknown,
};
pub use union::{discriminator, intersection, union, Branch, Discriminator};
pub use utilities::{assign, define, dynamic, lazy, nullable, omit, optional, partial, pick};
