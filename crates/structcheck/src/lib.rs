//! Composable runtime validation and coercion for untyped data.
//!
//! structcheck checks already-parsed values against schemas built from small
//! combinators, optionally coercing them into canonical form, and reports
//! every violation with its exact location.
//!
//! # Crate Structure
//!
//! - [`value`]: The dynamic value model, path segments and printable form
//! - [`schema`]: Combinators, the check pipeline and the façade (behind `schema` feature)
//! - [`logging`]: Subscriber setup for binaries and demos (behind `logging` feature)

/// Re-export value types.
pub mod value {
    pub use structcheck_value::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use structcheck_schema::*;
}

#[cfg(feature = "logging")]
pub mod logging;
