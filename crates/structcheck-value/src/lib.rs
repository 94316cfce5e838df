//! Dynamic value model validated by structcheck schemas.
//!
//! Values arrive already parsed. This crate gives them one in-memory shape
//! that can express everything a schema may ask about:
//! - `undefined` as distinct from `null`
//! - ordered maps and sets with arbitrary keys
//! - dates and named class instances
//!
//! Conversions to and from `serde_json::Value` cover the JSON subset.

pub mod error;
pub mod json;
pub mod path;
pub mod print;
pub mod value;

pub use error::{Result, ValueError};
pub use path::PathSegment;
pub use print::print;
pub use value::{Instance, Object, Value};
