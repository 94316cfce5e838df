//! Constructors for the built-in kinds.

use structcheck_value::Value;

use crate::schema::{Kind, Schema, Shape};

/// Any value.
pub fn any() -> Schema {
    Schema::from_kind(Kind::Any)
}

/// Any value, reported as `unknown`.
pub fn unknown() -> Schema {
    Schema::from_kind(Kind::Unknown)
}

/// No value at all.
pub fn never() -> Schema {
    Schema::from_kind(Kind::Never)
}

pub fn string() -> Schema {
    Schema::from_kind(Kind::String)
}

/// Numbers other than `NaN`.
pub fn number() -> Schema {
    Schema::from_kind(Kind::Number)
}

/// Finite numbers without a fractional part.
pub fn integer() -> Schema {
    Schema::from_kind(Kind::Integer)
}

pub fn boolean() -> Schema {
    Schema::from_kind(Kind::Boolean)
}

pub fn bigint() -> Schema {
    Schema::from_kind(Kind::BigInt)
}

/// Dates. With coercion, RFC 3339 or `YYYY-MM-DD` strings and epoch
/// milliseconds are converted first.
pub fn date() -> Schema {
    Schema::from_kind(Kind::Date)
}

/// Exactly `constant`.
pub fn literal(constant: impl Into<Value>) -> Schema {
    Schema::from_kind(Kind::Literal(constant.into()))
}

/// One of `values`.
pub fn enums<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Schema {
    Schema::from_kind(Kind::Enums(values.into_iter().map(Into::into).collect()))
}

/// Instances of the class named `class`.
pub fn instance(class: impl Into<String>) -> Schema {
    Schema::from_kind(Kind::Instance(class.into()))
}

/// Arrays whose every element matches `element`.
pub fn array(element: Schema) -> Schema {
    Schema::from_kind(Kind::Array(Some(element)))
}

/// Arrays of anything; elements are never visited.
pub fn any_array() -> Schema {
    Schema::from_kind(Kind::Array(None))
}

/// Fixed-arity arrays with one schema per position.
pub fn tuple(elements: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::from_kind(Kind::Tuple(elements.into_iter().collect()))
}

/// Objects with exactly the declared keys; unknown keys fail.
pub fn object(shape: impl Into<Shape>) -> Schema {
    Schema::from_kind(Kind::Object(Some(shape.into())))
}

/// Objects of any shape; properties are never visited.
pub fn any_object() -> Schema {
    Schema::from_kind(Kind::Object(None))
}

/// Objects with at least the declared keys; unknown keys pass untouched.
pub fn r#type(shape: impl Into<Shape>) -> Schema {
    Schema::from_kind(Kind::Type(shape.into()))
}

/// Objects whose every key and value match `key` and `value`.
pub fn record(key: Schema, value: Schema) -> Schema {
    Schema::from_kind(Kind::Record(key, value))
}

pub fn map(key: Schema, value: Schema) -> Schema {
    Schema::from_kind(Kind::Map(Some((key, value))))
}

pub fn any_map() -> Schema {
    Schema::from_kind(Kind::Map(None))
}

pub fn set(element: Schema) -> Schema {
    Schema::from_kind(Kind::Set(Some(element)))
}

pub fn any_set() -> Schema {
    Schema::from_kind(Kind::Set(None))
}
