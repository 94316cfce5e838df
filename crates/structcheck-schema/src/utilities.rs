//! Wrappers and shape recombination built from existing schemas.

use std::sync::Arc;

use structcheck_value::Value;

use crate::context::Context;
use crate::error::{Result, SchemaError};
use crate::failure::Outcome;
use crate::schema::{Kind, Lazy, Schema, Shape};

/// Also accept `undefined`.
pub fn optional(schema: &Schema) -> Schema {
    schema.rebuild(|node| node.optional = true)
}

/// Also accept `null`.
pub fn nullable(schema: &Schema) -> Schema {
    schema.rebuild(|node| node.nullable = true)
}

/// A custom leaf kind named `name`.
pub fn define<F, R>(name: impl Into<String>, validator: F) -> Schema
where
    F: Fn(&Value, &Context) -> R + Send + Sync + 'static,
    R: Into<Outcome>,
{
    Schema::from_kind(Kind::Define {
        name: name.into(),
        validator: Arc::new(move |value: &Value, ctx: &Context| validator(value, ctx).into()),
    })
}

/// Defer building the schema until it is first needed.
///
/// The factory runs once; recursive schemas refer back to themselves
/// through it.
pub fn lazy<F>(factory: F) -> Schema
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    Schema::from_kind(Kind::Lazy(Lazy::new(Arc::new(factory))))
}

/// Choose the schema for each value at check time.
pub fn dynamic<F>(select: F) -> Schema
where
    F: Fn(&Value, &Context) -> Schema + Send + Sync + 'static,
{
    Schema::from_kind(Kind::Dynamic(Arc::new(select)))
}

fn shape_of(schema: &Schema) -> Result<(&Shape, bool)> {
    match schema.kind() {
        Kind::Object(Some(shape)) => Ok((shape, false)),
        Kind::Type(shape) => Ok((shape, true)),
        other => Err(SchemaError::NotAnObjectSchema(other.name().to_string())),
    }
}

fn reshape(shape: Shape, open: bool) -> Schema {
    if open {
        Schema::from_kind(Kind::Type(shape))
    } else {
        Schema::from_kind(Kind::Object(Some(shape)))
    }
}

/// Merge the shapes of several schemas; later keys replace earlier ones.
///
/// The result is a `type` when the first schema is one, else an `object`.
pub fn assign(schemas: &[Schema]) -> Result<Schema> {
    let mut merged = Shape::new();
    let mut open = false;
    for (index, schema) in schemas.iter().enumerate() {
        let (shape, is_type) = shape_of(schema)?;
        if index == 0 {
            open = is_type;
        }
        for (key, child) in shape.iter() {
            merged.insert(key, child.clone());
        }
    }
    Ok(reshape(merged, open))
}

/// Keep only `keys`; keys the shape does not declare are ignored.
pub fn pick(schema: &Schema, keys: &[&str]) -> Result<Schema> {
    let (shape, open) = shape_of(schema)?;
    let picked = shape
        .iter()
        .filter(|(key, _)| keys.contains(key))
        .map(|(key, child)| (key, child.clone()))
        .collect();
    Ok(reshape(picked, open))
}

/// Drop `keys`.
pub fn omit(schema: &Schema, keys: &[&str]) -> Result<Schema> {
    let (shape, open) = shape_of(schema)?;
    let kept = shape
        .iter()
        .filter(|(key, _)| !keys.contains(key))
        .map(|(key, child)| (key, child.clone()))
        .collect();
    Ok(reshape(kept, open))
}

/// Make every declared key optional.
pub fn partial(schema: &Schema) -> Result<Schema> {
    let (shape, open) = shape_of(schema)?;
    Ok(reshape(shape.map_schemas(optional), open))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::check;
    use crate::types::{array, number, object, r#type, string};

    #[test]
    fn optional_accepts_undefined_members() {
        let schema = object([("a", optional(&string()))]);
        assert!(check(Value::object(Vec::<(&str, Value)>::new()), &schema, false).is_ok());
        assert!(check(Value::object([("a", Value::Null)]), &schema, false).is_err());
    }

    #[test]
    fn nullable_accepts_null() {
        let schema = nullable(&number());
        assert!(check(Value::Null, &schema, false).is_ok());
        assert!(check(Value::Undefined, &schema, false).is_err());
    }

    #[test]
    fn lazy_schemas_can_recurse() {
        fn node() -> Schema {
            object([("value", number()), ("children", array(lazy(node)))])
        }
        let tree = Value::object([
            ("value", Value::from(1)),
            (
                "children",
                Value::Array(vec![Value::object([
                    ("value", Value::from(2)),
                    ("children", Value::Array(vec![])),
                ])]),
            ),
        ]);
        assert!(check(tree, &node(), false).is_ok());
    }

    #[test]
    fn dynamic_selects_per_value() {
        let schema = dynamic(|value: &Value, _: &Context| match value {
            Value::String(_) => string(),
            _ => number(),
        });
        assert!(check(Value::from("a"), &schema, false).is_ok());
        assert!(check(Value::from(1), &schema, false).is_ok());
        assert!(check(Value::Null, &schema, false).is_err());
    }

    #[test]
    fn assign_follows_the_first_schema() {
        let merged = assign(&[r#type([("a", string())]), object([("b", number())])]).unwrap();
        assert_eq!(merged.type_name(), "type");
        assert_eq!(merged.shape().unwrap().keys().collect::<Vec<_>>(), vec!["a", "b"]);

        let merged = assign(&[object([("a", string())]), object([("a", number())])]).unwrap();
        assert_eq!(merged.type_name(), "object");
        assert_eq!(merged.shape().unwrap().get("a").unwrap().type_name(), "number");
    }

    #[test]
    fn pick_omit_partial_keep_openness() {
        let base = r#type([("a", string()), ("b", number()), ("c", number())]);
        let picked = pick(&base, &["a", "c"]).unwrap();
        assert_eq!(picked.type_name(), "type");
        assert_eq!(picked.shape().unwrap().keys().collect::<Vec<_>>(), vec!["a", "c"]);

        let closed = object([("a", string()), ("b", number())]);
        let omitted = omit(&closed, &["a"]).unwrap();
        assert_eq!(omitted.type_name(), "object");
        assert_eq!(omitted.shape().unwrap().keys().collect::<Vec<_>>(), vec!["b"]);

        let relaxed = partial(&closed).unwrap();
        assert!(relaxed.shape().unwrap().iter().all(|(_, s)| s.is_optional()));
        assert!(check(Value::object(Vec::<(&str, Value)>::new()), &relaxed, false).is_ok());
    }

    #[test]
    fn utilities_reject_shapeless_schemas() {
        assert!(matches!(
            partial(&string()),
            Err(SchemaError::NotAnObjectSchema(kind)) if kind == "string"
        ));
    }
}
