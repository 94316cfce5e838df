//! Top-level structural validation for each kind.

use structcheck_value::Value;

use crate::context::Context;
use crate::failure::{expect, to_failures, Failure, Outcome};
use crate::schema::{Kind, Schema};
use crate::union;

/// Run the node's own validator against `value`, without descending.
pub(crate) fn validate(schema: &Schema, value: &Value, ctx: &Context) -> Vec<Failure> {
    if schema.admits_absent(value) {
        return Vec::new();
    }

    let outcome = match schema.kind() {
        Kind::Any | Kind::Unknown => Outcome::Valid,
        Kind::Never => Outcome::from(false),
        Kind::String => expect(matches!(value, Value::String(_)), || {
            format!("Expected a string, but received: {value}")
        }),
        Kind::Number => expect(matches!(value, Value::Number(n) if !n.is_nan()), || {
            format!("Expected a number, but received: {value}")
        }),
        Kind::Integer => expect(
            matches!(value, Value::Number(n) if n.is_finite() && n.fract() == 0.0),
            || format!("Expected an integer, but received: {value}"),
        ),
        Kind::Boolean => Outcome::from(matches!(value, Value::Bool(_))),
        Kind::BigInt => Outcome::from(matches!(value, Value::BigInt(_))),
        Kind::Date => expect(matches!(value, Value::Date(_)), || {
            format!("Expected a valid `Date` object, but received: {value}")
        }),
        Kind::Literal(constant) => expect(value == constant, || {
            format!("Expected the literal `{constant}`, but received: {value}")
        }),
        Kind::Enums(values) => expect(values.contains(value), || {
            let description = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("Expected one of `{description}`, but received: {value}")
        }),
        Kind::Instance(class) => expect(
            matches!(value, Value::Instance(instance) if instance.class == *class),
            || format!("Expected a `{class}` instance, but received: {value}"),
        ),
        Kind::Array(_) => expect(matches!(value, Value::Array(_)), || {
            format!("Expected an array value, but received: {value}")
        }),
        Kind::Tuple(_) => expect(matches!(value, Value::Array(_)), || {
            format!("Expected an array, but received: {value}")
        }),
        Kind::Object(_) | Kind::Type(_) | Kind::Record(..) => {
            expect(value.is_object_like(), || {
                format!("Expected an object, but received: {value}")
            })
        }
        Kind::Map(_) => expect(matches!(value, Value::Map(_)), || {
            format!("Expected a `Map` object, but received: {value}")
        }),
        Kind::Set(_) => expect(matches!(value, Value::Set(_)), || {
            format!("Expected a `Set` object, but received: {value}")
        }),
        Kind::Union(candidates) => return union::validate_union(candidates, value, ctx),
        Kind::Intersection(members) => {
            return members
                .iter()
                .flat_map(|member| member.validate_self(value, ctx))
                .collect();
        }
        Kind::Discriminator(discriminator) => return discriminator.validate(value, ctx),
        Kind::Lazy(lazy) => return lazy.schema().validate_self(value, ctx),
        Kind::Dynamic(select) => return select(value, ctx).validate_self(value, ctx),
        Kind::Define { validator, .. } => validator(value, ctx),
    };

    to_failures(outcome, ctx, schema.type_name(), None, value)
}
