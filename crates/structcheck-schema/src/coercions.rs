//! Coercion: best-effort normalization applied before validation.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use structcheck_value::Value;

use crate::check::check_in;
use crate::context::Context;
use crate::schema::{Coercion, Kind, Schema};
use crate::types::{string, unknown};

/// Added coercions newest first, then the coercion built into the kind.
pub(crate) fn apply(schema: &Schema, value: Value, ctx: &Context) -> Value {
    let mut value = value;
    for coercion in schema.node().coercions.iter().rev() {
        if coercion.condition.is(&value) {
            value = (coercion.coercer)(value, ctx);
        }
    }
    coerce_kind(schema, value, ctx)
}

fn coerce_kind(schema: &Schema, value: Value, ctx: &Context) -> Value {
    match schema.kind() {
        Kind::Object(_) | Kind::Type(_) => match value {
            Value::Instance(instance) => Value::Object(instance.fields),
            other => other,
        },
        Kind::Date => match &value {
            Value::String(text) => parse_date(text).map(Value::Date).unwrap_or(value),
            Value::Number(millis) if millis.is_finite() => {
                DateTime::from_timestamp_millis(*millis as i64)
                    .map(Value::Date)
                    .unwrap_or(value)
            }
            _ => value,
        },
        Kind::Union(candidates) => {
            for candidate in candidates {
                let mut scoped = ctx.clone();
                if let Ok(coerced) = check_in(value.clone(), candidate, &mut scoped, true) {
                    return coerced;
                }
            }
            value
        }
        Kind::Intersection(members) => members
            .iter()
            .fold(value, |value, member| member.coerce_value(value, ctx)),
        Kind::Discriminator(discriminator) => match discriminator.merged_for(&value) {
            Some(merged) => merged.coerce_value(value, ctx),
            None => value,
        },
        Kind::Lazy(lazy) => lazy.schema().coerce_value(value, ctx),
        Kind::Dynamic(select) => {
            let selected = select(&value, ctx);
            selected.coerce_value(value, ctx)
        }
        _ => value,
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Apply `coercer` to values matching `condition` before checking them
/// against `schema`.
pub fn coerce<F>(schema: &Schema, condition: &Schema, coercer: F) -> Schema
where
    F: Fn(Value, &Context) -> Value + Send + Sync + 'static,
{
    let coercion = Coercion {
        condition: condition.clone(),
        coercer: Arc::new(coercer),
    };
    schema.rebuild(|node| node.coercions.push(coercion))
}

/// Substitute `fallback` for `undefined`.
///
/// When both the value and the fallback are plain objects, keys missing
/// from the value are filled in from the fallback.
pub fn defaulted(schema: &Schema, fallback: impl Into<Value>) -> Schema {
    let fallback = fallback.into();
    coerce(schema, &unknown(), move |value, _| match (value, &fallback) {
        (Value::Undefined, fallback) => fallback.clone(),
        (Value::Object(mut fields), Value::Object(defaults)) => {
            for (key, default) in defaults {
                let missing = fields.get(key).map_or(true, Value::is_undefined);
                if missing {
                    fields.insert(key.clone(), default.clone());
                }
            }
            Value::Object(fields)
        }
        (value, _) => value,
    })
}

/// Trim surrounding whitespace from strings.
pub fn trimmed(schema: &Schema) -> Schema {
    coerce(schema, &string(), |value, _| match value {
        Value::String(text) => Value::String(text.trim().to_string()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;
    use structcheck_value::{Instance, Object};

    use super::*;
    use crate::check::check;
    use crate::types::{date, number, object, r#type};
    use crate::union::union;

    fn coerced(schema: &Schema, value: Value) -> Value {
        apply(schema, value.clone(), &Context::root(&value))
    }

    #[test]
    fn dates_parse_from_strings_and_millis() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            coerced(&date(), Value::from("2024-01-15T10:30:00Z")),
            Value::Date(expected)
        );
        assert_eq!(
            coerced(&date(), Value::from(expected.timestamp_millis())),
            Value::Date(expected)
        );
        assert_eq!(coerced(&date(), Value::from("soon")), Value::from("soon"));
    }

    #[test]
    fn instances_become_plain_objects() {
        let fields = Object::from([("x".to_string(), Value::from(1))]);
        let value = Value::from(Instance::new("Point", fields.clone()));
        assert_eq!(coerced(&r#type([("x", number())]), value), Value::Object(fields));
    }

    #[test]
    fn newest_coercion_runs_first() {
        let base = coerce(&string(), &string(), |value, _| match value {
            Value::String(s) => Value::String(format!("{s}-old")),
            other => other,
        });
        let schema = coerce(&base, &string(), |value, _| match value {
            Value::String(s) => Value::String(format!("{s}-new")),
            other => other,
        });
        assert_eq!(coerced(&schema, Value::from("x")), Value::from("x-new-old"));
    }

    #[test]
    fn condition_guards_the_coercer() {
        let schema = coerce(&number(), &string(), |value, _| match value {
            Value::String(s) => s.parse::<f64>().map(Value::from).unwrap_or(Value::String(s)),
            other => other,
        });
        assert_eq!(coerced(&schema, Value::from("1.5")), Value::from(1.5));
        assert_eq!(coerced(&schema, Value::Bool(true)), Value::Bool(true));
    }

    #[test]
    fn defaulted_fills_undefined_and_missing_keys() {
        let schema = defaulted(&number(), 7);
        assert_eq!(coerced(&schema, Value::Undefined), Value::from(7));
        assert_eq!(coerced(&schema, Value::from(1)), Value::from(1));

        let schema = defaulted(
            &object([("a", number()), ("b", number())]),
            Value::object([("a", 1), ("b", 2)]),
        );
        assert_eq!(
            coerced(&schema, Value::object([("b", 5)])),
            Value::object([("a", 1), ("b", 5)])
        );
    }

    #[test]
    fn trimmed_strips_whitespace() {
        assert_eq!(coerced(&trimmed(&string()), Value::from("  hi ")), Value::from("hi"));
    }

    #[test]
    fn union_uses_first_candidate_that_passes() {
        let schema = union([number(), date()]);
        let text = Value::from("2024-01-15");
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(coerced(&schema, text), Value::Date(expected));
        assert_eq!(check(Value::from(3), &schema, true).unwrap(), Value::from(3));
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Undefined),
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            (-1.0e12f64..1.0e12).prop_map(Value::from),
            "[ a-z0-9:-]{0,12}".prop_map(Value::from),
        ]
    }

    proptest! {
        #[test]
        fn coercion_is_idempotent(value in scalar()) {
            let schemas = [
                date(),
                trimmed(&string()),
                defaulted(&number(), 1),
                union([number(), date()]),
            ];
            for schema in &schemas {
                let once = coerced(schema, value.clone());
                let twice = coerced(schema, once.clone());
                prop_assert_eq!(once, twice);
            }
        }
    }
}
