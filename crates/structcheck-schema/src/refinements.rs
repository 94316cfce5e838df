//! Named semantic checks that run after structural validation succeeds.

use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;
use structcheck_value::Value;

use crate::context::Context;
use crate::failure::{to_failures, Failure, Outcome};
use crate::schema::{Kind, Refinement, Schema};
use crate::union::Resolution;

/// Refiners of composite kinds first, then the node's own refinements in
/// the order they were added.
pub(crate) fn apply(schema: &Schema, value: &Value, ctx: &Context) -> Vec<Failure> {
    if schema.admits_absent(value) {
        return Vec::new();
    }

    let mut failures = match schema.kind() {
        Kind::Intersection(members) => members
            .iter()
            .flat_map(|member| member.refine_value(value, ctx))
            .collect(),
        Kind::Discriminator(discriminator) => match discriminator.resolve(value) {
            Resolution::Branch(branch) => branch.merged().refine_value(value, ctx),
            _ => Vec::new(),
        },
        Kind::Lazy(lazy) => lazy.schema().refine_value(value, ctx),
        Kind::Dynamic(select) => select(value, ctx).refine_value(value, ctx),
        _ => Vec::new(),
    };

    for refinement in &schema.node().refinements {
        let outcome = (refinement.refiner)(value, ctx);
        failures.extend(to_failures(
            outcome,
            ctx,
            schema.type_name(),
            Some(refinement.name.as_str()),
            value,
        ));
    }
    failures
}

/// Attach a named refinement.
pub fn refine<F, R>(schema: &Schema, name: impl Into<String>, refiner: F) -> Schema
where
    F: Fn(&Value, &Context) -> R + Send + Sync + 'static,
    R: Into<Outcome>,
{
    let refinement = Refinement {
        name: name.into(),
        refiner: Arc::new(move |value: &Value, ctx: &Context| refiner(value, ctx).into()),
    };
    schema.rebuild(|node| node.refinements.push(refinement))
}

/// Numbers or dates at or above `threshold` (strictly above when `exclusive`).
pub fn min(schema: &Schema, threshold: impl Into<Value>, exclusive: bool) -> Schema {
    bound(schema, "min", threshold.into(), exclusive, Ordering::Greater)
}

/// Numbers or dates at or below `threshold` (strictly below when `exclusive`).
pub fn max(schema: &Schema, threshold: impl Into<Value>, exclusive: bool) -> Schema {
    bound(schema, "max", threshold.into(), exclusive, Ordering::Less)
}

fn bound(
    schema: &Schema,
    name: &str,
    threshold: Value,
    exclusive: bool,
    side: Ordering,
) -> Schema {
    let kind = schema.type_name().to_string();
    let relation = match (side, exclusive) {
        (Ordering::Greater, true) => "greater than",
        (Ordering::Greater, false) => "greater than or equal to",
        (_, true) => "less than",
        (_, false) => "less than or equal to",
    };
    refine(schema, name, move |value: &Value, _: &Context| {
        let within = match compare(value, &threshold) {
            Some(Ordering::Equal) => !exclusive,
            Some(ordering) => ordering == side,
            None => false,
        };
        if within {
            Outcome::Valid
        } else {
            Outcome::fail(format!(
                "Expected a {kind} {relation} {threshold} but received `{value}`"
            ))
        }
    })
}

fn compare(value: &Value, threshold: &Value) -> Option<Ordering> {
    match (value, threshold) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Length (strings, arrays), size (maps, sets, objects) or value (numbers,
/// dates as epoch milliseconds) between `min` and `max` inclusive.
pub fn size(schema: &Schema, min: usize, max: usize) -> Schema {
    let kind = schema.type_name().to_string();
    let expected = if min == max {
        format!("of `{min}`")
    } else {
        format!("between `{min}` and `{max}`")
    };
    refine(schema, "size", move |value: &Value, _: &Context| {
        let (lo, hi) = (min as f64, max as f64);
        match measure(value) {
            Some((noun, count)) => {
                if (min..=max).contains(&count) {
                    Outcome::Valid
                } else {
                    Outcome::fail(format!(
                        "Expected a {kind} with a {noun} {expected} but received one with a {noun} of `{count}`"
                    ))
                }
            }
            None => {
                let scalar = match value {
                    Value::Number(n) => Some(*n),
                    Value::Date(date) => Some(date.timestamp_millis() as f64),
                    _ => None,
                };
                match scalar {
                    Some(n) if lo <= n && n <= hi => Outcome::Valid,
                    _ => Outcome::fail(format!(
                        "Expected a {kind} {expected} but received `{value}`"
                    )),
                }
            }
        }
    })
}

fn measure(value: &Value) -> Option<(&'static str, usize)> {
    match value {
        Value::String(text) => Some(("length", text.chars().count())),
        Value::Array(items) => Some(("length", items.len())),
        Value::Map(entries) => Some(("size", entries.len())),
        Value::Set(members) => Some(("size", members.len())),
        Value::Object(fields) => Some(("size", fields.len())),
        Value::Instance(instance) => Some(("size", instance.fields.len())),
        _ => None,
    }
}

/// Strings, arrays, maps, sets or objects with at least one element.
pub fn nonempty(schema: &Schema) -> Schema {
    let kind = schema.type_name().to_string();
    refine(schema, "nonempty", move |value: &Value, _: &Context| {
        match measure(value) {
            Some((_, n)) if n > 0 => Outcome::Valid,
            _ => Outcome::fail(format!(
                "Expected a nonempty {kind} but received an empty one"
            )),
        }
    })
}

/// Strings, arrays, maps, sets or objects with no elements.
pub fn empty(schema: &Schema) -> Schema {
    let kind = schema.type_name().to_string();
    refine(schema, "empty", move |value: &Value, _: &Context| {
        match measure(value) {
            Some((_, 0)) => Outcome::Valid,
            Some((noun, n)) => Outcome::fail(format!(
                "Expected an empty {kind} but received one with a {noun} of `{n}`"
            )),
            None => Outcome::from(false),
        }
    })
}

/// Strings matching `regex`.
pub fn pattern(schema: &Schema, regex: Regex) -> Schema {
    let kind = schema.type_name().to_string();
    refine(schema, "pattern", move |value: &Value, _: &Context| {
        match value.as_str() {
            Some(text) if regex.is_match(text) => Outcome::Valid,
            _ => Outcome::fail(format!(
                "Expected a {kind} matching `/{}/` but received {value}",
                regex.as_str()
            )),
        }
    })
}
