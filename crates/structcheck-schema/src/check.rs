//! The check pipeline: coerce, validate, descend, refine.

use std::sync::Arc;

use structcheck_value::Value;

use crate::context::Context;
use crate::failure::{Failure, Failures};
use crate::schema::{Kind, Schema};

/// Check `value` against `schema`, returning the (possibly coerced) value
/// or every failure in discovery order.
///
/// The walk recurses once per nesting level of the value, so the depth a
/// check can handle is bounded by the calling thread's stack. Very deeply
/// nested input (thousands of levels) should be checked on a thread with a
/// larger stack.
pub fn check(value: Value, schema: &Schema, coerce: bool) -> Result<Value, Failures> {
    let mut ctx = Context::root(&value);
    check_in(value, schema, &mut ctx, coerce)
}

/// Like [`check`], but starting from an existing position.
///
/// Custom validators use this to check a nested value while keeping
/// failure paths relative to the outer root.
pub fn check_in(
    value: Value,
    schema: &Schema,
    ctx: &mut Context,
    coerce: bool,
) -> Result<Value, Failures> {
    let mut failures = Vec::new();
    let output = run(value, schema, ctx, coerce, &mut failures);
    match Failures::new(failures) {
        Some(failures) => Err(failures),
        None => Ok(output),
    }
}

/// Checks one value/schema pair, appending failures to `failures`.
///
/// The node's own validator short-circuits the subtree. Refiners run only
/// when nothing below this node failed.
pub(crate) fn run(
    value: Value,
    schema: &Schema,
    ctx: &mut Context,
    coerce: bool,
    failures: &mut Vec<Failure>,
) -> Value {
    let mut output = if coerce {
        schema.coerce_value(value, ctx)
    } else {
        value
    };

    let own = schema.validate_self(&output, ctx);
    if !own.is_empty() {
        failures.extend(own);
        return output;
    }

    let before = failures.len();
    descend(schema, &mut output, ctx, coerce, failures);

    if failures.len() == before {
        failures.extend(schema.refine_value(&output, ctx));
    }
    output
}

/// Checks the children of `output`, writing coerced children back in place.
///
/// Intersection members descend one after another, so each member sees the
/// children as coerced by the members before it.
fn descend(
    schema: &Schema,
    output: &mut Value,
    ctx: &mut Context,
    coerce: bool,
    failures: &mut Vec<Failure>,
) {
    match schema.kind() {
        Kind::Intersection(members) => {
            for member in members {
                descend(member, output, ctx, coerce, failures);
            }
            return;
        }
        Kind::Lazy(lazy) => return descend(lazy.schema(), output, ctx, coerce, failures),
        _ => {}
    }

    for entry in schema.entries(output, ctx) {
        ctx.enter(entry.key, Arc::new(entry.value.clone()));
        let child = run(entry.value, &entry.schema, ctx, coerce, failures);
        ctx.leave();

        if coerce {
            entry.slot.write(output, child);
        }
    }
}
