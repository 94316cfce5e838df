//! Discriminator example: validates a stream of tagged events.
//!
//! Run with:
//!   cargo run --example discriminator-validation --features logging
//!
//! Set `STRUCTCHECK_LOG=trace` to see branch selection.

use structcheck::logging::{init_from_env, LogFormat, LogLevel};
use structcheck::schema::{
    boolean, discriminator, enums, object, string, Schema, ValidateOptions,
};
use structcheck::value::Value;

fn events() -> Result<Schema, Box<dyn std::error::Error>> {
    Ok(discriminator(
        "eventType",
        [
            (
                "USER_CREATED",
                object([
                    ("id", string()),
                    ("name", string()),
                    ("metadata", object([("source", string())])),
                ]),
            ),
            (
                "USER_PAYMENT_PLAN_CHANGED",
                object([
                    ("id", string()),
                    ("plan", enums(["FREE", "PAID"])),
                    ("billingCycle", enums(["MONTHLY", "YEARLY"])),
                ]),
            ),
            (
                "USER_DELETED",
                object([
                    ("id", string()),
                    ("softDelete", boolean()),
                    ("deletedBy", string()),
                ]),
            ),
        ],
    )?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_env(LogFormat::Text, LogLevel::Info);

    let schema = events()?;

    let inputs = [
        Value::object([
            ("eventType", "USER_PAYMENT_PLAN_CHANGED"),
            ("id", "user-123"),
            ("plan", "PAID"),
            ("billingCycle", "MONTHLY"),
        ]),
        Value::object([
            ("eventType", Value::from("USER_DELETED")),
            ("id", Value::from("user-9")),
            ("softDelete", Value::from("yes")),
            ("deletedBy", Value::from("admin")),
        ]),
        Value::object([("eventType", "USER_RENAMED"), ("id", "user-1")]),
        Value::object([("id", "user-1")]),
        Value::from("not an event"),
    ];

    for input in inputs {
        match schema.validate(input.clone(), ValidateOptions::default()) {
            Ok(output) => eprintln!("ok     {output}"),
            Err(err) => {
                eprintln!("failed {input}");
                eprintln!("       {}", err.message());
                for failure in err.failures() {
                    eprintln!(
                        "       - type={} path={:?} value={}",
                        failure.kind, failure.path, failure.value
                    );
                }
            }
        }
    }

    Ok(())
}
