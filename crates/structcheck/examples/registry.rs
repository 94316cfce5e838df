//! Registry example: named schemas with coercion and strict mode.
//!
//! Run with:
//!   cargo run --example registry --features logging
//!
//! `STRUCTCHECK_LOG` and `STRUCTCHECK_LOG_FORMAT` override the debug/json
//! defaults.

use structcheck::logging::{init_from_env, LogFormat, LogLevel};
use structcheck::schema::{
    array, date, defaulted, nonempty, number, optional, r#type, string, trimmed, RegistryConfig,
    SchemaRegistry,
};
use structcheck::value::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_env(LogFormat::Json, LogLevel::Debug);

    let order = r#type([
        ("id", trimmed(&string())),
        ("placedAt", date()),
        ("items", nonempty(&array(string()))),
        ("priority", defaulted(&number(), 0)),
        ("note", optional(&string())),
    ])
    .named("order", Some(serde_json::json!({ "version": 1 })));

    let mut lenient = SchemaRegistry::new();
    lenient.register_named(&order)?;

    let mut strict = SchemaRegistry::with_config(RegistryConfig {
        strict_mode: true,
        fail_on_missing_schema: true,
        ..RegistryConfig::default()
    });
    strict.register_named(&order)?;

    let input = Value::from(serde_json::json!({
        "id": "  A-17 ",
        "placedAt": "2024-01-15T10:30:00Z",
        "items": ["widget"],
        "channel": "web",
    }));

    let output = lenient.validate("order", input.clone())?;
    eprintln!("lenient: {output}");
    eprintln!("as json: {}", output.to_json()?);

    if let Err(err) = strict.validate("order", input) {
        eprintln!("strict:  {err}");
    }
    if let Err(err) = strict.validate("invoice", Value::Null) {
        eprintln!("strict:  {err}");
    }

    Ok(())
}
