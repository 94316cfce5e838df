//! Printable form of values, echoed back in diagnostic messages.

use std::fmt::{self, Write};

use chrono::SecondsFormat;

use crate::value::{Object, Value};

/// Render a value the way diagnostics echo it.
pub fn print(value: &Value) -> String {
    value.to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write_number(f, *n),
            Value::BigInt(n) => write!(f, "{n}"),
            Value::String(s) => write_quoted(f, s),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Object(fields) => write_fields(f, fields),
            Value::Map(entries) => {
                f.write_str("Map {")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    f.write_str(if i > 0 { ", " } else { "" })?;
                    write!(f, "{k} => {v}")?;
                }
                f.write_char('}')
            }
            Value::Set(elements) => {
                f.write_str("Set {")?;
                for (i, element) in elements.iter().enumerate() {
                    f.write_str(if i > 0 { ", " } else { "" })?;
                    write!(f, "{element}")?;
                }
                f.write_char('}')
            }
            Value::Date(date) => f.write_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Instance(instance) => {
                write!(f, "{} ", instance.class)?;
                write_fields(f, &instance.fields)
            }
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        // `-0` prints as `0`.
        write!(f, "{}", n as i128)
    } else {
        write!(f, "{n}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => write!(f, "{s:?}"),
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &Object) -> fmt::Result {
    f.write_char('{')?;
    let mut first = true;
    for (key, value) in fields {
        if value.is_undefined() {
            continue;
        }
        if !first {
            f.write_char(',')?;
        }
        first = false;
        write_quoted(f, key)?;
        write!(f, ":{value}")?;
    }
    f.write_char('}')
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::value::Instance;

    #[test]
    fn strings_are_quoted() {
        assert_eq!(print(&Value::from("5")), r#""5""#);
        assert_eq!(print(&Value::from("a\"b")), r#""a\"b""#);
    }

    #[test]
    fn numbers_print_like_literals() {
        assert_eq!(print(&Value::from(42)), "42");
        assert_eq!(print(&Value::from(1.5)), "1.5");
        assert_eq!(print(&Value::from(-3.0)), "-3");
        assert_eq!(print(&Value::from(-0.0)), "0");
        assert_eq!(print(&Value::Number(f64::NAN)), "NaN");
        assert_eq!(print(&Value::Number(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn scalars_and_absence() {
        assert_eq!(print(&Value::Undefined), "undefined");
        assert_eq!(print(&Value::Null), "null");
        assert_eq!(print(&Value::Bool(true)), "true");
        assert_eq!(print(&Value::BigInt(7)), "7");
    }

    #[test]
    fn composites_render_compactly() {
        let value = Value::object([
            ("b", Value::Array(vec![Value::from(1), Value::from("x")])),
            ("a", Value::Null),
            ("skipped", Value::Undefined),
        ]);
        assert_eq!(print(&value), r#"{"a":null,"b":[1,"x"]}"#);
        assert_eq!(print(&Value::map([("k", 1)])), r#"Map {"k" => 1}"#);
        assert_eq!(print(&Value::set([1, 2])), "Set {1, 2}");
    }

    #[test]
    fn dates_and_instances() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(print(&Value::Date(date)), "2024-01-15T10:30:00.000Z");

        let instance = Instance::new("Point", Object::from([("x".to_string(), Value::from(1))]));
        assert_eq!(print(&Value::Instance(instance)), r#"Point {"x":1}"#);
    }
}
