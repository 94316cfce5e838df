//! Conversions between [`Value`] and `serde_json::Value`.

use chrono::SecondsFormat;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number};

use crate::error::{Result, ValueError};
use crate::value::{Object, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Object>(),
            ),
        }
    }
}

impl Value {
    /// Convert into JSON.
    ///
    /// Dates become RFC 3339 strings, maps become arrays of `[key, value]`
    /// pairs, sets and instances lose their container identity, and
    /// `Undefined` object members are dropped.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(match self {
            Value::Undefined => {
                return Err(ValueError::NotRepresentable("undefined".to_string()));
            }
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n)?,
            Value::BigInt(n) => match i64::try_from(*n) {
                Ok(n) => serde_json::Value::Number(Number::from(n)),
                Err(_) => serde_json::Value::String(n.to_string()),
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(element_to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(fields) => fields_to_json(fields)?,
            Value::Instance(instance) => fields_to_json(&instance.fields)?,
            Value::Map(entries) => serde_json::Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| {
                        Ok(serde_json::Value::Array(vec![
                            element_to_json(k)?,
                            element_to_json(v)?,
                        ]))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Set(elements) => serde_json::Value::Array(
                elements
                    .iter()
                    .map(element_to_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Date(date) => {
                serde_json::Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        })
    }
}

// Inside sequences `undefined` has a slot to fill, like `JSON.stringify`.
fn element_to_json(value: &Value) -> Result<serde_json::Value> {
    match value {
        Value::Undefined => Ok(serde_json::Value::Null),
        other => other.to_json(),
    }
}

fn number_to_json(n: f64) -> Result<serde_json::Value> {
    if n.fract() == 0.0 && n.abs() <= i64::MAX as f64 {
        return Ok(serde_json::Value::Number(Number::from(n as i64)));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or(ValueError::NonFiniteNumber(n))
}

fn fields_to_json(fields: &Object) -> Result<serde_json::Value> {
    let mut map = Map::new();
    for (key, value) in fields {
        if value.is_undefined() {
            continue;
        }
        map.insert(key.clone(), value.to_json()?);
    }
    Ok(serde_json::Value::Object(map))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .unwrap_or(serde_json::Value::Null)
            .serialize(serializer)
    }
}
