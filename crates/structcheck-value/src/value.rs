use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Associative container backing objects and instance fields.
pub type Object = BTreeMap<String, Value>;

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence of a value, distinct from `Null`.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    /// Insertion-ordered map with arbitrary keys.
    Map(Vec<(Value, Value)>),
    /// Insertion-ordered collection of unique elements.
    Set(Vec<Value>),
    Date(DateTime<Utc>),
    /// A value constructed by a named class.
    Instance(Instance),
}

/// A class instance: the class name plus its own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: String,
    pub fields: Object,
}

impl Instance {
    /// Create an instance of `class` with the given fields.
    pub fn new(class: impl Into<String>, fields: Object) -> Self {
        Self {
            class: class.into(),
            fields,
        }
    }
}

impl Value {
    /// Build an object from `(key, value)` pairs.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a map, keeping the first position and the last value of
    /// duplicate keys.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (k, v) in entries {
            let (k, v) = (k.into(), v.into());
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Value::Map(out)
    }

    /// Build a set, dropping duplicate elements.
    pub fn set<T: Into<Value>>(elements: impl IntoIterator<Item = T>) -> Self {
        let mut out: Vec<Value> = Vec::new();
        for element in elements {
            let element = element.into();
            if !out.contains(&element) {
                out.push(element);
            }
        }
        Value::Set(out)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for plain objects and class instances.
    pub fn is_object_like(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Instance(_))
    }

    /// The associative view of an object or instance.
    pub fn fields(&self) -> Option<&Object> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::Instance(instance) => Some(&instance.fields),
            _ => None,
        }
    }

    /// Mutable associative view of an object or instance.
    pub fn fields_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::Instance(instance) => Some(&mut instance.fields),
            _ => None,
        }
    }

    /// Property lookup; absent properties and non-objects read as `Undefined`.
    pub fn get(&self, key: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        self.fields()
            .and_then(|fields| fields.get(key))
            .unwrap_or(&UNDEFINED)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// A short name for the value's runtime kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Date(_) => "date",
            Value::Instance(_) => "instance",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(fields: Object) -> Self {
        Value::Object(fields)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}
