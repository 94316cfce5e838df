//! Child enumeration: which (key, value, schema) triples a value requires.

use std::sync::OnceLock;

use structcheck_value::{PathSegment, Value};

use crate::context::Context;
use crate::schema::{Kind, Schema};
use crate::union::Resolution;

/// One child to check independently.
pub(crate) struct Entry {
    pub(crate) key: PathSegment,
    pub(crate) value: Value,
    pub(crate) schema: Schema,
    pub(crate) slot: Slot,
}

/// Where a child's coerced output is written back into its parent.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    Element(usize),
    Field(String),
    MapValue(usize),
    Member(usize),
    /// Keys of records and maps are checked but never written back.
    Detached,
}

impl Slot {
    pub(crate) fn write(&self, parent: &mut Value, output: Value) {
        match (self, parent) {
            (Slot::Element(index), Value::Array(items)) => {
                if let Some(item) = items.get_mut(*index) {
                    *item = output;
                } else if !output.is_undefined() {
                    items.resize(*index, Value::Undefined);
                    items.push(output);
                }
            }
            (Slot::Field(key), parent) => {
                if let Some(fields) = parent.fields_mut() {
                    if !output.is_undefined() || fields.contains_key(key) {
                        fields.insert(key.clone(), output);
                    }
                }
            }
            (Slot::MapValue(index), Value::Map(entries)) => {
                if let Some(entry) = entries.get_mut(*index) {
                    entry.1 = output;
                }
            }
            (Slot::Member(index), Value::Set(members)) => {
                if let Some(member) = members.get_mut(*index) {
                    *member = output;
                }
            }
            _ => {}
        }
    }
}

/// Shared always-failing schema for unknown keys and surplus tuple slots.
pub(crate) fn never() -> Schema {
    static NEVER: OnceLock<Schema> = OnceLock::new();
    NEVER.get_or_init(|| Schema::from_kind(Kind::Never)).clone()
}

pub(crate) fn entries(schema: &Schema, value: &Value, ctx: &Context) -> Vec<Entry> {
    match schema.kind() {
        Kind::Array(Some(element)) => match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| Entry {
                    key: PathSegment::Index(index),
                    value: item.clone(),
                    schema: element.clone(),
                    slot: Slot::Element(index),
                })
                .collect(),
            _ => Vec::new(),
        },
        Kind::Tuple(elements) => match value {
            Value::Array(items) => (0..elements.len().max(items.len()))
                .map(|index| Entry {
                    key: PathSegment::Index(index),
                    value: items.get(index).cloned().unwrap_or_default(),
                    schema: elements.get(index).cloned().unwrap_or_else(never),
                    slot: Slot::Element(index),
                })
                .collect(),
            _ => Vec::new(),
        },
        Kind::Object(Some(shape)) => {
            let Some(fields) = value.fields() else {
                return Vec::new();
            };
            let declared = shape.iter().map(|(key, child)| Entry {
                key: PathSegment::from(key),
                value: value.get(key).clone(),
                schema: child.clone(),
                slot: Slot::Field(key.to_string()),
            });
            let unknown = fields
                .iter()
                .filter(|(key, _)| !shape.contains_key(key))
                .map(|(key, child)| Entry {
                    key: PathSegment::from(key.as_str()),
                    value: child.clone(),
                    schema: never(),
                    slot: Slot::Field(key.clone()),
                });
            declared.chain(unknown).collect()
        }
        Kind::Type(shape) => {
            if !value.is_object_like() {
                return Vec::new();
            }
            shape
                .iter()
                .map(|(key, child)| Entry {
                    key: PathSegment::from(key),
                    value: value.get(key).clone(),
                    schema: child.clone(),
                    slot: Slot::Field(key.to_string()),
                })
                .collect()
        }
        Kind::Record(key_schema, value_schema) => {
            let Some(fields) = value.fields() else {
                return Vec::new();
            };
            fields
                .iter()
                .flat_map(|(key, child)| {
                    [
                        Entry {
                            key: PathSegment::from(key.as_str()),
                            value: Value::String(key.clone()),
                            schema: key_schema.clone(),
                            slot: Slot::Detached,
                        },
                        Entry {
                            key: PathSegment::from(key.as_str()),
                            value: child.clone(),
                            schema: value_schema.clone(),
                            slot: Slot::Field(key.clone()),
                        },
                    ]
                })
                .collect()
        }
        Kind::Map(Some((key_schema, value_schema))) => match value {
            Value::Map(pairs) => pairs
                .iter()
                .enumerate()
                .flat_map(|(index, (key, child))| {
                    let segment = PathSegment::for_key(key);
                    [
                        Entry {
                            key: segment.clone(),
                            value: key.clone(),
                            schema: key_schema.clone(),
                            slot: Slot::Detached,
                        },
                        Entry {
                            key: segment,
                            value: child.clone(),
                            schema: value_schema.clone(),
                            slot: Slot::MapValue(index),
                        },
                    ]
                })
                .collect(),
            _ => Vec::new(),
        },
        Kind::Set(Some(element)) => match value {
            Value::Set(members) => members
                .iter()
                .enumerate()
                .map(|(index, member)| Entry {
                    key: PathSegment::for_key(member),
                    value: member.clone(),
                    schema: element.clone(),
                    slot: Slot::Member(index),
                })
                .collect(),
            _ => Vec::new(),
        },
        Kind::Intersection(members) => members
            .iter()
            .flat_map(|member| member.entries(value, ctx))
            .collect(),
        Kind::Discriminator(discriminator) => match discriminator.resolve(value) {
            Resolution::Branch(branch) => branch.merged().entries(value, ctx),
            _ => Vec::new(),
        },
        Kind::Lazy(lazy) => lazy.schema().entries(value, ctx),
        Kind::Dynamic(select) => select(value, ctx).entries(value, ctx),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{any_object, array, map, number, object, r#type, record, string, tuple};

    fn keys(schema: &Schema, value: &Value) -> Vec<String> {
        let ctx = Context::root(value);
        entries(schema, value, &ctx)
            .into_iter()
            .map(|entry| format!("{}:{}", entry.key, entry.schema.type_name()))
            .collect()
    }

    #[test]
    fn object_checks_declared_then_unknown_keys() {
        let schema = object([("b", string()), ("a", number())]);
        let value = Value::object([("a", 1), ("z", 2)]);
        assert_eq!(keys(&schema, &value), vec!["b:string", "a:number", "z:never"]);
    }

    #[test]
    fn type_ignores_unknown_keys() {
        let schema = r#type([("a", number())]);
        let value = Value::object([("a", 1), ("z", 2)]);
        assert_eq!(keys(&schema, &value), vec!["a:number"]);
    }

    #[test]
    fn absent_declared_keys_read_as_undefined() {
        let schema = object([("a", string())]);
        let value = Value::object(Vec::<(&str, Value)>::new());
        let ctx = Context::root(&value);
        let produced = entries(&schema, &value, &ctx);
        assert_eq!(produced.len(), 1);
        assert!(produced[0].value.is_undefined());
    }

    #[test]
    fn tuple_pads_to_the_longer_side() {
        let schema = tuple([string(), number()]);
        assert_eq!(
            keys(&schema, &Value::Array(vec![Value::from("a")])),
            vec!["0:string", "1:number"]
        );
        let long = Value::Array(vec![Value::from("a"), Value::from(1), Value::from(2)]);
        assert_eq!(keys(&schema, &long), vec!["0:string", "1:number", "2:never"]);
    }

    #[test]
    fn record_checks_each_key_twice() {
        let schema = record(string(), number());
        let value = Value::object([("a", 1)]);
        assert_eq!(keys(&schema, &value), vec!["a:string", "a:number"]);
    }

    #[test]
    fn map_keys_use_printable_segments() {
        let schema = map(number(), string());
        let value = Value::map([(1, "x")]);
        assert_eq!(keys(&schema, &value), vec!["1:number", "1:string"]);
    }

    #[test]
    fn schemaless_containers_yield_nothing() {
        assert!(keys(&any_object(), &Value::object([("a", 1)])).is_empty());
        assert!(keys(&array(number()), &Value::from("no")).is_empty());
    }

    #[test]
    fn field_slot_skips_undefined_for_absent_keys() {
        let mut parent = Value::object([("a", 1)]);
        Slot::Field("b".to_string()).write(&mut parent, Value::Undefined);
        assert_eq!(parent, Value::object([("a", 1)]));
        Slot::Field("a".to_string()).write(&mut parent, Value::Undefined);
        assert!(parent.fields().unwrap().contains_key("a"));
    }

    #[test]
    fn element_slot_extends_only_for_defined_output() {
        let mut parent = Value::Array(vec![]);
        Slot::Element(0).write(&mut parent, Value::Undefined);
        assert_eq!(parent, Value::Array(vec![]));
        Slot::Element(0).write(&mut parent, Value::from(1));
        assert_eq!(parent, Value::Array(vec![Value::from(1)]));
    }
}
