//! The schema node: an immutable, shareable descriptor of one constraint.

use std::fmt;
use std::sync::{Arc, OnceLock};

use structcheck_value::Value;

use crate::context::Context;
use crate::failure::{Failure, Outcome};
use crate::traversal::{self, Entry};
use crate::union::Discriminator;
use crate::{coercions, refinements, validator};

/// Custom validator or refiner hook.
pub type ValidatorFn = dyn Fn(&Value, &Context) -> Outcome + Send + Sync;
/// Custom coercion hook.
pub type CoercerFn = dyn Fn(Value, &Context) -> Value + Send + Sync;
/// Deferred schema construction for `lazy`.
pub type FactoryFn = dyn Fn() -> Schema + Send + Sync;
/// Per-value schema selection for `dynamic`.
pub type SelectorFn = dyn Fn(&Value, &Context) -> Schema + Send + Sync;

/// A compiled schema.
///
/// Cloning is cheap and clones share the same node. Schemas hold no
/// per-check state, so one schema can be used from many threads at once.
#[derive(Clone)]
pub struct Schema {
    node: Arc<Node>,
}

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) kind: Kind,
    pub(crate) optional: bool,
    pub(crate) nullable: bool,
    pub(crate) coercions: Vec<Coercion>,
    pub(crate) refinements: Vec<Refinement>,
    pub(crate) name: Option<String>,
    pub(crate) metadata: Option<serde_json::Value>,
}

#[derive(Clone)]
pub(crate) struct Coercion {
    pub(crate) condition: Schema,
    pub(crate) coercer: Arc<CoercerFn>,
}

#[derive(Clone)]
pub(crate) struct Refinement {
    pub(crate) name: String,
    pub(crate) refiner: Arc<ValidatorFn>,
}

/// Every kind of schema node, with its payload.
#[derive(Clone)]
pub enum Kind {
    Any,
    Unknown,
    Never,
    String,
    Number,
    Integer,
    Boolean,
    BigInt,
    Date,
    Literal(Value),
    Enums(Vec<Value>),
    /// Instances of the named class.
    Instance(String),
    /// Arrays; `None` accepts any elements without visiting them.
    Array(Option<Schema>),
    Tuple(Vec<Schema>),
    /// Closed objects; `None` accepts any object without visiting it.
    Object(Option<Shape>),
    /// Open objects: undeclared keys pass through unchecked.
    Type(Shape),
    Record(Schema, Schema),
    Map(Option<(Schema, Schema)>),
    Set(Option<Schema>),
    Union(Vec<Schema>),
    Intersection(Vec<Schema>),
    Discriminator(Discriminator),
    Lazy(Lazy),
    Dynamic(Arc<SelectorFn>),
    /// Custom leaf kind.
    Define {
        name: String,
        validator: Arc<ValidatorFn>,
    },
}

impl Kind {
    /// The kind tag reported in failures.
    pub fn name(&self) -> &str {
        match self {
            Kind::Any => "any",
            Kind::Unknown => "unknown",
            Kind::Never => "never",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Boolean => "boolean",
            Kind::BigInt => "bigint",
            Kind::Date => "date",
            Kind::Literal(_) => "literal",
            Kind::Enums(_) => "enums",
            Kind::Instance(_) => "instance",
            Kind::Array(_) => "array",
            Kind::Tuple(_) => "tuple",
            Kind::Object(_) => "object",
            Kind::Type(_) => "type",
            Kind::Record(..) => "record",
            Kind::Map(_) => "map",
            Kind::Set(_) => "set",
            Kind::Union(_) => "union",
            Kind::Intersection(_) => "intersection",
            Kind::Discriminator(_) => "discriminator",
            Kind::Lazy(_) => "lazy",
            Kind::Dynamic(_) => "dynamic",
            Kind::Define { name, .. } => name,
        }
    }
}

/// A schema whose construction is deferred until first use.
#[derive(Clone)]
pub struct Lazy {
    factory: Arc<FactoryFn>,
    resolved: Arc<OnceLock<Schema>>,
}

impl Lazy {
    pub(crate) fn new(factory: Arc<FactoryFn>) -> Self {
        Self {
            factory,
            resolved: Arc::new(OnceLock::new()),
        }
    }

    /// The resolved schema, built on first call.
    pub fn schema(&self) -> &Schema {
        self.resolved.get_or_init(|| (self.factory)())
    }
}

/// Ordered mapping from property name to schema.
#[derive(Clone, Default)]
pub struct Shape {
    fields: Vec<(String, Schema)>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, schema)| schema)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a field; replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, schema: Schema) {
        let key = key.into();
        match self.fields.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = schema,
            None => self.fields.push((key, schema)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Schema> {
        let index = self.fields.iter().position(|(name, _)| name == key)?;
        Some(self.fields.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn map_schemas(&self, f: impl Fn(&Schema) -> Schema) -> Shape {
        Shape {
            fields: self
                .fields
                .iter()
                .map(|(name, schema)| (name.clone(), f(schema)))
                .collect(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Schema)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, Schema)>>(iter: I) -> Self {
        let mut shape = Shape::new();
        for (key, schema) in iter {
            shape.insert(key, schema);
        }
        shape
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Schema); N]> for Shape {
    fn from(fields: [(K, Schema); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>> From<Vec<(K, Schema)>> for Shape {
    fn from(fields: Vec<(K, Schema)>) -> Self {
        fields.into_iter().collect()
    }
}

/// A bare shape used where a schema is expected is a closed `object`.
impl From<Shape> for Schema {
    fn from(shape: Shape) -> Self {
        Schema::from_kind(Kind::Object(Some(shape)))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Schema {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        Self {
            node: Arc::new(Node {
                kind,
                optional: false,
                nullable: false,
                coercions: Vec::new(),
                refinements: Vec::new(),
                name: None,
                metadata: None,
            }),
        }
    }

    pub(crate) fn node(&self) -> &Node {
        &self.node
    }

    /// A new schema whose node is a modified copy of this one.
    pub(crate) fn rebuild(&self, modify: impl FnOnce(&mut Node)) -> Schema {
        let mut node = (*self.node).clone();
        modify(&mut node);
        Schema {
            node: Arc::new(node),
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.node.kind
    }

    /// The kind tag reported in failures.
    pub fn type_name(&self) -> &str {
        self.node.kind.name()
    }

    /// True when `undefined` satisfies the schema.
    pub fn is_optional(&self) -> bool {
        self.node.optional
    }

    /// True when `null` satisfies the schema.
    pub fn is_nullable(&self) -> bool {
        self.node.nullable
    }

    /// The declared shape of `object` and `type` schemas.
    pub fn shape(&self) -> Option<&Shape> {
        match &self.node.kind {
            Kind::Object(shape) => shape.as_ref(),
            Kind::Type(shape) => Some(shape),
            _ => None,
        }
    }

    /// Names of the refinements attached to this node, in order.
    pub fn refinement_names(&self) -> impl Iterator<Item = &str> {
        self.node.refinements.iter().map(|r| r.name.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.node.name.as_deref()
    }

    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.node.metadata.as_ref()
    }

    /// Attach a name and optional metadata, e.g. for registry lookups.
    pub fn named(&self, name: impl Into<String>, metadata: Option<serde_json::Value>) -> Schema {
        let name = name.into();
        self.rebuild(|node| {
            node.name = Some(name);
            node.metadata = metadata;
        })
    }

    pub(crate) fn coerce_value(&self, value: Value, ctx: &Context) -> Value {
        coercions::apply(self, value, ctx)
    }

    pub(crate) fn validate_self(&self, value: &Value, ctx: &Context) -> Vec<Failure> {
        validator::validate(self, value, ctx)
    }

    pub(crate) fn entries(&self, value: &Value, ctx: &Context) -> Vec<Entry> {
        traversal::entries(self, value, ctx)
    }

    pub(crate) fn refine_value(&self, value: &Value, ctx: &Context) -> Vec<Failure> {
        refinements::apply(self, value, ctx)
    }

    /// Whether optional/nullable let `value` skip this node's checks.
    pub(crate) fn admits_absent(&self, value: &Value) -> bool {
        (self.node.optional && value.is_undefined()) || (self.node.nullable && value.is_null())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Schema");
        dbg.field("kind", &self.type_name());
        if let Some(name) = &self.node.name {
            dbg.field("name", name);
        }
        match &self.node.kind {
            Kind::Object(Some(shape)) | Kind::Type(shape) => {
                dbg.field("shape", shape);
            }
            Kind::Literal(value) => {
                dbg.field("literal", value);
            }
            _ => {}
        }
        dbg.field("optional", &self.node.optional)
            .field("nullable", &self.node.nullable)
            .field("refinements", &self.refinement_names().collect::<Vec<_>>())
            .finish()
    }
}
