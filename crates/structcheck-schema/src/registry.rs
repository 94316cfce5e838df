use std::collections::HashMap;

use structcheck_value::Value;
use tracing::debug;

use crate::api::validate;
use crate::config::{RegistryConfig, ValidateOptions};
use crate::error::{Result, SchemaError};
use crate::schema::{Kind, Schema};

/// Name-keyed registry of compiled schemas.
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    /// Register a schema under `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, schema: &Schema) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SchemaError::InvalidName(format!("{name:?}")));
        }

        let schema = if self.config.strict_mode {
            close(schema)?
        } else {
            schema.clone()
        };

        debug!(
            name,
            kind = schema.type_name(),
            strict = self.config.strict_mode,
            "schema registered"
        );
        self.schemas.insert(name.to_string(), schema);
        Ok(())
    }

    /// Register a schema under the name attached with [`Schema::named`].
    pub fn register_named(&mut self, schema: &Schema) -> Result<()> {
        let name = schema
            .name()
            .ok_or_else(|| SchemaError::InvalidName("schema has no name".to_string()))?;
        self.register(name, schema)
    }

    /// Build a registry from `(name, schema)` pairs.
    pub fn from_schemas(schemas: &[(&str, Schema)]) -> Result<Self> {
        Self::from_schemas_with_config(schemas, RegistryConfig::default())
    }

    /// Build a registry from `(name, schema)` pairs with explicit config.
    pub fn from_schemas_with_config(
        schemas: &[(&str, Schema)],
        config: RegistryConfig,
    ) -> Result<Self> {
        let mut registry = Self::with_config(config);
        for (name, schema) in schemas {
            registry.register(name, schema)?;
        }
        Ok(registry)
    }

    /// Validate `value` against the schema registered under `name`.
    ///
    /// Returns the coerced value when the registry coerces. Unknown names
    /// pass the value through unless `fail_on_missing_schema` is set.
    pub fn validate(&self, name: &str, value: Value) -> Result<Value> {
        match self.schemas.get(name) {
            Some(schema) => {
                let options = ValidateOptions {
                    coerce: self.config.coerce,
                };
                validate(value, schema, options).map_err(|source| SchemaError::ValidationFailed {
                    name: name.to_string(),
                    source,
                })
            }
            None if self.config.fail_on_missing_schema => {
                Err(SchemaError::NoSchema(name.to_string()))
            }
            None => Ok(value),
        }
    }

    /// Check if a name has a registered schema.
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// The schema registered under `name`, after strict-mode rewriting.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite every reachable `type` into a closed `object`.
///
/// `lazy` and `dynamic` nodes produce their schemas at check time and are
/// left as they are.
fn close(schema: &Schema) -> Result<Schema> {
    let kind = match schema.kind() {
        Kind::Type(shape) | Kind::Object(Some(shape)) => {
            let mut closed = shape.clone();
            for (key, child) in shape.iter() {
                closed.insert(key, close(child)?);
            }
            Kind::Object(Some(closed))
        }
        Kind::Array(Some(element)) => Kind::Array(Some(close(element)?)),
        Kind::Tuple(elements) => Kind::Tuple(close_all(elements)?),
        Kind::Record(key, value) => Kind::Record(close(key)?, close(value)?),
        Kind::Map(Some((key, value))) => Kind::Map(Some((close(key)?, close(value)?))),
        Kind::Set(Some(element)) => Kind::Set(Some(close(element)?)),
        Kind::Union(candidates) => Kind::Union(close_all(candidates)?),
        Kind::Intersection(members) => Kind::Intersection(close_all(members)?),
        Kind::Discriminator(discriminator) => {
            Kind::Discriminator(discriminator.map_branches(close)?)
        }
        _ => return Ok(schema.clone()),
    };
    Ok(schema.rebuild(|node| node.kind = kind))
}

fn close_all(schemas: &[Schema]) -> Result<Vec<Schema>> {
    schemas.iter().map(close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{array, number, object, r#type, string};
    use crate::union::discriminator;

    fn user() -> Schema {
        r#type([("id", number()), ("name", string())])
    }

    #[test]
    fn register_and_validate() {
        let mut registry = SchemaRegistry::new();
        registry.register("user", &user()).unwrap();

        assert!(registry
            .validate("user", Value::object([("id", Value::from(1)), ("name", Value::from("ok"))]))
            .is_ok());
        assert!(matches!(
            registry.validate("user", Value::object([("id", "x")])),
            Err(SchemaError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn multiple_names_independent_validation() {
        let registry = SchemaRegistry::from_schemas(&[
            ("a", object([("a", number())])),
            ("b", object([("b", string())])),
            ("c", array(number())),
        ])
        .unwrap();

        assert!(registry.validate("a", Value::object([("a", 7)])).is_ok());
        assert!(registry.validate("b", Value::object([("b", "v")])).is_ok());
        assert!(registry.validate("c", Value::Array(vec![Value::from(1)])).is_ok());

        assert!(registry.validate("a", Value::object([("a", "x")])).is_err());
        assert!(registry.validate("b", Value::object([("b", 10)])).is_err());
        assert!(registry.validate("c", Value::Array(vec![Value::from(true)])).is_err());
    }

    #[test]
    fn missing_schema_permissive_passes() {
        let registry = SchemaRegistry::new();
        let value = Value::object([("any", "thing")]);
        assert_eq!(registry.validate("nope", value.clone()).unwrap(), value);
    }

    #[test]
    fn missing_schema_strict_fails() {
        let registry = SchemaRegistry::with_config(RegistryConfig {
            fail_on_missing_schema: true,
            ..RegistryConfig::default()
        });
        assert!(matches!(
            registry.validate("nope", Value::Null),
            Err(SchemaError::NoSchema(name)) if name == "nope"
        ));
    }

    #[test]
    fn strict_mode_rejects_additional_properties() {
        let payload = Value::object([
            ("id", Value::from(1)),
            ("name", Value::from("ok")),
            ("extra", Value::from(true)),
        ]);

        let permissive = SchemaRegistry::from_schemas(&[("user", user())]).unwrap();
        assert!(permissive.validate("user", payload.clone()).is_ok());

        let strict = SchemaRegistry::from_schemas_with_config(
            &[("user", user())],
            RegistryConfig {
                strict_mode: true,
                ..RegistryConfig::default()
            },
        )
        .unwrap();
        assert!(matches!(
            strict.validate("user", payload),
            Err(SchemaError::ValidationFailed { .. })
        ));
        assert_eq!(strict.get("user").unwrap().type_name(), "object");
    }

    #[test]
    fn strict_mode_reaches_discriminator_branches() {
        let schema = discriminator("kind", [("a", r#type([("x", number())]))]).unwrap();
        let mut strict = SchemaRegistry::with_config(RegistryConfig {
            strict_mode: true,
            ..RegistryConfig::default()
        });
        strict.register("tagged", &schema).unwrap();

        let value = Value::object([
            ("kind", Value::from("a")),
            ("x", Value::from(1)),
            ("y", Value::from(2)),
        ]);
        assert!(strict.validate("tagged", value).is_err());
    }

    #[test]
    fn registry_coerces_by_default() {
        let registry =
            SchemaRegistry::from_schemas(&[("when", object([("at", crate::types::date())]))])
                .unwrap();
        let output = registry
            .validate("when", Value::object([("at", "2024-01-15")]))
            .unwrap();
        assert!(matches!(output.get("at"), Value::Date(_)));
    }

    #[test]
    fn names_are_validated_and_sorted() {
        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register(" ", &user()),
            Err(SchemaError::InvalidName(_))
        ));
        registry.register_named(&user().named("user", None)).unwrap();
        registry.register("account", &user()).unwrap();
        assert!(registry.register_named(&user()).is_err());

        assert!(registry.has_schema("user"));
        assert_eq!(registry.names(), vec!["account", "user"]);
        assert!(registry.config().coerce);
    }
}
