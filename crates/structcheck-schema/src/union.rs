//! Union resolution: `union`, `intersection` and `discriminator`.

use structcheck_value::Value;
use tracing::trace;

use crate::check::run;
use crate::context::Context;
use crate::error::{Result, SchemaError};
use crate::failure::Failure;
use crate::schema::{Kind, Schema};
use crate::types::literal;

/// Values matching at least one candidate.
///
/// An empty union matches nothing.
pub fn union(candidates: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::from_kind(Kind::Union(candidates.into_iter().collect()))
}

/// Values matching every member.
pub fn intersection(members: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::from_kind(Kind::Intersection(members.into_iter().collect()))
}

/// Every candidate is checked in full. On a total miss the aggregate failure
/// comes first, followed by each candidate's failures in candidate order.
pub(crate) fn validate_union(candidates: &[Schema], value: &Value, ctx: &Context) -> Vec<Failure> {
    let mut failures = Vec::new();
    for candidate in candidates {
        let mut scoped = ctx.clone();
        let mut attempt = Vec::new();
        run(value.clone(), candidate, &mut scoped, false, &mut attempt);
        if attempt.is_empty() {
            trace!(kind = candidate.type_name(), "union candidate matched");
            return Vec::new();
        }
        failures.extend(attempt);
    }

    let description = candidates
        .iter()
        .map(Schema::type_name)
        .collect::<Vec<_>>()
        .join(" | ");
    let aggregate = Failure::at(
        ctx,
        value,
        "union",
        None,
        format!("Expected the value to satisfy a union of `{description}`, but received: {value}"),
    );

    let mut out = Vec::with_capacity(failures.len() + 1);
    out.push(aggregate);
    out.extend(failures);
    out
}

/// A tagged union keyed by one string property.
#[derive(Clone)]
pub struct Discriminator {
    field: String,
    branches: Vec<Branch>,
}

/// One tag of a discriminator.
#[derive(Clone)]
pub struct Branch {
    tag: String,
    schema: Schema,
    merged: Schema,
}

impl Branch {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The branch schema as declared.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The branch schema with the tag property required as a literal.
    pub fn merged(&self) -> &Schema {
        &self.merged
    }
}

/// Outcome of looking up the branch for a value.
pub(crate) enum Resolution<'a> {
    Branch(&'a Branch),
    NotObject,
    Missing,
    NotString(&'a Value),
    Unknown(&'a str),
}

impl Discriminator {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().map(Branch::tag)
    }

    /// The declared branch for `tag`.
    pub fn branch(&self, tag: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.tag == tag)
    }

    pub(crate) fn resolve<'a>(&'a self, value: &'a Value) -> Resolution<'a> {
        let Some(fields) = value.fields() else {
            return Resolution::NotObject;
        };
        match fields.get(&self.field) {
            None | Some(Value::Undefined) => Resolution::Missing,
            Some(Value::String(tag)) => match self.branch(tag) {
                Some(branch) => Resolution::Branch(branch),
                None => Resolution::Unknown(tag),
            },
            Some(other) => Resolution::NotString(other),
        }
    }

    /// The merged schema of the branch `value` selects.
    pub(crate) fn merged_for(&self, value: &Value) -> Option<Schema> {
        match self.resolve(value) {
            Resolution::Branch(branch) => Some(branch.merged.clone()),
            _ => None,
        }
    }

    pub(crate) fn validate(&self, value: &Value, ctx: &Context) -> Vec<Failure> {
        let field = &self.field;
        let message = match self.resolve(value) {
            Resolution::Branch(branch) => {
                trace!(field = %field, tag = %branch.tag, "discriminator branch selected");
                return branch.merged.validate_self(value, ctx);
            }
            Resolution::NotObject => format!("Expected an object, but received: {value}"),
            Resolution::Missing => format!(
                "Expected property `{field}` to be a string (one of {}), but the property is missing",
                self.allowed()
            ),
            Resolution::NotString(tag) => format!(
                "Expected property `{field}` to be a string (one of {}), but received: {tag}",
                self.allowed()
            ),
            Resolution::Unknown(tag) => format!(
                "Expected property `{field}` to be one of {}, but received: {}",
                self.allowed(),
                Value::from(tag)
            ),
        };
        vec![Failure::at(ctx, value, "discriminator", None, message)]
    }

    fn allowed(&self) -> String {
        self.tags()
            .map(|tag| Value::from(tag).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Rewrites every branch, re-deriving the merged schemas.
    pub(crate) fn map_branches(
        &self,
        f: impl Fn(&Schema) -> Result<Schema>,
    ) -> Result<Discriminator> {
        let mut branches = Vec::with_capacity(self.branches.len());
        for branch in &self.branches {
            let schema = f(&branch.schema)?;
            let merged = merge_tag(&self.field, &branch.tag, &schema)?;
            branches.push(Branch {
                tag: branch.tag.clone(),
                schema,
                merged,
            });
        }
        Ok(Discriminator {
            field: self.field.clone(),
            branches,
        })
    }
}

/// Select a branch schema by the string value of `field`.
///
/// Each branch must be an `object`, `type` or nested `discriminator` schema
/// that does not itself declare `field`. The branch is merged with a
/// required literal `field` once, here, keeping its openness, flags,
/// coercions and refinements.
pub fn discriminator<K, I>(field: impl Into<String>, mapping: I) -> Result<Schema>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    let field = field.into();
    let mut branches: Vec<Branch> = Vec::new();

    for (tag, schema) in mapping {
        let tag = tag.into();
        if branches.iter().any(|branch| branch.tag == tag) {
            return Err(SchemaError::InvalidDiscriminator {
                field,
                reason: format!("duplicate tag \"{tag}\""),
            });
        }
        let merged = merge_tag(&field, &tag, &schema)?;
        branches.push(Branch {
            tag,
            schema,
            merged,
        });
    }

    if branches.is_empty() {
        return Err(SchemaError::InvalidDiscriminator {
            field,
            reason: "mapping is empty".to_string(),
        });
    }

    Ok(Schema::from_kind(Kind::Discriminator(Discriminator {
        field,
        branches,
    })))
}

fn merge_tag(field: &str, tag: &str, branch: &Schema) -> Result<Schema> {
    let invalid = |reason: String| SchemaError::InvalidDiscriminator {
        field: field.to_string(),
        reason,
    };

    let kind = match branch.kind() {
        Kind::Object(Some(shape)) | Kind::Type(shape) => {
            if shape.contains_key(field) {
                return Err(invalid(format!(
                    "branch \"{tag}\" already declares the discriminator field"
                )));
            }
            let mut shape = shape.clone();
            shape.insert(field, literal(tag));
            match branch.kind() {
                Kind::Type(_) => Kind::Type(shape),
                _ => Kind::Object(Some(shape)),
            }
        }
        Kind::Discriminator(inner) => {
            if inner.field == field {
                return Err(invalid(format!(
                    "branch \"{tag}\" is discriminated by the same field"
                )));
            }
            let mut branches = Vec::with_capacity(inner.branches.len());
            for nested in &inner.branches {
                let schema = merge_tag(field, tag, &nested.schema)?;
                let merged = merge_tag(&inner.field, &nested.tag, &schema)?;
                branches.push(Branch {
                    tag: nested.tag.clone(),
                    schema,
                    merged,
                });
            }
            Kind::Discriminator(Discriminator {
                field: inner.field.clone(),
                branches,
            })
        }
        other => {
            return Err(invalid(format!(
                "branch \"{tag}\" is a `{}` schema, not an object, type or discriminator",
                other.name()
            )));
        }
    };

    Ok(branch.rebuild(|node| node.kind = kind))
}
