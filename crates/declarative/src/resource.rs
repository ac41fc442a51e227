//! Resource descriptors - validated declarations
//!
//! A [`Declaration`] is the raw attribute map of one declared resource as
//! loaded from a manifest. [`ResourceDescriptor::build`] runs every field
//! through the validator and produces an immutable descriptor, or a
//! [`DeclarationError`] listing every failing field.
//!
//! Descriptors are rebuilt from declarations on every pass and carry no
//! hidden state: building the same declaration twice yields equal values.

use crate::error::{DeclarationError, ValidationError};
use crate::schema::ResourceSchema;
use crate::types::{EnsureState, Value};
use crate::validate::validate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Attribute name that carries the ensure state
pub const ENSURE: &str = "ensure";

/// Raw declared attributes for one resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Declaration {
    pub attributes: BTreeMap<String, Value>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl From<BTreeMap<String, Value>> for Declaration {
    fn from(attributes: BTreeMap<String, Value>) -> Self {
        Self { attributes }
    }
}

/// A validated, immutable resource declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    type_name: String,
    identity: String,
    ensure: EnsureState,
    fields: BTreeMap<String, Value>,
    /// Fields filled from a schema default rather than declared
    #[serde(skip)]
    defaulted: BTreeSet<String>,
}

impl ResourceDescriptor {
    /// Validate a declaration against a schema
    ///
    /// Every field is validated independently; if any fails, all failures
    /// are returned together and no descriptor is produced.
    pub fn build(
        schema: &ResourceSchema,
        declaration: &Declaration,
    ) -> Result<Self, DeclarationError> {
        let mut errors = Vec::new();
        let mut fields = BTreeMap::new();
        let mut defaulted = BTreeSet::new();

        let ensure = match declaration.get(ENSURE) {
            None => EnsureState::default(),
            Some(value) => EnsureState::parse(value).unwrap_or_else(|| {
                errors.push(ValidationError::new(
                    ENSURE,
                    format!("invalid value '{value}', expected present or absent"),
                ));
                EnsureState::default()
            }),
        };

        for name in declaration.attributes.keys() {
            if name != ENSURE && schema.field(name).is_none() {
                errors.push(ValidationError::new(
                    name.as_str(),
                    "is not a valid attribute",
                ));
            }
        }

        for field in schema.fields() {
            let candidate = match (declaration.get(field.name), &field.default) {
                (Some(declared), _) => declared,
                (None, Some(default)) => {
                    defaulted.insert(field.name.to_string());
                    default
                }
                (None, None) => continue,
            };
            match validate(field, candidate) {
                Ok(value) => {
                    fields.insert(field.name.to_string(), value);
                }
                Err(e) => errors.push(e),
            }
        }

        let identity_field = schema.identity_field();
        let identity = fields
            .get(identity_field.name)
            .map(ToString::to_string);

        if identity.is_none() && !errors.iter().any(|e| e.field == identity_field.name) {
            errors.push(ValidationError::new(
                identity_field.name,
                "a value is required",
            ));
        }

        match identity {
            Some(identity) if errors.is_empty() => Ok(Self {
                type_name: schema.type_name().to_string(),
                identity,
                ensure,
                fields,
                defaulted,
            }),
            identity => Err(DeclarationError {
                type_name: schema.type_name().to_string(),
                identity: identity.or_else(|| {
                    declaration
                        .get(identity_field.name)
                        .map(ToString::to_string)
                }),
                errors,
            }),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn ensure(&self) -> EnsureState {
        self.ensure
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The field's value came from the schema default
    pub fn is_defaulted(&self, name: &str) -> bool {
        self.defaulted.contains(name)
    }
}

/// State of a resource as reported by an observed-state source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedState {
    pub identity: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl ObservedState {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
