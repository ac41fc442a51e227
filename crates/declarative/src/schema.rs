//! Field schema - the typed description of a resource type's attributes
//!
//! A [`ResourceSchema`] is an ordered list of [`FieldDefinition`] records.
//! Behavior is selected by tags ([`FieldRole`], [`ValueShape`], [`Rule`],
//! [`Equality`]) and dispatched with a `match`, so a schema is plain data
//! that can be built once and shared across threads.

use crate::error::SchemaError;
use crate::types::{FieldRole, Value, ValueShape};
use std::collections::HashSet;

/// Custom per-element check; returns the rejection reason on failure
pub type CheckFn = fn(&Value) -> Result<(), String>;

/// Validation rule applied to each element of a field
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Accepts any value
    Any,
    /// Must be a string (may be empty)
    String,
    /// Must be a non-empty string
    NonEmptyString,
    /// Must be a non-empty string without whitespace
    Token,
    /// Must be a boolean or "true"/"false"; normalized to a boolean
    Boolean,
    /// Resource-specific check
    Custom(CheckFn),
}

/// How a desired value is compared against an observed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equality {
    /// Values must be identical
    Exact,
    /// Order-insensitive comparison of elements
    Set,
    /// Order-insensitive comparison of one key of each record element;
    /// other keys are ignored
    SetByKey(&'static str),
    /// Compare the rendered string forms
    StringForm,
    /// Never compared after creation
    Ignored,
}

/// Declaration of a single attribute
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub role: FieldRole,
    pub shape: ValueShape,
    pub rule: Rule,
    pub equality: Equality,
    /// Drift is reported but never converged
    pub read_only: bool,
    pub default: Option<Value>,
    /// Resource type this field references, for dependency hints
    pub references: Option<&'static str>,
    pub doc: &'static str,
}

impl FieldDefinition {
    fn new(name: &'static str, role: FieldRole, equality: Equality) -> Self {
        Self {
            name,
            role,
            shape: ValueShape::Scalar,
            rule: Rule::Any,
            equality,
            read_only: false,
            default: None,
            references: None,
            doc: "",
        }
    }

    /// The field naming the resource
    pub fn identity(name: &'static str) -> Self {
        Self::new(name, FieldRole::IdentityKey, Equality::Exact)
    }

    /// A field compared and converged against observed state
    pub fn property(name: &'static str) -> Self {
        Self::new(name, FieldRole::MutableProperty, Equality::Exact)
    }

    /// A creation-time field that is never compared
    pub fn parameter(name: &'static str) -> Self {
        Self::new(name, FieldRole::ImmutableParameter, Equality::Ignored)
    }

    pub fn shape(mut self, shape: ValueShape) -> Self {
        self.shape = shape;
        if shape == ValueShape::UnorderedSet && self.equality == Equality::Exact {
            self.equality = Equality::Set;
        }
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    pub fn equality(mut self, equality: Equality) -> Self {
        self.equality = equality;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn references(mut self, kind: &'static str) -> Self {
        self.references = Some(kind);
        self
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }

    /// Whether the reconciler may change this field on a live resource
    pub fn is_mutable(&self) -> bool {
        self.role == FieldRole::MutableProperty && !self.read_only
    }

    /// Whether observed state is compared for this field
    pub fn is_compared(&self) -> bool {
        self.role == FieldRole::MutableProperty && self.equality != Equality::Ignored
    }
}

/// Ordered set of field definitions for one resource type
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    type_name: &'static str,
    doc: &'static str,
    fields: Vec<FieldDefinition>,
    identity: usize,
}

impl ResourceSchema {
    /// Build a schema, checking that exactly one field is the identity and
    /// that field names are unique
    pub fn new(
        type_name: &'static str,
        doc: &'static str,
        fields: Vec<FieldDefinition>,
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name) {
                return Err(SchemaError::DuplicateField {
                    type_name: type_name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }

        let identities: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.role == FieldRole::IdentityKey)
            .map(|(i, _)| i)
            .collect();

        let identity = match identities.as_slice() {
            [single] => *single,
            [] => return Err(SchemaError::MissingIdentity(type_name.to_string())),
            many => {
                return Err(SchemaError::MultipleIdentities {
                    type_name: type_name.to_string(),
                    fields: many.iter().map(|&i| fields[i].name.to_string()).collect(),
                });
            }
        };

        Ok(Self {
            type_name,
            doc,
            fields,
            identity,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn doc(&self) -> &'static str {
        self.doc
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn identity_field(&self) -> &FieldDefinition {
        &self.fields[self.identity]
    }
}
