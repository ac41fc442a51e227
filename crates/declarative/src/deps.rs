//! Dependency hints
//!
//! Fields that reference other resources (security groups, a VPC) produce
//! advisory edges for the external executor's ordering stage. Hints carry no
//! ordering logic themselves and are recomputed on every pass.

use crate::resource::ResourceDescriptor;
use crate::schema::ResourceSchema;
use serde::Serialize;
use std::collections::BTreeSet;

/// References from one resource to resources of another type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyHint {
    /// Target resource type
    pub kind: String,
    /// Referenced identities; empty when the field was not declared
    pub identities: BTreeSet<String>,
}

/// Derive one hint per referencing field, in schema order
///
/// A scalar value yields a one-element set. A referencing field that was
/// not declared yields a hint with no identities.
pub fn dependencies_of(schema: &ResourceSchema, desired: &ResourceDescriptor) -> Vec<DependencyHint> {
    schema
        .fields()
        .iter()
        .filter_map(|field| {
            let kind = field.references?;
            let identities = desired
                .get(field.name)
                .map(|value| value.elements().iter().map(ToString::to_string).collect())
                .unwrap_or_default();
            Some(DependencyHint {
                kind: kind.to_string(),
                identities,
            })
        })
        .collect()
}
