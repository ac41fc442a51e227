//! Convergence comparison between a descriptor and observed state
//!
//! Only mutable properties that were declared, or defaulted and reported by
//! the source, are compared. Parameters and the identity are never compared
//! after creation. Fields flagged read-only
//! can still be out of sync, but the set is rejected: the field is treated
//! as converged and a [`ReadOnlyFieldWarning`] is returned instead.
//!
//! `SetByKey` equality compares only the keyed attribute of each record.
//! For block device mappings this means a changed `volume_size` on an
//! existing device is not reported as drift.

use crate::resource::{ObservedState, ResourceDescriptor};
use crate::schema::{Equality, FieldDefinition, ResourceSchema};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Non-fatal notice that a read-only field differs from observed state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOnlyFieldWarning {
    pub resource_type: String,
    pub identity: String,
    pub field: String,
    /// The value the declaration asked for
    pub attempted: Value,
}

impl fmt::Display for ReadOnlyFieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} is read-only. Cannot set to: {}",
            self.resource_type, self.identity, self.field, self.attempted
        )
    }
}

/// Outcome of comparing one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Desired equals observed
    InSync,
    /// Out of sync and the field may be updated
    Drift,
    /// Out of sync but the field is read-only; treated as converged
    ReadOnlyDrift,
}

/// Comparison result for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub desired: Value,
    pub observed: Option<Value>,
    pub disposition: Disposition,
}

impl FieldDiff {
    /// Raw in-sync verdict, before read-only handling
    pub fn in_sync(&self) -> bool {
        self.disposition == Disposition::InSync
    }
}

/// Field-by-field comparison of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDiff {
    pub resource_type: String,
    pub identity: String,
    pub fields: Vec<FieldDiff>,
    pub warnings: Vec<ReadOnlyFieldWarning>,
}

impl ResourceDiff {
    /// Compare every declared, compared field of `desired` against `observed`
    pub fn compute(
        schema: &ResourceSchema,
        desired: &ResourceDescriptor,
        observed: &ObservedState,
    ) -> Self {
        let mut fields = Vec::new();
        let mut warnings = Vec::new();

        for field in schema.fields().iter().filter(|f| f.is_compared()) {
            let Some(want) = desired.get(field.name) else {
                continue;
            };
            let have = observed.get(field.name);
            // A default the source does not report has nothing to converge against
            if have.is_none() && desired.is_defaulted(field.name) {
                continue;
            }

            let disposition = if in_sync(field, want, have) {
                Disposition::InSync
            } else if field.read_only {
                warnings.push(ReadOnlyFieldWarning {
                    resource_type: desired.type_name().to_string(),
                    identity: desired.identity().to_string(),
                    field: field.name.to_string(),
                    attempted: want.clone(),
                });
                Disposition::ReadOnlyDrift
            } else {
                Disposition::Drift
            };

            fields.push(FieldDiff {
                field: field.name.to_string(),
                desired: want.clone(),
                observed: have.cloned(),
                disposition,
            });
        }

        Self {
            resource_type: desired.type_name().to_string(),
            identity: desired.identity().to_string(),
            fields,
            warnings,
        }
    }

    /// Every compared field matches observed state
    pub fn in_sync(&self) -> bool {
        self.fields.iter().all(FieldDiff::in_sync)
    }

    /// Nothing left to change once read-only drift is set aside
    pub fn converged(&self) -> bool {
        self.fields
            .iter()
            .all(|f| f.disposition != Disposition::Drift)
    }

    /// Names of fields an update should change
    pub fn changed_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.disposition == Disposition::Drift)
            .map(|f| f.field.clone())
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDiff> {
        self.fields.iter().find(|f| f.field == name)
    }
}

/// Field-specific equality between a desired and an observed value
///
/// A field missing from observed state is out of sync.
pub fn in_sync(field: &FieldDefinition, desired: &Value, observed: Option<&Value>) -> bool {
    let Some(observed) = observed else {
        return false;
    };

    match field.equality {
        Equality::Exact => desired == observed,
        Equality::Set => as_set(desired) == as_set(observed),
        Equality::SetByKey(key) => keyed_set(desired, key) == keyed_set(observed, key),
        Equality::StringForm => desired.to_string() == observed.to_string(),
        Equality::Ignored => true,
    }
}

fn as_set(value: &Value) -> HashSet<&Value> {
    value.elements().iter().collect()
}

fn keyed_set<'a>(value: &'a Value, key: &str) -> HashSet<Option<&'a Value>> {
    value
        .elements()
        .iter()
        .map(|item| item.as_record().and_then(|r| r.get(key)))
        .collect()
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    pub in_sync: usize,
    pub drifted: usize,
    pub read_only_drifted: usize,
}

impl DiffSummary {
    /// Tally field dispositions across diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for field in diffs.iter().flat_map(|d| &d.fields) {
            match field.disposition {
                Disposition::InSync => summary.in_sync += 1,
                Disposition::Drift => summary.drifted += 1,
                Disposition::ReadOnlyDrift => summary.read_only_drifted += 1,
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.drifted > 0
    }
}
