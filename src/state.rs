//! Observed-state snapshots
//!
//! launchconf does not call a cloud API. Observed state comes from a
//! snapshot file exported by whatever inventory tool the operator uses:
//!
//! ```json
//! {
//!   "captured_at": "2026-10-01T12:00:00Z",
//!   "ec2_launchconfiguration": [
//!     { "identity": "web", "fields": { "region": "us-east-1" } }
//!   ]
//! }
//! ```
//!
//! Each pass reads the snapshot fresh. A resource missing from the snapshot
//! is reported as not found. In TOML, `captured_at` may be a native datetime
//! or a quoted RFC 3339 string; either way it needs a UTC offset.

use anyhow::Result;
use chrono::{DateTime, Utc};
use declarative::{FetchError, ObservedState, StateSource, StaticState};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::HashMap;
use std::path::Path;

use crate::config;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Observed resources grouped by resource type
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ObservedSnapshot {
    /// When the snapshot was taken
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub captured_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub resources: HashMap<String, Vec<ObservedState>>,
}

impl ObservedSnapshot {
    /// Load a snapshot from a TOML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let snapshot: Self = config::load_file(path)?;
        log::debug!(
            "Loaded {} observed resources from {}",
            snapshot.resources.values().map(Vec::len).sum::<usize>(),
            path.display()
        );
        Ok(snapshot)
    }

    /// Convert into a state source
    pub fn into_source(self) -> SnapshotSource {
        SnapshotSource {
            captured_at: self.captured_at,
            by_type: self
                .resources
                .into_iter()
                .map(|(type_name, observed)| (type_name, observed.into_iter().collect()))
                .collect(),
        }
    }
}

/// Accept an RFC 3339 string or a native TOML offset datetime
fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<toml::Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(toml::Value::String(s)) => s,
        Some(toml::Value::Datetime(dt)) => dt.to_string(),
        Some(other) => {
            return Err(de::Error::custom(format!(
                "captured_at must be a datetime, found {}",
                other.type_str()
            )));
        }
    };
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| de::Error::custom(format!("invalid captured_at '{text}': {e}")))
}

/// State source backed by a snapshot, keyed by resource type
#[derive(Debug, Default)]
pub struct SnapshotSource {
    pub captured_at: Option<DateTime<Utc>>,
    by_type: HashMap<String, StaticState>,
}

impl SnapshotSource {
    /// A source where every resource is absent
    pub fn empty() -> Self {
        Self::default()
    }
}

impl StateSource for SnapshotSource {
    fn fetch_observed(
        &self,
        resource_type: &str,
        identity: &str,
    ) -> std::result::Result<ObservedState, FetchError> {
        match self.by_type.get(resource_type) {
            Some(state) => state.fetch_observed(resource_type, identity),
            None => Err(FetchError::NotFound(identity.to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
