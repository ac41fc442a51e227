//! Provider traits for the collaborators around the core
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific cloud API, executor or output channel.

use crate::diff::ReadOnlyFieldWarning;
use crate::error::FetchError;
use crate::resource::{ObservedState, ResourceDescriptor};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Mutex;

/// Source of observed state, typically a cloud API client
///
/// Called concurrently from pass workers, so implementations must be
/// `Sync`.
pub trait StateSource: Send + Sync {
    /// Fetch the live state of `identity` within `resource_type`
    ///
    /// Return [`FetchError::NotFound`] when the resource does not exist.
    fn fetch_observed(
        &self,
        resource_type: &str,
        identity: &str,
    ) -> std::result::Result<ObservedState, FetchError>;
}

/// In-memory state source keyed by identity
#[derive(Debug, Default, Clone)]
pub struct StaticState {
    resources: HashMap<String, ObservedState>,
}

impl StaticState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, observed: ObservedState) {
        self.resources.insert(observed.identity.clone(), observed);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<ObservedState> for StaticState {
    fn from_iter<I: IntoIterator<Item = ObservedState>>(iter: I) -> Self {
        let mut state = Self::new();
        for observed in iter {
            state.insert(observed);
        }
        state
    }
}

impl StateSource for StaticState {
    fn fetch_observed(
        &self,
        _resource_type: &str,
        identity: &str,
    ) -> std::result::Result<ObservedState, FetchError> {
        self.resources
            .get(identity)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(identity.to_string()))
    }
}

/// Channel for non-fatal warnings
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: &ReadOnlyFieldWarning);
}

/// Discards warnings; they remain available on each decision
pub struct NoWarnings;

impl WarningSink for NoWarnings {
    fn warn(&self, _warning: &ReadOnlyFieldWarning) {}
}

/// Forwards warnings to the `log` facade at warn level
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn warn(&self, warning: &ReadOnlyFieldWarning) {
        log::warn!("{warning}");
    }
}

/// Collects warnings in memory
#[derive(Default)]
pub struct CollectWarnings {
    warnings: Mutex<Vec<ReadOnlyFieldWarning>>,
}

impl CollectWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything collected so far
    pub fn take(&self) -> Vec<ReadOnlyFieldWarning> {
        match self.warnings.lock() {
            Ok(mut warnings) => std::mem::take(&mut *warnings),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl WarningSink for CollectWarnings {
    fn warn(&self, warning: &ReadOnlyFieldWarning) {
        let mut warnings = match self.warnings.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        warnings.push(warning.clone());
    }
}

/// Executor of decisions
///
/// Implemented by the external collaborator that talks to the cloud API.
/// Operations against the same identity must be serialized by the
/// implementation.
pub trait Executor: Send + Sync {
    fn create(&self, descriptor: &ResourceDescriptor) -> Result<()>;

    fn update(&self, descriptor: &ResourceDescriptor, changed_fields: &[String]) -> Result<()>;

    fn delete(&self, identity: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn warning(field: &str) -> ReadOnlyFieldWarning {
        ReadOnlyFieldWarning {
            resource_type: "widget".into(),
            identity: "w1".into(),
            field: field.into(),
            attempted: Value::Bool(false),
        }
    }

    #[test]
    fn test_static_state_lookup() {
        let state: StaticState = [ObservedState::new("a"), ObservedState::new("b")]
            .into_iter()
            .collect();
        assert_eq!(state.len(), 2);
        assert_eq!(state.fetch_observed("widget", "a").unwrap().identity, "a");
        assert_eq!(
            state.fetch_observed("widget", "c").unwrap_err(),
            FetchError::NotFound("c".into())
        );
    }

    #[test]
    fn test_collect_warnings() {
        let sink = CollectWarnings::new();
        sink.warn(&warning("a"));
        sink.warn(&warning("b"));

        let taken = sink.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].field, "b");
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_noop_sinks() {
        NoWarnings.warn(&warning("a"));
        LogWarnings.warn(&warning("a"));
    }
}
