//! Pass runner - evaluates a batch of declarations with parallelism
//!
//! Each declaration goes through validation, observed-state fetch and
//! planning in isolation. A rejected or failed resource never affects the
//! others. Results are returned in declaration order.

use crate::context::{StateSource, WarningSink};
use crate::error::{DeclarationError, Error, FetchError, Result, ValidationError};
use crate::planner::{Action, Decision};
use crate::resource::{Declaration, ResourceDescriptor};
use crate::schema::ResourceSchema;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Options for a pass
#[derive(Debug, Clone)]
pub struct PassOptions {
    /// Number of worker threads
    pub jobs: usize,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

/// Result of evaluating one declaration
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResourceOutcome {
    /// Validated and planned
    Planned(Decision),
    /// Validation failed; nothing was fetched
    Rejected(DeclarationError),
    /// Observed state could not be fetched
    Failed { identity: String, error: FetchError },
}

impl ResourceOutcome {
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Planned(decision) => Some(decision.identity()),
            Self::Rejected(err) => err.identity.as_deref(),
            Self::Failed { identity, .. } => Some(identity),
        }
    }

    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Planned(decision) => Some(decision),
            _ => None,
        }
    }
}

/// Summary of a pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
    pub rejected: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl PassSummary {
    /// Total number of changes the executor would make
    pub fn total_changes(&self) -> usize {
        self.create + self.update + self.delete
    }

    /// No resource was rejected or failed
    pub fn is_success(&self) -> bool {
        self.rejected == 0 && self.failed == 0
    }

    /// Total number of resources evaluated
    pub fn total(&self) -> usize {
        self.total_changes() + self.no_change + self.rejected + self.failed
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &PassSummary) {
        self.create += other.create;
        self.update += other.update;
        self.delete += other.delete;
        self.no_change += other.no_change;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.warnings += other.warnings;
    }

    /// Add an outcome to the summary
    pub fn add_outcome(&mut self, outcome: &ResourceOutcome) {
        match outcome {
            ResourceOutcome::Planned(decision) => {
                self.warnings += decision.warnings.len();
                match decision.action {
                    Action::NoChange => self.no_change += 1,
                    Action::Create => self.create += 1,
                    Action::Update { .. } => self.update += 1,
                    Action::Delete => self.delete += 1,
                }
            }
            ResourceOutcome::Rejected(_) => self.rejected += 1,
            ResourceOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Everything a pass produced
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub resource_type: String,
    pub outcomes: Vec<ResourceOutcome>,
    pub summary: PassSummary,
}

/// Evaluate every declaration against observed state
///
/// Warnings are forwarded to `warnings` as they are raised and also kept on
/// each decision. Declarations sharing an identity are all rejected.
pub fn run_pass<S, W>(
    schema: &ResourceSchema,
    declarations: &[Declaration],
    source: &S,
    warnings: &W,
    opts: &PassOptions,
) -> Result<PassReport>
where
    S: StateSource + ?Sized,
    W: WarningSink + ?Sized,
{
    let duplicates = duplicate_identities(schema, declarations);
    let evaluate = |declaration: &Declaration| {
        evaluate_one(schema, declaration, &duplicates, source, warnings)
    };

    let outcomes: Vec<ResourceOutcome> = if opts.jobs <= 1 || declarations.len() <= 1 {
        declarations.iter().map(evaluate).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.jobs)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        pool.install(|| declarations.par_iter().map(evaluate).collect())
    };

    let mut summary = PassSummary::default();
    for outcome in &outcomes {
        summary.add_outcome(outcome);
    }
    log::debug!(
        "pass over {} {} declarations: {} changes, {} rejected, {} failed",
        declarations.len(),
        schema.type_name(),
        summary.total_changes(),
        summary.rejected,
        summary.failed
    );

    Ok(PassReport {
        resource_type: schema.type_name().to_string(),
        outcomes,
        summary,
    })
}

/// Validate, fetch and plan a single declaration
fn evaluate_one<S, W>(
    schema: &ResourceSchema,
    declaration: &Declaration,
    duplicates: &HashMap<String, usize>,
    source: &S,
    warnings: &W,
) -> ResourceOutcome
where
    S: StateSource + ?Sized,
    W: WarningSink + ?Sized,
{
    let descriptor = match ResourceDescriptor::build(schema, declaration) {
        Ok(descriptor) => descriptor,
        Err(err) => return ResourceOutcome::Rejected(err),
    };

    if let Some(count) = duplicates.get(descriptor.identity()) {
        return ResourceOutcome::Rejected(DeclarationError {
            type_name: schema.type_name().to_string(),
            identity: Some(descriptor.identity().to_string()),
            errors: vec![ValidationError::new(
                schema.identity_field().name,
                format!("declared {count} times in one pass"),
            )],
        });
    }

    let observed = match source.fetch_observed(schema.type_name(), descriptor.identity()) {
        Ok(observed) => Some(observed),
        Err(FetchError::NotFound(_)) => None,
        Err(error) => {
            return ResourceOutcome::Failed {
                identity: descriptor.identity().to_string(),
                error,
            };
        }
    };

    let decision = Decision::plan(schema, descriptor, observed.as_ref());
    for warning in &decision.warnings {
        warnings.warn(warning);
    }
    ResourceOutcome::Planned(decision)
}

/// Identities declared more than once, with their count
fn duplicate_identities(
    schema: &ResourceSchema,
    declarations: &[Declaration],
) -> HashMap<String, usize> {
    let key = schema.identity_field().name;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for identity in declarations.iter().filter_map(|d| d.get(key)) {
        *counts.entry(identity.to_string()).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}
