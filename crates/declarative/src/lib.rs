//! # Declarative
//!
//! A core for declarative resource reconciliation.
//!
//! This crate validates declared resources against a typed schema, compares
//! them with observed state and decides what an external executor should
//! do. It never talks to a cloud API itself.
//!
//! ## Core Concepts
//!
//! - **ResourceSchema**: Ordered [`FieldDefinition`]s with role, shape, rule and equality
//! - **ResourceDescriptor**: A validated declaration, rebuilt on every pass
//! - **ResourceDiff**: Per-field comparison, with read-only drift turned into warnings
//! - **Decision**: Create, update, delete or no change, plus warnings
//! - **DependencyHint**: Advisory references to resources that should converge first
//!
//! ## Example
//!
//! ```
//! use declarative::{
//!     Action, Declaration, Decision, FieldDefinition, ObservedState, ResourceDescriptor,
//!     ResourceSchema, Rule,
//! };
//!
//! let schema = ResourceSchema::new(
//!     "bucket",
//!     "A storage bucket",
//!     vec![
//!         FieldDefinition::identity("name").rule(Rule::NonEmptyString),
//!         FieldDefinition::property("region").rule(Rule::Token),
//!     ],
//! )?;
//!
//! let declaration = Declaration::new()
//!     .with("name", "logs")
//!     .with("region", "eu-west-1");
//! let desired = ResourceDescriptor::build(&schema, &declaration)?;
//!
//! let observed = ObservedState::new("logs").with("region", "us-east-1");
//! let decision = Decision::plan(&schema, desired, Some(&observed));
//! assert_eq!(
//!     decision.action,
//!     Action::Update { changed_fields: vec!["region".into()] }
//! );
//! # Ok::<(), declarative::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`StateSource`]: Fetches observed state, or reports not found
//! - [`WarningSink`]: Receives non-fatal read-only warnings
//! - [`Executor`]: Carries out decisions
//!
//! A pass over many declarations runs in parallel with [`run_pass`].

pub mod context;
pub mod deps;
pub mod diff;
pub mod error;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod schema;
pub mod types;
pub mod validate;

// Re-export main types at crate root
pub use context::{
    CollectWarnings, Executor, LogWarnings, NoWarnings, StateSource, StaticState, WarningSink,
};
pub use deps::{DependencyHint, dependencies_of};
pub use diff::{DiffSummary, Disposition, FieldDiff, ReadOnlyFieldWarning, ResourceDiff, in_sync};
pub use error::{DeclarationError, Error, FetchError, Result, SchemaError, ValidationError};
pub use executor::{PassOptions, PassReport, PassSummary, ResourceOutcome, run_pass};
pub use planner::{Action, Decision, matches_target, parse_target};
pub use resource::{Declaration, ENSURE, ObservedState, ResourceDescriptor};
pub use schema::{CheckFn, Equality, FieldDefinition, ResourceSchema, Rule};
pub use types::{EnsureState, FieldRole, Value, ValueShape};
pub use validate::validate;
