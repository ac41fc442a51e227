//! Error types for declarative reconciliation
//!
//! Validation failures are isolated per resource: a [`DeclarationError`]
//! rejects one declaration and never the whole pass. Read-only drift is
//! not an error at all, see [`crate::diff::ReadOnlyFieldWarning`].

use serde::Serialize;
use thiserror::Error;

/// A single field that failed its rule
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Field name as declared
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A declaration rejected because one or more fields failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("invalid {type_name} '{}': {}", .identity.as_deref().unwrap_or("<unnamed>"), join_errors(.errors))]
pub struct DeclarationError {
    pub type_name: String,
    /// Identity, when it could be read from the declaration
    pub identity: Option<String>,
    /// Every failing field, in schema order
    pub errors: Vec<ValidationError>,
}

impl DeclarationError {
    /// Check whether a given field is among the failures
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A resource schema that violates its own structural invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No field has the identity role
    #[error("resource type '{0}' has no identity field")]
    MissingIdentity(String),

    /// More than one field has the identity role
    #[error("resource type '{type_name}' has several identity fields: {}", .fields.join(", "))]
    MultipleIdentities {
        type_name: String,
        fields: Vec<String>,
    },

    /// The same field name was declared twice
    #[error("resource type '{type_name}' declares field '{field}' twice")]
    DuplicateField { type_name: String, field: String },
}

/// Failure reported by an observed-state source
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchError {
    /// The resource does not exist; planning takes the create path
    #[error("{0} not found")]
    NotFound(String),

    /// Any other failure (unreachable API, malformed response)
    #[error("failed to fetch {identity}: {message}")]
    Unavailable { identity: String, message: String },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors surfaced by the declarative crate
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Worker pool for a pass could not be built
    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for declarative operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_error_display() {
        let err = DeclarationError {
            type_name: "ec2_launchconfiguration".into(),
            identity: Some("web".into()),
            errors: vec![
                ValidationError::new("region", "region should not be blank"),
                ValidationError::new("image_id", "image_id should not contain spaces"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "invalid ec2_launchconfiguration 'web': region: region should not be blank; \
             image_id: image_id should not contain spaces"
        );
        assert!(err.has_field("region"));
        assert!(!err.has_field("vpc"));
    }

    #[test]
    fn test_unnamed_declaration_error() {
        let err = DeclarationError {
            type_name: "t".into(),
            identity: None,
            errors: vec![ValidationError::new("name", "a value is required")],
        };
        assert!(err.to_string().contains("<unnamed>"));
    }

    #[test]
    fn test_fetch_error_not_found() {
        assert!(FetchError::NotFound("web".into()).is_not_found());
        assert!(
            !FetchError::Unavailable {
                identity: "web".into(),
                message: "timeout".into()
            }
            .is_not_found()
        );
    }
}
