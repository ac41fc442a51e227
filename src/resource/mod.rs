//! Resource types known to launchconf
//!
//! Each resource type contributes a [`ResourceSchema`]; everything else
//! (validation, comparison, planning) is done by the `declarative` core.

use anyhow::{Result, bail};
use declarative::ResourceSchema;

pub mod launch_configuration;

/// Names of all supported resource types
pub fn type_names() -> &'static [&'static str] {
    &[launch_configuration::TYPE_NAME]
}

/// Look up the schema for a resource type
pub fn schema_for(type_name: &str) -> Result<ResourceSchema> {
    match type_name {
        launch_configuration::TYPE_NAME => Ok(launch_configuration::schema()?),
        other => bail!(
            "Unknown resource type '{}' (supported: {})",
            other,
            type_names().join(", ")
        ),
    }
}
