//! Manifest file format
//!
//! A manifest maps resource type names to lists of declarations:
//!
//! ```toml
//! [[ec2_launchconfiguration]]
//! name = "web"
//! region = "us-east-1"
//! security_groups = ["web-sg"]
//!
//! [[ec2_launchconfiguration.block_device_mappings]]
//! device_name = "/dev/sda1"
//! volume_size = 8
//! ```

use anyhow::{Context, Result};
use declarative::Declaration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config;
use crate::resource;

/// Declarations grouped by resource type
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub resources: BTreeMap<String, Vec<Declaration>>,
}

impl Manifest {
    /// Load a manifest from a TOML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let manifest: Self = config::load_file(path)?;
        manifest
            .validate()
            .with_context(|| format!("Invalid manifest {}", path.display()))?;
        log::debug!(
            "Loaded {} declarations from {}",
            manifest.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Check that every resource type is known
    pub fn validate(&self) -> Result<()> {
        for type_name in self.resources.keys() {
            resource::schema_for(type_name)?;
        }
        Ok(())
    }

    /// Declarations for one resource type
    pub fn declarations(&self, type_name: &str) -> &[Declaration] {
        self.resources.get(type_name).map_or(&[], Vec::as_slice)
    }

    /// Total number of declarations
    pub fn len(&self) -> usize {
        self.resources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Value;
    use std::fs;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"
[[ec2_launchconfiguration]]
name = "web"
region = "us-east-1"
instance_type = "t3.micro"
image_id = "ami-123456"
security_groups = ["web-sg", "ssh-sg"]
vpc = "main"

[[ec2_launchconfiguration.block_device_mappings]]
device_name = "/dev/sda1"
volume_size = 8

[[ec2_launchconfiguration]]
name = "worker"
ensure = "absent"
"#;

    #[test]
    fn test_parse_example_manifest() {
        let manifest: Manifest = toml::from_str(EXAMPLE).expect("Failed to parse manifest");
        manifest.validate().unwrap();
        assert_eq!(manifest.len(), 2);

        let decls = manifest.declarations("ec2_launchconfiguration");
        assert_eq!(decls[0].get("name"), Some(&Value::from("web")));
        assert_eq!(
            decls[0].get("security_groups"),
            Some(&Value::from(vec!["web-sg", "ssh-sg"]))
        );
        let devices = decls[0].get("block_device_mappings").unwrap();
        assert_eq!(devices.elements().len(), 1);
        assert_eq!(
            devices.elements()[0].as_record().unwrap()["volume_size"],
            Value::Integer(8)
        );
        assert_eq!(decls[1].get("ensure"), Some(&Value::from("absent")));
    }

    #[test]
    fn test_unknown_resource_type() {
        let manifest: Manifest = toml::from_str(
            r#"
[[ec2_instance]]
name = "x"
"#,
        )
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn test_load_json_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.json");
        fs::write(
            &path,
            r#"{"ec2_launchconfiguration": [{"name": "api", "region": "eu-west-1"}]}"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.declarations("ec2_launchconfiguration").len(), 1);
        assert!(manifest.declarations("missing").is_empty());
    }
}
