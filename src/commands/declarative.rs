//! Declarative commands
//!
//! - `validate` - Check every declaration against its schema
//! - `plan` - Compare declarations against observed state
//! - `deps` - Show the resources each declaration references

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use declarative::{
    DeclarationError, DependencyHint, LogWarnings, NoWarnings, PassOptions, PassReport,
    PassSummary, ResourceDescriptor, WarningSink, dependencies_of,
};
use serde::Serialize;
use std::path::Path;

use crate::Context;
use crate::cli::{ManifestArgs, PlanArgs};
use crate::config::{OutputFormat, Settings};
use crate::engine;
use crate::resource;
use crate::schema::Manifest;
use crate::state::{ObservedSnapshot, SnapshotSource};
use crate::ui;

// ============================================================================
// Validate
// ============================================================================

/// Validation result for one declaration
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Checked {
    Valid { resource_type: String, identity: String },
    Invalid(DeclarationError),
}

/// Validate every selected declaration in the manifest
pub fn check_manifest(manifest: &Manifest, target: Option<&str>) -> Result<Vec<Checked>> {
    let mut checked = Vec::new();
    for (type_name, declarations) in &manifest.resources {
        let schema = resource::schema_for(type_name)?;
        for decl in engine::select_declarations(&schema, declarations, target) {
            checked.push(match ResourceDescriptor::build(&schema, &decl) {
                Ok(descriptor) => Checked::Valid {
                    resource_type: type_name.clone(),
                    identity: descriptor.identity().to_string(),
                },
                Err(err) => Checked::Invalid(err),
            });
        }
    }
    Ok(checked)
}

pub fn validate(ctx: &Context, args: ManifestArgs) -> Result<()> {
    let settings = Settings::load()?;
    let format = args.format.unwrap_or(settings.format);
    let manifest = Manifest::load(&args.manifest)?;
    let checked = check_manifest(&manifest, args.target.as_deref())?;
    let invalid = checked
        .iter()
        .filter(|c| matches!(c, Checked::Invalid(_)))
        .count();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&checked)?),
        OutputFormat::Text => {
            if !ctx.quiet {
                ui::header(&format!("Validating {}", args.manifest.display()));
                if manifest.is_empty() {
                    ui::info("Manifest has no declarations");
                }
                if let Some(target) = &args.target {
                    ui::info(&format!("Only checking {}", target));
                }
            }
            for item in &checked {
                match item {
                    Checked::Valid {
                        resource_type,
                        identity,
                    } => {
                        if ctx.verbose > 0 {
                            ui::success(&format!("{}[{}]", resource_type, identity));
                        }
                    }
                    Checked::Invalid(err) => {
                        ui::error(&format!(
                            "{}[{}]",
                            err.type_name,
                            err.identity.as_deref().unwrap_or("<unnamed>")
                        ));
                        for e in &err.errors {
                            ui::dim(&format!("  {}: {}", e.field, e.reason));
                        }
                    }
                }
            }
            if !ctx.quiet {
                println!();
                ui::kv("Declarations", &checked.len().to_string());
                ui::kv("Invalid", &invalid.to_string());
            }
        }
    }

    if invalid > 0 {
        bail!("{} rejected", ui::plural(invalid, "declaration"));
    }
    if format == OutputFormat::Text && !ctx.quiet {
        println!();
        ui::success("All declarations are valid");
    }
    Ok(())
}

// ============================================================================
// Plan
// ============================================================================

#[derive(Serialize)]
struct PlanOutput<'a> {
    generated_at: DateTime<Utc>,
    observed_at: Option<DateTime<Utc>>,
    reports: &'a [PassReport],
    summary: &'a PassSummary,
}

/// Load the observed-state snapshot named on the command line or in settings
fn load_source(explicit: Option<&Path>, settings: &Settings) -> Result<Option<SnapshotSource>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings.observed_path() {
            Some(path) => path,
            None => return Ok(None),
        },
    };
    Ok(Some(ObservedSnapshot::load(&path)?.into_source()))
}

pub fn plan(ctx: &Context, args: PlanArgs) -> Result<()> {
    let settings = Settings::load()?;
    let format = args.manifest.format.unwrap_or(settings.format);
    let jobs = args.jobs.unwrap_or(settings.jobs);
    if jobs == 0 {
        bail!("--jobs must be at least 1");
    }

    let manifest = Manifest::load(&args.manifest.manifest)?;
    let source = match load_source(args.observed.as_deref(), &settings)? {
        Some(source) => source,
        None => {
            if format == OutputFormat::Text && !ctx.quiet {
                ui::warn("No observed state given; every present resource is planned for creation");
            }
            SnapshotSource::empty()
        }
    };

    // Text output already shows warnings inline with each decision
    let sink: &dyn WarningSink = match format {
        OutputFormat::Json => &LogWarnings,
        OutputFormat::Text => &NoWarnings,
    };
    let reports = engine::plan_manifest(
        &manifest,
        &source,
        sink,
        args.manifest.target.as_deref(),
        &PassOptions { jobs },
    )?;
    let summary = engine::overall_summary(&reports);

    match format {
        OutputFormat::Json => {
            let output = PlanOutput {
                generated_at: Utc::now(),
                observed_at: source.captured_at,
                reports: &reports,
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if !ctx.quiet {
                ui::header(&format!("Plan for {}", args.manifest.manifest.display()));
                if let Some(at) = source.captured_at {
                    ui::kv("Observed at", &at.to_rfc3339());
                }
            }
            engine::display_plan(&reports, &summary, ctx.verbose > 0)?;
        }
    }

    if !summary.is_success() {
        bail!(
            "{} rejected, {} failed",
            ui::plural(summary.rejected, "declaration"),
            summary.failed
        );
    }
    Ok(())
}

// ============================================================================
// Deps
// ============================================================================

/// Dependency hints of one valid declaration
#[derive(Debug, Serialize)]
pub struct ResourceHints {
    pub resource_type: String,
    pub identity: String,
    pub hints: Vec<DependencyHint>,
}

/// Hints for every valid declaration, plus the rejected ones
pub fn collect_hints(
    manifest: &Manifest,
    target: Option<&str>,
) -> Result<(Vec<ResourceHints>, Vec<DeclarationError>)> {
    let mut hints = Vec::new();
    let mut rejected = Vec::new();
    for (type_name, declarations) in &manifest.resources {
        let schema = resource::schema_for(type_name)?;
        for decl in engine::select_declarations(&schema, declarations, target) {
            match ResourceDescriptor::build(&schema, &decl) {
                Ok(descriptor) => hints.push(ResourceHints {
                    resource_type: type_name.clone(),
                    identity: descriptor.identity().to_string(),
                    hints: dependencies_of(&schema, &descriptor),
                }),
                Err(err) => rejected.push(err),
            }
        }
    }
    Ok((hints, rejected))
}

pub fn deps(ctx: &Context, args: ManifestArgs) -> Result<()> {
    let settings = Settings::load()?;
    let format = args.format.unwrap_or(settings.format);
    let manifest = Manifest::load(&args.manifest)?;
    let (hints, rejected) = collect_hints(&manifest, args.target.as_deref())?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hints)?),
        OutputFormat::Text => {
            if !ctx.quiet {
                ui::header("Dependency Hints");
            }
            let mut current_type: Option<&str> = None;
            for resource in &hints {
                if current_type != Some(resource.resource_type.as_str()) {
                    ui::section(&resource.resource_type);
                    current_type = Some(&resource.resource_type);
                }
                engine::display_hints(&resource.identity, &resource.hints);
            }
        }
    }

    for err in &rejected {
        ui::error(&err.to_string());
    }
    if !rejected.is_empty() {
        bail!("{} rejected", ui::plural(rejected.len(), "declaration"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::launch_configuration::{SECURITY_GROUP, VPC};
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[[ec2_launchconfiguration]]
name = "web"
region = "us-east-1"
security_groups = ["web-sg", "ssh-sg"]
vpc = "main"

[[ec2_launchconfiguration]]
name = "api"
security_groups = "api-sg"

[[ec2_launchconfiguration]]
name = "bad"
colour = "blue"
"#;

    fn manifest() -> Manifest {
        toml::from_str(MANIFEST).unwrap()
    }

    #[test]
    fn test_check_manifest() {
        let checked = check_manifest(&manifest(), None).unwrap();
        assert_eq!(checked.len(), 3);
        assert!(matches!(&checked[0], Checked::Valid { identity, .. } if identity == "web"));
        let Checked::Invalid(err) = &checked[2] else {
            panic!("expected bad to be rejected");
        };
        assert!(err.has_field("colour"));
    }

    #[test]
    fn test_check_manifest_target() {
        let checked = check_manifest(&manifest(), Some("ec2_launchconfiguration.api")).unwrap();
        assert_eq!(checked.len(), 1);
    }

    #[test]
    fn test_checked_json_shape() {
        let checked = check_manifest(&manifest(), Some("ec2_launchconfiguration.bad")).unwrap();
        let json = serde_json::to_value(&checked).unwrap();
        assert_eq!(json[0]["status"], "invalid");
        assert_eq!(json[0]["errors"][0]["field"], "colour");
    }

    #[test]
    fn test_collect_hints() {
        let (hints, rejected) = collect_hints(&manifest(), None).unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(hints.len(), 2);

        let web = &hints[0].hints;
        assert_eq!(web[0].kind, SECURITY_GROUP);
        assert_eq!(
            web[0].identities.iter().collect::<Vec<_>>(),
            vec!["ssh-sg", "web-sg"]
        );
        assert_eq!(web[1].kind, VPC);
        assert!(web[1].identities.contains("main"));

        let api = &hints[1].hints;
        assert_eq!(api[0].identities.len(), 1);
        assert!(api[1].identities.is_empty());
    }

    #[test]
    fn test_load_source_explicit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observed.json");
        fs::write(
            &path,
            r#"{"captured_at": "2026-10-01T12:00:00Z", "ec2_launchconfiguration": []}"#,
        )
        .unwrap();

        let source = load_source(Some(&path), &Settings::default())
            .unwrap()
            .unwrap();
        assert!(source.captured_at.is_some());
        assert!(load_source(None, &Settings::default()).unwrap().is_none());
    }
}
