//! Manifest planner - runs one pass per resource type

use anyhow::{Context as AnyhowContext, Result};
use declarative::{
    Declaration, PassOptions, PassReport, PassSummary, ResourceSchema, StateSource, WarningSink,
    matches_target, run_pass,
};

use crate::resource;
use crate::schema::Manifest;

/// Plan every resource type in the manifest, in type-name order
///
/// Types with no declarations matching `target` are skipped entirely.
pub fn plan_manifest<S, W>(
    manifest: &Manifest,
    source: &S,
    warnings: &W,
    target: Option<&str>,
    opts: &PassOptions,
) -> Result<Vec<PassReport>>
where
    S: StateSource + ?Sized,
    W: WarningSink + ?Sized,
{
    let mut reports = Vec::new();
    for (type_name, declarations) in &manifest.resources {
        let schema = resource::schema_for(type_name)?;
        let selected = select_declarations(&schema, declarations, target);
        if selected.is_empty() {
            log::debug!("No {} declarations match the target", type_name);
            continue;
        }

        log::info!(
            "Planning {} {} declarations with {} jobs",
            selected.len(),
            type_name,
            opts.jobs
        );
        let report = run_pass(&schema, &selected, source, warnings, opts)
            .with_context(|| format!("Pass over {} failed", type_name))?;
        reports.push(report);
    }
    Ok(reports)
}

/// Declarations whose type and identity match the target
///
/// A declaration without an identity only matches a type-level target; it is
/// kept so validation can report the missing name.
pub fn select_declarations(
    schema: &ResourceSchema,
    declarations: &[Declaration],
    target: Option<&str>,
) -> Vec<Declaration> {
    let key = schema.identity_field().name;
    declarations
        .iter()
        .filter(|decl| {
            let identity = decl.get(key).map(ToString::to_string).unwrap_or_default();
            matches_target(schema.type_name(), &identity, target)
        })
        .cloned()
        .collect()
}

/// Combined summary across all reports
pub fn overall_summary(reports: &[PassReport]) -> PassSummary {
    let mut summary = PassSummary::default();
    for report in reports {
        summary.merge(&report.summary);
    }
    summary
}
