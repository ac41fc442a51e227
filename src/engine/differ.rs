//! Plan display - launchconf-specific UI

use anyhow::{Result, anyhow};
use colored::Colorize;
use declarative::{
    Decision, DependencyHint, DiffSummary, Executor, PassReport, PassSummary, ResourceDescriptor,
    ResourceDiff, ResourceOutcome,
};
use std::sync::Mutex;

use crate::ui;

const VALUE_WIDTH: usize = 40;

/// Renders the action a decision would take instead of performing it
struct PlanPrinter<'a> {
    diff: Option<&'a ResourceDiff>,
    lines: Mutex<Vec<String>>,
}

impl<'a> PlanPrinter<'a> {
    fn new(diff: Option<&'a ResourceDiff>) -> Self {
        Self {
            diff,
            lines: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, line: String) -> Result<()> {
        self.lines
            .lock()
            .map_err(|_| anyhow!("plan output lock poisoned"))?
            .push(line);
        Ok(())
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Executor for PlanPrinter<'_> {
    fn create(&self, descriptor: &ResourceDescriptor) -> Result<()> {
        self.push(format!(
            "  {} {:<30} {}",
            "+".green(),
            descriptor.identity(),
            "(not found, will create)".dimmed()
        ))?;
        for (name, value) in descriptor.fields() {
            self.push(format!(
                "      {} = {}",
                name.dimmed(),
                ui::truncate_value(&value.to_string(), VALUE_WIDTH)
            ))?;
        }
        Ok(())
    }

    fn update(&self, descriptor: &ResourceDescriptor, changed_fields: &[String]) -> Result<()> {
        self.push(format!(
            "  {} {:<30} {}",
            "~".yellow(),
            descriptor.identity(),
            format!("({})", ui::plural(changed_fields.len(), "change")).dimmed()
        ))?;
        for name in changed_fields {
            let field = self.diff.and_then(|diff| diff.field(name));
            let observed = field
                .and_then(|f| f.observed.as_ref())
                .map_or_else(|| "(unset)".to_string(), ToString::to_string);
            let desired = field
                .map(|f| f.desired.to_string())
                .or_else(|| descriptor.get(name).map(ToString::to_string))
                .unwrap_or_default();
            self.push(format!(
                "      {}: {} → {}",
                name,
                ui::truncate_value(&observed, VALUE_WIDTH).red(),
                ui::truncate_value(&desired, VALUE_WIDTH).green()
            ))?;
        }
        Ok(())
    }

    fn delete(&self, identity: &str) -> Result<()> {
        self.push(format!(
            "  {} {:<30} {}",
            "-".red(),
            identity,
            "(will delete)".dimmed()
        ))
    }
}

/// Lines describing one decision, empty for an unchanged resource unless `verbose`
fn render_decision(decision: &Decision, verbose: bool) -> Result<Vec<String>> {
    let printer = PlanPrinter::new(decision.diff.as_ref());
    decision.dispatch(&printer)?;
    let mut lines = printer.into_lines();

    if !decision.action.is_change() && (verbose || !decision.warnings.is_empty()) {
        lines.push(format!(
            "  {} {:<30} {}",
            "=".dimmed(),
            decision.identity(),
            "(in sync)".dimmed()
        ));
    }
    for warning in &decision.warnings {
        lines.push(format!(
            "      {} {} is read-only. Cannot set to: {}",
            "⚠".yellow(),
            warning.field,
            ui::truncate_value(&warning.attempted.to_string(), VALUE_WIDTH)
        ));
    }
    Ok(lines)
}

/// Lines for one outcome
fn render_outcome(outcome: &ResourceOutcome, verbose: bool) -> Result<Vec<String>> {
    match outcome {
        ResourceOutcome::Planned(decision) => render_decision(decision, verbose),
        ResourceOutcome::Rejected(err) => {
            let mut lines = vec![format!(
                "  {} {:<30} {}",
                "✗".red(),
                err.identity.as_deref().unwrap_or("<unnamed>"),
                "(invalid)".red()
            )];
            lines.extend(
                err.errors
                    .iter()
                    .map(|e| format!("      {}: {}", e.field, e.reason)),
            );
            Ok(lines)
        }
        ResourceOutcome::Failed { identity, error } => Ok(vec![format!(
            "  {} {:<30} {}",
            "✗".red(),
            identity,
            error.to_string().red()
        )]),
    }
}

/// Render a pass report as terminal lines
pub fn render_report(report: &PassReport, verbose: bool) -> Result<Vec<String>> {
    let mut lines = vec![report.resource_type.bold().to_string()];
    for outcome in &report.outcomes {
        lines.extend(render_outcome(outcome, verbose)?);
    }
    Ok(lines)
}

/// Display plans for every pass, followed by an overall summary
pub fn display_plan(reports: &[PassReport], summary: &PassSummary, verbose: bool) -> Result<()> {
    if summary.total() == 0 {
        println!();
        println!("  {} No declarations to plan", "✓".green());
        return Ok(());
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Launch Configuration Plan".bold()
    );
    println!("│");
    for report in reports {
        for line in render_report(report, verbose)? {
            println!("│ {}", line);
        }
        println!("│");
    }

    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} to create, {} to update, {} to delete, {} unchanged",
        summary.create.to_string().green(),
        summary.update.to_string().yellow(),
        summary.delete.to_string().red(),
        summary.no_change
    );
    if summary.warnings > 0 {
        println!(
            "│          {}",
            ui::plural(summary.warnings, "read-only warning").yellow()
        );
    }
    if verbose {
        let fields = field_summary(reports);
        println!(
            "│          fields: {} in sync, {} drifted, {} read-only drift",
            fields.in_sync, fields.drifted, fields.read_only_drifted
        );
    }
    if !summary.is_success() {
        println!(
            "│          {} rejected, {} failed",
            summary.rejected.to_string().red(),
            summary.failed.to_string().red()
        );
    }
    println!("└─────────────────────────────────────────────────────┘");
    Ok(())
}

/// Field-level tallies across every compared resource
fn field_summary(reports: &[PassReport]) -> DiffSummary {
    let diffs: Vec<ResourceDiff> = reports
        .iter()
        .flat_map(|r| &r.outcomes)
        .filter_map(|o| o.decision().and_then(|d| d.diff.clone()))
        .collect();
    DiffSummary::from_diffs(&diffs)
}

/// Display the dependency hints of one resource
pub fn display_hints(identity: &str, hints: &[DependencyHint]) {
    println!("  {}", identity.bold());
    if hints.is_empty() {
        ui::dim("  (no references)");
        return;
    }
    for hint in hints {
        let targets = if hint.identities.is_empty() {
            "(none declared)".dimmed().to_string()
        } else {
            hint.identities
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("    {} {}: {}", "→".cyan(), hint.kind, targets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::launch_configuration;
    use declarative::{Declaration, NoWarnings, ObservedState, PassOptions, StaticState, run_pass};

    fn plain() {
        colored::control::set_override(false);
    }

    fn base(name: &str) -> Declaration {
        Declaration::new()
            .with("name", name)
            .with("region", "us-east-1")
            .with("instance_type", "t3.micro")
            .with("image_id", "ami-1")
            .with("security_groups", vec!["sg-a"])
    }

    fn report() -> PassReport {
        let schema = launch_configuration::schema().unwrap();
        let decls = vec![
            base("new"),
            base("drift").with("instance_type", "t3.large"),
            base("gone").with("ensure", "absent"),
            base("same"),
            Declaration::new().with("region", "us-east-1"),
        ];
        let observed = |name: &str| {
            ObservedState::new(name)
                .with("region", "us-east-1")
                .with("instance_type", "t3.micro")
                .with("image_id", "ami-1")
                .with("security_groups", vec!["sg-a"])
                .with("associate_public_ip_address", true)
        };
        let state: StaticState = [observed("drift"), observed("gone"), observed("same")]
            .into_iter()
            .collect();
        run_pass(&schema, &decls, &state, &NoWarnings, &PassOptions { jobs: 1 }).unwrap()
    }

    #[test]
    fn test_render_report_symbols() {
        plain();
        let lines = render_report(&report(), false).unwrap();
        let text = lines.join("\n");

        assert_eq!(lines[0], "ec2_launchconfiguration");
        assert!(text.contains("+ new"));
        assert!(text.contains("~ drift"));
        assert!(text.contains("instance_type: t3.micro → t3.large"));
        assert!(text.contains("- gone"));
        assert!(text.contains("✗ <unnamed>"));
        assert!(text.contains("name: a value is required"));
        assert!(!text.contains("same"));
    }

    #[test]
    fn test_render_report_verbose_shows_unchanged() {
        plain();
        let text = render_report(&report(), true).unwrap().join("\n");
        assert!(text.contains("= same"));
    }

    #[test]
    fn test_field_summary() {
        let fields = field_summary(&[report()]);
        assert_eq!(fields.drifted, 1);
        assert_eq!(fields.read_only_drifted, 0);
        assert!(fields.in_sync > 0);
    }

    #[test]
    fn test_render_read_only_warning() {
        plain();
        let schema = launch_configuration::schema().unwrap();
        let decls = vec![base("locked").with("associate_public_ip_address", false)];
        let state: StaticState = [ObservedState::new("locked")
            .with("region", "us-east-1")
            .with("instance_type", "t3.micro")
            .with("image_id", "ami-1")
            .with("security_groups", vec!["sg-a"])
            .with("associate_public_ip_address", true)]
        .into_iter()
        .collect();
        let report =
            run_pass(&schema, &decls, &state, &NoWarnings, &PassOptions::default()).unwrap();

        let text = render_report(&report, false).unwrap().join("\n");
        assert!(text.contains("= locked"));
        assert!(text.contains("associate_public_ip_address is read-only. Cannot set to: false"));
    }
}
