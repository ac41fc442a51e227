//! Planner - turns a descriptor and observed state into a decision
//!
//! The planner never acts. It returns an [`Action`] for the external
//! executor together with any read-only warnings raised while comparing.

use crate::context::Executor;
use crate::diff::{ReadOnlyFieldWarning, ResourceDiff};
use crate::resource::{ObservedState, ResourceDescriptor};
use crate::schema::ResourceSchema;
use crate::types::EnsureState;
use anyhow::Result;
use serde::Serialize;

/// What the executor should do with a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Already converged
    NoChange,
    /// Resource is absent and should exist
    Create,
    /// Resource exists and these fields drifted
    Update { changed_fields: Vec<String> },
    /// Resource exists and should not
    Delete,
}

impl Action {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Planning result for one resource
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub descriptor: ResourceDescriptor,
    /// Serialized inline as `action` plus any action fields
    #[serde(flatten)]
    pub action: Action,
    /// Field comparison, present when observed state was compared
    pub diff: Option<ResourceDiff>,
    pub warnings: Vec<ReadOnlyFieldWarning>,
}

impl Decision {
    /// Decide what to do with `desired` given what was observed
    ///
    /// `observed` is `None` when the state source reported the resource as
    /// not found; the comparator is not consulted in that case.
    pub fn plan(
        schema: &ResourceSchema,
        desired: ResourceDescriptor,
        observed: Option<&ObservedState>,
    ) -> Self {
        match (desired.ensure(), observed) {
            (EnsureState::Present, None) => Self::without_diff(desired, Action::Create),
            (EnsureState::Absent, None) => Self::without_diff(desired, Action::NoChange),
            (EnsureState::Absent, Some(_)) => Self::without_diff(desired, Action::Delete),
            (EnsureState::Present, Some(observed)) => {
                let diff = ResourceDiff::compute(schema, &desired, observed);
                let changed_fields = diff.changed_fields();
                let action = if changed_fields.is_empty() {
                    Action::NoChange
                } else {
                    Action::Update { changed_fields }
                };
                Self {
                    warnings: diff.warnings.clone(),
                    descriptor: desired,
                    action,
                    diff: Some(diff),
                }
            }
        }
    }

    fn without_diff(descriptor: ResourceDescriptor, action: Action) -> Self {
        Self {
            descriptor,
            action,
            diff: None,
            warnings: Vec::new(),
        }
    }

    pub fn identity(&self) -> &str {
        self.descriptor.identity()
    }

    /// Hand this decision to an executor
    ///
    /// Calls exactly one executor action, or none for `NoChange`.
    pub fn dispatch<E: Executor + ?Sized>(&self, executor: &E) -> Result<()> {
        match &self.action {
            Action::NoChange => Ok(()),
            Action::Create => executor.create(&self.descriptor),
            Action::Update { changed_fields } => executor.update(&self.descriptor, changed_fields),
            Action::Delete => executor.delete(self.descriptor.identity()),
        }
    }
}

/// Parse a target string like "type.name" into (type, name)
///
/// Only the first dot separates the type; the name may contain dots.
pub fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        None => (Some(target.to_string()), None),
        Some((resource_type, name)) => (Some(resource_type.to_string()), Some(name.to_string())),
    }
}

/// Check if a resource matches a target of the form "type" or "type.name"
///
/// The name part matches any identity containing it.
pub fn matches_target(type_name: &str, identity: &str, target: Option<&str>) -> bool {
    let Some(target) = target else {
        return true;
    };
    let (resource_type, name) = parse_target(target);

    if let Some(rt) = resource_type
        && rt != type_name
    {
        return false;
    }

    if let Some(n) = name
        && !identity.contains(&n)
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Declaration;
    use crate::schema::{Equality, FieldDefinition, Rule};
    use std::sync::Mutex;

    fn schema() -> ResourceSchema {
        ResourceSchema::new(
            "widget",
            "",
            vec![
                FieldDefinition::identity("name"),
                FieldDefinition::property("size"),
                FieldDefinition::property("public")
                    .rule(Rule::Boolean)
                    .equality(Equality::StringForm)
                    .read_only(),
            ],
        )
        .unwrap()
    }

    fn desired(decl: Declaration) -> ResourceDescriptor {
        ResourceDescriptor::build(&schema(), &decl.with("name", "w1")).unwrap()
    }

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<String>>,
    }

    impl Executor for RecordingExecutor {
        fn create(&self, descriptor: &ResourceDescriptor) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {}", descriptor.identity()));
            Ok(())
        }

        fn update(&self, descriptor: &ResourceDescriptor, changed_fields: &[String]) -> Result<()> {
            self.calls.lock().unwrap().push(format!(
                "update {} {}",
                descriptor.identity(),
                changed_fields.join(",")
            ));
            Ok(())
        }

        fn delete(&self, identity: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("delete {identity}"));
            Ok(())
        }
    }

    #[test]
    fn test_not_found_creates() {
        let decision = Decision::plan(&schema(), desired(Declaration::new()), None);
        assert_eq!(decision.action, Action::Create);
        assert!(decision.diff.is_none());
    }

    #[test]
    fn test_absent_and_not_found_is_no_change() {
        let decision = Decision::plan(
            &schema(),
            desired(Declaration::new().with("ensure", "absent")),
            None,
        );
        assert_eq!(decision.action, Action::NoChange);
    }

    #[test]
    fn test_absent_and_found_deletes() {
        let observed = ObservedState::new("w1");
        let decision = Decision::plan(
            &schema(),
            desired(Declaration::new().with("ensure", "absent")),
            Some(&observed),
        );
        assert_eq!(decision.action, Action::Delete);
    }

    #[test]
    fn test_drift_updates_changed_fields() {
        let observed = ObservedState::new("w1").with("size", "small");
        let decision = Decision::plan(
            &schema(),
            desired(Declaration::new().with("size", "big")),
            Some(&observed),
        );
        assert_eq!(
            decision.action,
            Action::Update {
                changed_fields: vec!["size".to_string()]
            }
        );
    }

    #[test]
    fn test_decision_json_has_flat_action() {
        let observed = ObservedState::new("w1").with("size", "small");
        let decision = Decision::plan(
            &schema(),
            desired(Declaration::new().with("size", "big")),
            Some(&observed),
        );

        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["action"], "update");
        assert_eq!(json["changed_fields"][0], "size");
        assert_eq!(json["descriptor"]["identity"], "w1");

        let created = Decision::plan(&schema(), desired(Declaration::new()), None);
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["action"], "create");
        assert!(json["diff"].is_null());
    }

    #[test]
    fn test_read_only_drift_is_not_an_update() {
        let observed = ObservedState::new("w1").with("public", true);
        let decision = Decision::plan(
            &schema(),
            desired(Declaration::new().with("public", false)),
            Some(&observed),
        );

        assert_eq!(decision.action, Action::NoChange);
        assert_eq!(decision.warnings.len(), 1);
        assert_eq!(decision.warnings[0].field, "public");
        assert!(!decision.diff.as_ref().unwrap().in_sync());
    }

    #[test]
    fn test_dispatch_calls_one_action() {
        let executor = RecordingExecutor::default();

        let observed = ObservedState::new("w1").with("size", "small");
        Decision::plan(
            &schema(),
            desired(Declaration::new().with("size", "big")),
            Some(&observed),
        )
        .dispatch(&executor)
        .unwrap();
        Decision::plan(&schema(), desired(Declaration::new()), None)
            .dispatch(&executor)
            .unwrap();
        Decision::plan(
            &schema(),
            desired(Declaration::new().with("ensure", "absent")),
            Some(&observed),
        )
        .dispatch(&executor)
        .unwrap();
        Decision::plan(
            &schema(),
            desired(Declaration::new().with("size", "small")),
            Some(&observed),
        )
        .dispatch(&executor)
        .unwrap();

        assert_eq!(
            *executor.calls.lock().unwrap(),
            vec!["update w1 size", "create w1", "delete w1"]
        );
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("widget"), (Some("widget".to_string()), None));
        assert_eq!(
            parse_target("widget.web"),
            (Some("widget".to_string()), Some("web".to_string()))
        );
        assert_eq!(
            parse_target("widget.web.v2"),
            (Some("widget".to_string()), Some("web.v2".to_string()))
        );
    }

    #[test]
    fn test_matches_target() {
        assert!(matches_target("widget", "web-1", None));
        assert!(matches_target("widget", "web-1", Some("widget")));
        assert!(matches_target("widget", "web-1", Some("widget.web")));
        assert!(!matches_target("widget", "db-1", Some("widget.web")));
        assert!(!matches_target("gadget", "web-1", Some("widget")));
    }

    #[test]
    fn test_matches_target_dotted_identity() {
        assert!(matches_target("widget", "web.v2", Some("widget.web.v2")));
        assert!(matches_target("widget", "web.v2", Some("widget.v2")));
        assert!(!matches_target("widget", "web.v1", Some("widget.web.v2")));
    }
}
