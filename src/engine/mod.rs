//! Planning engine for launchconf
//!
//! The engine orchestrates:
//! 1. Planning - Run one pass per resource type in a manifest
//! 2. Display - Render decisions, read-only warnings and rejections
//!
//! Applying decisions is left to an external executor.

pub mod differ;
pub mod planner;

pub use differ::{display_hints, display_plan};
pub use planner::{overall_summary, plan_manifest, select_declarations};
