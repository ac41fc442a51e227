use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(name = "launchconf")]
#[command(version)]
#[command(about = "Validate and plan EC2 launch configurations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate every declaration in a manifest
    Validate(ManifestArgs),

    /// Compare declarations against observed state and print decisions
    Plan(PlanArgs),

    /// Print the resources each declaration references
    Deps(ManifestArgs),

    /// Describe the fields of a resource type
    Describe {
        /// Resource type (defaults to all)
        resource_type: Option<String>,
    },

    /// Show the config directory and effective settings
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser)]
pub struct ManifestArgs {
    /// Manifest file (.toml or .json)
    pub manifest: PathBuf,

    /// Only include a resource type or "type.name"
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Parser)]
pub struct PlanArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Observed-state snapshot (.toml or .json)
    #[arg(short, long)]
    pub observed: Option<PathBuf>,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}
