mod cli;
mod commands;
mod config;
mod engine;
mod paths;
mod resource;
mod schema;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Validate(args) => commands::declarative::validate(&ctx, args),
        Command::Plan(args) => commands::declarative::plan(&ctx, args),
        Command::Deps(args) => commands::declarative::deps(&ctx, args),
        Command::Describe { resource_type } => {
            commands::describe::run(&ctx, resource_type.as_deref())
        }
        Command::Config => commands::config::show(&ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "launchconf", &mut io::stdout());
            Ok(())
        }
    }
}
