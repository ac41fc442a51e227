use anyhow::Result;

use crate::Context;
use crate::config::{ConfigFormat, Settings};
use crate::paths::{self, ENV_CONFIG_DIR};
use crate::ui;

pub fn show(ctx: &Context) -> Result<()> {
    ui::header("Configuration");

    let dir = paths::config_dir()?;
    println!();
    ui::kv("Config directory", &dir.display().to_string());

    let found = [ConfigFormat::Toml, ConfigFormat::Json]
        .into_iter()
        .map(|format| dir.join(format!("config.{}", format.extension())))
        .find(|path| path.exists());
    match &found {
        Some(path) => ui::kv("Settings file", &path.display().to_string()),
        None => ui::kv("Settings file", "(none, using defaults)"),
    }

    let settings = Settings::load()?;
    println!();
    ui::kv("jobs", &settings.jobs.to_string());
    ui::kv(
        "observed",
        &settings
            .observed_path()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
    );
    ui::kv("format", &format!("{:?}", settings.format).to_lowercase());

    if !ctx.quiet {
        println!();
        ui::dim(&format!("Set {} to use another directory.", ENV_CONFIG_DIR));
        ui::dim("TOML files are preferred over JSON when both exist.");
    }
    Ok(())
}
