use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use mission_core::config::{Config, WarnLevel};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Set the staleness grace buffer in milliseconds
    SetGrace { ms: u64 },

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::SetGrace { ms } => set_grace(root, ms),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

// ---------------------------------------------------------------------------
// show / set-grace
// ---------------------------------------------------------------------------

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    if json {
        print_json(&config)?;
    } else {
        println!("Project:      {}", config.project.name);
        println!("Grace buffer: {}ms", config.staleness.grace_buffer_ms);
        let source = if config.dependencies.is_some() {
            "custom"
        } else {
            "built-in"
        };
        println!("Dependencies: {source}");
    }
    Ok(())
}

fn set_grace(root: &Path, ms: u64) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    config.staleness.grace_buffer_ms = ms;
    config.save(root).context("failed to save config")?;
    println!("Grace buffer set to {ms}ms");
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
