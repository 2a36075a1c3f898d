pub mod check;
pub mod config;
pub mod deps;
pub mod doc;
pub mod init;
pub mod project;
pub mod status;

use anyhow::Context;
use chrono::{DateTime, Utc};
use mission_core::{config::Config, MissionError};
use std::path::Path;

/// Project config, or the built-in defaults when `.mission/` is absent.
pub fn load_config_or_default(root: &Path) -> anyhow::Result<Config> {
    match Config::load(root) {
        Ok(cfg) => Ok(cfg),
        Err(MissionError::NotInitialized) => {
            tracing::debug!(root = %root.display(), "no config, using defaults");
            Ok(Config::new(project_name(root)))
        }
        Err(e) => Err(e).context("failed to load config"),
    }
}

pub fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mission".to_string())
}

/// clap value parser for `--at` timestamps.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

pub fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
