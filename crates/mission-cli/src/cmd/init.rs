use anyhow::Context;
use mission_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let project_name = name
        .map(str::to_string)
        .unwrap_or_else(|| super::project_name(root));

    println!("Initializing mission control in: {}", root.display());

    // 1. Create .mission directory structure
    for dir in [paths::MISSION_DIR, paths::PROJECTS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    // 2. Write config.yaml if missing
    let cfg = Config::new(&project_name);
    let data = serde_yaml::to_string(&cfg)?;
    let written = io::write_if_missing(&paths::config_path(root), data.as_bytes())
        .context("failed to write config.yaml")?;
    if written {
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    tracing::info!(project = %project_name, "initialized");
    Ok(())
}
