use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use mission_core::{config::default_dependency_rules, dependency::DependencyTable, types::DocumentType};
use std::path::Path;

#[derive(Subcommand)]
pub enum DepsSubcommand {
    /// Show the active dependency table
    Show,
    /// List every document that may go stale when the given one changes
    Ripple { doc_type: DocumentType },
    /// Print the built-in table as YAML for the `dependencies:` config key
    Export,
}

pub fn run(root: &Path, subcmd: DepsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DepsSubcommand::Show => show(root, json),
        DepsSubcommand::Ripple { doc_type } => ripple(root, doc_type, json),
        DepsSubcommand::Export => export(),
    }
}

fn active_table(root: &Path) -> anyhow::Result<DependencyTable> {
    let config = super::load_config_or_default(root)?;
    config
        .dependency_table()
        .context("invalid dependency table in config")
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let table = active_table(root)?;

    if json {
        print_json(&table.to_rules())?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = table
        .entries()
        .map(|(doc, deps)| {
            let deps: Vec<&str> = deps.iter().map(|d| d.as_str()).collect();
            vec![doc.to_string(), deps.join(", ")]
        })
        .collect();
    print_table(&["DOCUMENT", "DEPENDS ON"], rows);
    Ok(())
}

fn ripple(root: &Path, doc_type: DocumentType, json: bool) -> anyhow::Result<()> {
    let table = active_table(root)?;
    let downstream = table.downstream_of(doc_type);

    if json {
        print_json(&serde_json::json!({
            "type": doc_type,
            "direct": table.dependents_of(doc_type),
            "downstream": downstream,
        }))?;
    } else if downstream.is_empty() {
        println!("Nothing depends on {doc_type}.");
    } else {
        println!("Changing {doc_type} may leave these stale:");
        for d in downstream {
            println!("  {d}");
        }
    }
    Ok(())
}

fn export() -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(&default_dependency_rules())?;
    print!("{yaml}");
    Ok(())
}
