use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use mission_core::{staleness::StalenessEvaluator, store::ProjectDocuments};
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a new project
    Create { slug: String },
    /// List projects
    List,
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create { slug } => create(root, &slug, json),
        ProjectSubcommand::List => list(root, json),
    }
}

fn create(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let project = ProjectDocuments::create(root, slug)
        .with_context(|| format!("failed to create project '{slug}'"))?;

    if json {
        print_json(&serde_json::json!({
            "slug": project.project,
            "created_at": project.created_at,
        }))?;
    } else {
        println!("Created project: {slug}");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let slugs = ProjectDocuments::list(root).context("failed to list projects")?;
    let config = super::load_config_or_default(root)?;
    let table = config
        .dependency_table()
        .context("invalid dependency table in config")?;
    let evaluator = StalenessEvaluator::new(&table).with_grace_buffer(config.grace_buffer());

    let mut summaries = Vec::new();
    for slug in &slugs {
        let project = ProjectDocuments::load(root, slug)
            .with_context(|| format!("failed to load project '{slug}'"))?;
        let stale = evaluator
            .check_all(&project.documents)
            .iter()
            .filter(|s| s.result.is_stale)
            .count();
        summaries.push((slug.clone(), project.documents.len(), stale));
    }

    if json {
        let values: Vec<_> = summaries
            .iter()
            .map(|(slug, documents, stale)| {
                serde_json::json!({
                    "slug": slug,
                    "documents": documents,
                    "stale": stale,
                })
            })
            .collect();
        print_json(&values)?;
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = summaries
        .into_iter()
        .map(|(slug, documents, stale)| vec![slug, documents.to_string(), stale.to_string()])
        .collect();
    print_table(&["SLUG", "DOCUMENTS", "STALE"], rows);
    Ok(())
}
