use super::{format_time, parse_timestamp};
use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use mission_core::{
    store::ProjectDocuments,
    types::{DocumentType, Phase},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum DocSubcommand {
    /// Record that a document was written (creates it on first write)
    Record {
        slug: String,
        /// Document type, e.g. PRD, STRATEGY, RELAY_B
        doc_type: DocumentType,
        /// Write time (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,
    },
    /// List a project's documents
    List {
        slug: String,
        /// Only documents produced in this phase, e.g. strategy
        #[arg(long)]
        phase: Option<Phase>,
    },
    /// Remove a document from a project
    Remove { slug: String, doc_type: DocumentType },
}

pub fn run(root: &Path, subcmd: DocSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        DocSubcommand::Record { slug, doc_type, at } => record(root, &slug, doc_type, at, json),
        DocSubcommand::List { slug, phase } => list(root, &slug, phase, json),
        DocSubcommand::Remove { slug, doc_type } => remove(root, &slug, doc_type, json),
    }
}

fn record(
    root: &Path,
    slug: &str,
    doc_type: DocumentType,
    at: Option<DateTime<Utc>>,
    json: bool,
) -> anyhow::Result<()> {
    let mut project =
        ProjectDocuments::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    let at = at.unwrap_or_else(Utc::now);
    let created = project.record(doc_type, at);
    project.save(root).context("failed to save documents")?;
    tracing::info!(project = slug, document = %doc_type, created, "recorded document write");

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "type": doc_type,
            "created": created,
            "at": at,
        }))?;
    } else if created {
        println!("Created: {slug}/{doc_type} at {}", format_time(&at));
    } else {
        println!("Updated: {slug}/{doc_type} at {}", format_time(&at));
    }
    Ok(())
}

fn list(root: &Path, slug: &str, phase: Option<Phase>, json: bool) -> anyhow::Result<()> {
    let project =
        ProjectDocuments::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;

    let documents: Vec<_> = DocumentType::all()
        .iter()
        .filter(|t| phase.map_or(true, |p| t.phase() == p))
        .filter_map(|t| project.get(*t))
        .collect();

    if json {
        print_json(&documents)?;
        return Ok(());
    }

    if documents.is_empty() {
        println!("No documents yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = documents
        .iter()
        .map(|d| {
            vec![
                d.doc_type.to_string(),
                d.doc_type.phase().to_string(),
                if d.doc_type.is_relay() { "relay" } else { "primary" }.to_string(),
                format_time(&d.created_at),
                d.updated_at.as_ref().map(format_time).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["TYPE", "PHASE", "KIND", "CREATED", "UPDATED"], rows);
    Ok(())
}

fn remove(root: &Path, slug: &str, doc_type: DocumentType, json: bool) -> anyhow::Result<()> {
    let mut project =
        ProjectDocuments::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    project
        .remove(doc_type)
        .with_context(|| format!("failed to remove {doc_type}"))?;
    project.save(root).context("failed to save documents")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "type": doc_type, "removed": true }))?;
    } else {
        println!("Removed: {slug}/{doc_type}");
    }
    Ok(())
}
