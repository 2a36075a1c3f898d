use super::format_time;
use crate::output::{print_json, print_table};
use anyhow::Context;
use mission_core::{
    staleness::StalenessEvaluator,
    store::ProjectDocuments,
    types::{DocumentType, Phase},
};
use std::path::Path;

pub fn run(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let project =
        ProjectDocuments::load(root, slug).with_context(|| format!("project '{slug}' not found"))?;
    let config = super::load_config_or_default(root)?;
    let table = config
        .dependency_table()
        .context("invalid dependency table in config")?;

    let statuses = StalenessEvaluator::new(&table)
        .with_grace_buffer(config.grace_buffer())
        .check_all(&project.documents);

    // The latest phase with a produced document; none before the PRD exists.
    let phase = project.documents.iter().map(|d| d.doc_type.phase()).max();
    let next_phase = match phase {
        Some(p) => p.next(),
        None => Phase::all().first().copied(),
    };

    if json {
        let missing: Vec<DocumentType> = DocumentType::all()
            .iter()
            .copied()
            .filter(|t| project.get(*t).is_none())
            .collect();
        print_json(&serde_json::json!({
            "slug": slug,
            "documents": statuses,
            "missing": missing,
            "phase": phase,
            "next_phase": next_phase.map(|p| serde_json::json!({
                "phase": p,
                "documents": p.documents(),
            })),
        }))?;
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No documents yet.");
        print_next_phase(next_phase);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = statuses
        .iter()
        .map(|s| {
            vec![
                s.doc_type.to_string(),
                s.doc_type.phase().to_string(),
                format_time(&s.effective_at),
                if s.result.is_stale { "stale" } else { "ok" }.to_string(),
                s.result
                    .upstream_doc
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["TYPE", "PHASE", "MODIFIED", "STATUS", "UPSTREAM"], rows);

    let stale = statuses.iter().filter(|s| s.result.is_stale).count();
    if stale > 0 {
        println!();
        println!("{stale} stale document(s)");
    }

    if let Some(p) = phase {
        println!();
        println!("Phase: {p}");
    }
    print_next_phase(next_phase);
    Ok(())
}

fn print_next_phase(next: Option<Phase>) {
    let Some(next) = next else {
        return;
    };
    let produces: Vec<String> = next.documents().iter().map(|d| d.to_string()).collect();
    if produces.is_empty() {
        println!("Next phase: {next}");
    } else {
        println!("Next phase: {next} (produces {})", produces.join(", "));
    }
}
