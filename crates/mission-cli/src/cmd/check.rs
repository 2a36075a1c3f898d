use crate::output::print_json;
use anyhow::Context;
use mission_core::{
    document::Document,
    staleness::StalenessEvaluator,
    store::{self, ProjectDocuments},
    types::DocumentType,
};
use std::path::{Path, PathBuf};

/// Where the document snapshot comes from.
pub enum Source {
    Project(String),
    Snapshot(PathBuf),
}

pub fn run(root: &Path, doc_type: DocumentType, source: Source, json: bool) -> anyhow::Result<()> {
    let documents = load_documents(root, &source)?;
    let config = super::load_config_or_default(root)?;
    let table = config
        .dependency_table()
        .context("invalid dependency table in config")?;

    let evaluator = StalenessEvaluator::new(&table).with_grace_buffer(config.grace_buffer());
    let result = evaluator.check(doc_type, &documents);

    if json {
        let mut val = serde_json::to_value(&result)?;
        val["type"] = serde_json::to_value(doc_type)?;
        val["graceBufferMs"] = evaluator.grace_buffer().num_milliseconds().into();
        print_json(&val)?;
        return Ok(());
    }

    if result.is_stale {
        let reason = result.reason.as_deref().unwrap_or_default();
        println!("{doc_type}: stale ({reason})");
    } else if documents.iter().any(|d| d.doc_type == doc_type) {
        println!("{doc_type}: up to date");
    } else {
        println!("{doc_type}: not produced yet");
    }
    Ok(())
}

fn load_documents(root: &Path, source: &Source) -> anyhow::Result<Vec<Document>> {
    match source {
        Source::Project(slug) => {
            let project = ProjectDocuments::load(root, slug)
                .with_context(|| format!("project '{slug}' not found"))?;
            Ok(project.documents)
        }
        Source::Snapshot(path) => store::load_snapshot(path)
            .with_context(|| format!("failed to read snapshot {}", path.display())),
    }
}
