use crate::document::{self, Document};
use crate::error::{MissionError, Result};
use crate::paths;
use crate::types::DocumentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// All documents of one project, as persisted in
/// `.mission/projects/<slug>/documents.yaml`.
///
/// Holds at most one document per type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocuments {
    pub project: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl ProjectDocuments {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            created_at: Utc::now(),
            documents: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, slug: impl Into<String>) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        if paths::project_dir(root, &slug).exists() {
            return Err(MissionError::ProjectExists(slug));
        }

        let project = Self::new(slug);
        project.save(root)?;
        Ok(project)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::documents_path(root, slug);
        if !path.exists() {
            return Err(MissionError::ProjectNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let mut project: ProjectDocuments = serde_yaml::from_str(&data)?;
        // The directory name is authoritative; the stored field may be stale.
        project.project = slug.to_string();
        tracing::debug!(project = slug, documents = project.documents.len(), "loaded project");
        Ok(project)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::documents_path(root, &self.project);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Project slugs, sorted.
    pub fn list(root: &Path) -> Result<Vec<String>> {
        let dir = paths::projects_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                if paths::documents_path(root, &slug).exists() {
                    slugs.push(slug);
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    // ---------------------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------------------

    pub fn get(&self, doc_type: DocumentType) -> Option<&Document> {
        document::find(&self.documents, doc_type)
    }

    /// Record a write of `doc_type` at `at`. The first write creates the
    /// document; later writes move its `updated_at`. Returns true on create.
    pub fn record(&mut self, doc_type: DocumentType, at: DateTime<Utc>) -> bool {
        match self.documents.iter_mut().find(|d| d.doc_type == doc_type) {
            Some(doc) => {
                doc.touch(at);
                false
            }
            None => {
                self.documents.push(Document::new(doc_type, at));
                true
            }
        }
    }

    pub fn remove(&mut self, doc_type: DocumentType) -> Result<Document> {
        let idx = self
            .documents
            .iter()
            .position(|d| d.doc_type == doc_type)
            .ok_or_else(|| MissionError::DocumentNotFound(doc_type.to_string()))?;
        Ok(self.documents.remove(idx))
    }
}

/// Read a one-off snapshot in the store's JSON shape:
/// `[{"type": "PRD", "createdAt": "...", "updatedAt": "..."}]`.
pub fn load_snapshot(path: &Path) -> Result<Vec<Document>> {
    let data = std::fs::read_to_string(path)?;
    let documents: Vec<Document> = serde_json::from_str(&data)?;
    tracing::debug!(path = %path.display(), documents = documents.len(), "loaded snapshot");
    Ok(documents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
