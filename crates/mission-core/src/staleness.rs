use crate::dependency::DependencyTable;
use crate::document::{self, Document};
use crate::types::DocumentType;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tolerance for near-simultaneous writes, e.g. a document and its
/// derivative committed by the same request.
pub const GRACE_BUFFER_MS: i64 = 5000;

pub fn default_grace_buffer() -> Duration {
    Duration::milliseconds(GRACE_BUFFER_MS)
}

// ---------------------------------------------------------------------------
// StalenessResult (output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StalenessResult {
    pub is_stale: bool,
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_doc: Option<DocumentType>,
}

impl StalenessResult {
    pub fn fresh() -> Self {
        Self {
            is_stale: false,
            reason: None,
            upstream_doc: None,
        }
    }

    pub fn stale(upstream: DocumentType, target: DocumentType) -> Self {
        Self {
            is_stale: true,
            reason: Some(format!(
                "{upstream} was updated after {target} was last generated"
            )),
            upstream_doc: Some(upstream),
        }
    }
}

/// Staleness of one document present in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatus {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub effective_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: StalenessResult,
}

// ---------------------------------------------------------------------------
// StalenessEvaluator
// ---------------------------------------------------------------------------

/// Compares a document against its upstream documents.
///
/// Never fails: any missing input (target, table entry, upstream) makes the
/// answer "not stale".
pub struct StalenessEvaluator<'a> {
    table: &'a DependencyTable,
    grace: Duration,
}

impl<'a> StalenessEvaluator<'a> {
    pub fn new(table: &'a DependencyTable) -> Self {
        Self {
            table,
            grace: default_grace_buffer(),
        }
    }

    pub fn with_grace_buffer(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn grace_buffer(&self) -> Duration {
        self.grace
    }

    pub fn check(&self, target: DocumentType, documents: &[Document]) -> StalenessResult {
        let Some(target_doc) = document::find(documents, target) else {
            return StalenessResult::fresh();
        };
        let target_time = target_doc.effective_time();

        // First stale upstream in declared order wins.
        for dep in self.table.depends_on(target) {
            let Some(dep_doc) = document::find(documents, *dep) else {
                continue;
            };
            let dep_time = dep_doc.effective_time();
            let Some(limit) = target_time.checked_add_signed(self.grace) else {
                continue;
            };
            if dep_time > limit {
                tracing::debug!(
                    document = %target,
                    upstream = %dep,
                    lag_ms = (dep_time - target_time).num_milliseconds(),
                    "document is stale"
                );
                return StalenessResult::stale(*dep, target);
            }
        }
        StalenessResult::fresh()
    }

    /// Evaluate every document in the snapshot, in lifecycle order.
    pub fn check_all(&self, documents: &[Document]) -> Vec<DocumentStatus> {
        DocumentType::all()
            .iter()
            .filter_map(|t| document::find(documents, *t))
            .map(|doc| DocumentStatus {
                doc_type: doc.doc_type,
                effective_at: doc.effective_time(),
                result: self.check(doc.doc_type, documents),
            })
            .collect()
    }
}

pub fn check_stale_state(
    table: &DependencyTable,
    target: DocumentType,
    documents: &[Document],
) -> StalenessResult {
    StalenessEvaluator::new(table).check(target, documents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
