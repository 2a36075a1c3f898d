use crate::types::DocumentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated artifact as held by the document store.
///
/// Field names follow the store's wire shape: `type`, `createdAt`, `updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new(doc_type: DocumentType, created_at: DateTime<Utc>) -> Self {
        Self {
            doc_type,
            created_at,
            updated_at: None,
        }
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    /// Last modification time; creation time if never updated.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// First document of the given type in a project snapshot.
pub fn find(documents: &[Document], doc_type: DocumentType) -> Option<&Document> {
    documents.iter().find(|d| d.doc_type == doc_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn effective_time_falls_back_to_created_at() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut doc = Document::new(DocumentType::Prd, created);
        assert_eq!(doc.effective_time(), created);

        let updated = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        doc.touch(updated);
        assert_eq!(doc.effective_time(), updated);
    }

    #[test]
    fn parses_store_shape() {
        let json = r#"[
            {"type": "PRD", "createdAt": "2025-03-01T10:00:00Z"},
            {"type": "STRATEGY", "createdAt": "2025-03-01T10:00:00Z", "updatedAt": "2025-03-02T08:30:00.250Z"}
        ]"#;
        let docs: Vec<Document> = serde_json::from_str(json).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].doc_type, DocumentType::Prd);
        assert!(docs[0].updated_at.is_none());
        assert_eq!(
            docs[1].effective_time(),
            Utc.with_ymd_and_hms(2025, 3, 2, 8, 30, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn serializes_without_missing_update() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let doc = Document::new(DocumentType::Schema, created);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "SCHEMA");
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn find_returns_first_match() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let docs = vec![
            Document::new(DocumentType::Design, t0),
            Document::new(DocumentType::Design, t1),
        ];
        assert_eq!(find(&docs, DocumentType::Design).unwrap().created_at, t0);
        assert!(find(&docs, DocumentType::Backlog).is_none());
    }
}
