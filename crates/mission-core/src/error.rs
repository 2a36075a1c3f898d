use thiserror::Error;

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("not initialized: run 'mission init'")]
    NotInitialized,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("cyclic dependency: {0}")]
    CyclicDependency(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MissionError>;
