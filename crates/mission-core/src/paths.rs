use crate::error::{MissionError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MISSION_DIR: &str = ".mission";
pub const PROJECTS_DIR: &str = ".mission/projects";

pub const CONFIG_FILE: &str = ".mission/config.yaml";
pub const DOCUMENTS_FILE: &str = "documents.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn projects_dir(root: &Path) -> PathBuf {
    root.join(PROJECTS_DIR)
}

pub fn project_dir(root: &Path, slug: &str) -> PathBuf {
    projects_dir(root).join(slug)
}

pub fn documents_path(root: &Path, slug: &str) -> PathBuf {
    project_dir(root, slug).join(DOCUMENTS_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(MissionError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["acme", "a", "apollo-11", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in ["", "-lead", "trail-", "two words", "Acme", "a_b"] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
        assert!(validate_slug(&"a".repeat(65)).is_err());
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.mission/config.yaml")
        );
        assert_eq!(
            documents_path(root, "acme"),
            PathBuf::from("/tmp/proj/.mission/projects/acme/documents.yaml")
        );
    }
}
