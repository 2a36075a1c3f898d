use crate::dependency::{DependencyRule, DependencyTable};
use crate::error::{MissionError, Result};
use crate::paths;
use crate::staleness::GRACE_BUFFER_MS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StalenessConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StalenessConfig {
    #[serde(default = "default_grace_buffer_ms")]
    pub grace_buffer_ms: u64,
}

fn default_grace_buffer_ms() -> u64 {
    GRACE_BUFFER_MS as u64
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            grace_buffer_ms: default_grace_buffer_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub staleness: StalenessConfig,
    /// Overrides the built-in dependency table when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<DependencyRule>>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            staleness: StalenessConfig::default(),
            dependencies: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(MissionError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        tracing::debug!(path = %path.display(), custom_deps = cfg.dependencies.is_some(), "loaded config");
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn grace_buffer(&self) -> chrono::Duration {
        let ms = self.staleness.grace_buffer_ms.min(u64::from(u32::MAX));
        chrono::Duration::milliseconds(ms as i64)
    }

    /// The configured dependency table, or the built-in one.
    pub fn dependency_table(&self) -> Result<DependencyTable> {
        match &self.dependencies {
            Some(rules) => DependencyTable::from_rules(rules),
            None => Ok(DependencyTable::default()),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Grace buffer sanity
        if self.staleness.grace_buffer_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "staleness.grace_buffer_ms is 0: documents written in the same \
                          request may be flagged stale"
                    .to_string(),
            });
        } else if self.staleness.grace_buffer_ms > 3_600_000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "staleness.grace_buffer_ms={} (over one hour) will hide most upstream changes",
                    self.staleness.grace_buffer_ms
                ),
            });
        }

        let Some(rules) = &self.dependencies else {
            return warnings;
        };

        // 2. Rule shape
        let mut seen = HashSet::new();
        for rule in rules {
            if !seen.insert(rule.document) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "'{}' has more than one dependency rule; they will be merged",
                        rule.document
                    ),
                });
            }
            if rule.depends_on.contains(&rule.document) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("'{}' depends on itself", rule.document),
                });
            }
            let mut deps = HashSet::new();
            for dep in &rule.depends_on {
                if !deps.insert(*dep) {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "'{}' lists '{}' more than once in depends_on",
                            rule.document, dep
                        ),
                    });
                }
            }
        }

        // 3. Acyclicity; self-edges were reported above
        let without_self_edges: Vec<DependencyRule> = rules
            .iter()
            .map(|r| DependencyRule {
                document: r.document,
                depends_on: r
                    .depends_on
                    .iter()
                    .copied()
                    .filter(|d| *d != r.document)
                    .collect(),
            })
            .collect();
        if let Err(MissionError::CyclicDependency(cycle)) =
            DependencyTable::from_rules(&without_self_edges)
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("dependency cycle: {cycle}"),
            });
        }

        warnings
    }
}

/// The built-in table in config form.
pub fn default_dependency_rules() -> Vec<DependencyRule> {
    DependencyTable::default().to_rules()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("acme");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.project.name, "acme");
        assert_eq!(parsed.staleness.grace_buffer_ms, 5000);
        assert!(parsed.dependencies.is_none());
        assert!(!yaml.contains("dependencies"));
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("project:\n  name: acme\n").unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.grace_buffer(), chrono::Duration::milliseconds(5000));
        assert_eq!(cfg.dependency_table().unwrap(), DependencyTable::default());
    }

    #[test]
    fn custom_dependencies_from_yaml() {
        let yaml = r#"
project:
  name: acme
staleness:
  grace_buffer_ms: 1000
dependencies:
  - document: STRATEGY
    depends_on: [PRD]
  - document: DESIGN
    depends_on: [STRATEGY]
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let table = cfg.dependency_table().unwrap();
        assert_eq!(table.depends_on(DocumentType::Design), &[DocumentType::Strategy]);
        assert!(table.depends_on(DocumentType::Schema).is_empty());
        assert_eq!(cfg.grace_buffer(), chrono::Duration::milliseconds(1000));
    }

    #[test]
    fn unknown_document_type_fails_to_parse() {
        let yaml = "project:\n  name: acme\ndependencies:\n  - document: ROADMAP\n    depends_on: [PRD]\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(MissionError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("acme");
        cfg.dependencies = Some(default_dependency_rules());
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.dependencies, cfg.dependencies);
    }

    #[test]
    fn validate_default_config_no_warnings() {
        assert!(Config::new("acme").validate().is_empty());
    }

    #[test]
    fn validate_zero_grace_warning() {
        let mut cfg = Config::new("acme");
        cfg.staleness.grace_buffer_ms = 0;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }

    #[test]
    fn validate_cycle_is_error() {
        let mut cfg = Config::new("acme");
        cfg.dependencies = Some(vec![
            DependencyRule::new(DocumentType::Strategy, &[DocumentType::Prd]),
            DependencyRule::new(DocumentType::Prd, &[DocumentType::Strategy]),
        ]);
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("cycle")));
        assert!(cfg.dependency_table().is_err());
    }

    #[test]
    fn validate_self_dependency_reported_once() {
        let mut cfg = Config::new("acme");
        cfg.dependencies = Some(vec![DependencyRule::new(
            DocumentType::Schema,
            &[DocumentType::Schema],
        )]);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("depends on itself"));
    }

    #[test]
    fn validate_self_dependency_does_not_hide_other_cycle() {
        let mut cfg = Config::new("acme");
        cfg.dependencies = Some(vec![
            DependencyRule::new(DocumentType::Schema, &[DocumentType::Schema]),
            DependencyRule::new(DocumentType::Strategy, &[DocumentType::Prd]),
            DependencyRule::new(DocumentType::Prd, &[DocumentType::Strategy]),
        ]);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("depends on itself")));
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error
            && w.message == "dependency cycle: STRATEGY -> PRD -> STRATEGY"));
    }

    #[test]
    fn validate_duplicate_rules_and_edges() {
        let mut cfg = Config::new("acme");
        cfg.dependencies = Some(vec![
            DependencyRule::new(DocumentType::Design, &[DocumentType::Schema]),
            DependencyRule::new(
                DocumentType::Design,
                &[DocumentType::Strategy, DocumentType::Strategy],
            ),
        ]);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
    }
}
