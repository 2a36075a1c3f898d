use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Discovery,
    Strategy,
    Substructure,
    Design,
    Planning,
    Construction,
    Audit,
    Handover,
}

impl Phase {
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Discovery,
            Phase::Strategy,
            Phase::Substructure,
            Phase::Design,
            Phase::Planning,
            Phase::Construction,
            Phase::Audit,
            Phase::Handover,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Phase> {
        let all = Phase::all();
        let i = self.index();
        all.get(i + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Discovery => "discovery",
            Phase::Strategy => "strategy",
            Phase::Substructure => "substructure",
            Phase::Design => "design",
            Phase::Planning => "planning",
            Phase::Construction => "construction",
            Phase::Audit => "audit",
            Phase::Handover => "handover",
        }
    }

    /// Documents produced while the mission is in this phase.
    pub fn documents(self) -> Vec<DocumentType> {
        DocumentType::all()
            .iter()
            .copied()
            .filter(|d| d.phase() == self)
            .collect()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = crate::error::MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovery" => Ok(Phase::Discovery),
            "strategy" => Ok(Phase::Strategy),
            "substructure" => Ok(Phase::Substructure),
            "design" => Ok(Phase::Design),
            "planning" => Ok(Phase::Planning),
            "construction" => Ok(Phase::Construction),
            "audit" => Ok(Phase::Audit),
            "handover" => Ok(Phase::Handover),
            _ => Err(crate::error::MissionError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Prd,
    Strategy,
    Schema,
    Design,
    Backlog,
    Instructions,
    RelayB,
    RelayC,
    RelayD,
    RelayE,
    RelayF,
}

impl DocumentType {
    pub fn all() -> &'static [DocumentType] {
        &[
            DocumentType::Prd,
            DocumentType::Strategy,
            DocumentType::Schema,
            DocumentType::Design,
            DocumentType::Backlog,
            DocumentType::Instructions,
            DocumentType::RelayB,
            DocumentType::RelayC,
            DocumentType::RelayD,
            DocumentType::RelayE,
            DocumentType::RelayF,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Prd => "PRD",
            DocumentType::Strategy => "STRATEGY",
            DocumentType::Schema => "SCHEMA",
            DocumentType::Design => "DESIGN",
            DocumentType::Backlog => "BACKLOG",
            DocumentType::Instructions => "INSTRUCTIONS",
            DocumentType::RelayB => "RELAY_B",
            DocumentType::RelayC => "RELAY_C",
            DocumentType::RelayD => "RELAY_D",
            DocumentType::RelayE => "RELAY_E",
            DocumentType::RelayF => "RELAY_F",
        }
    }

    pub fn is_relay(self) -> bool {
        self.relay_source().is_some()
    }

    /// The primary artifact a relay document hands off to the next phase.
    pub fn relay_source(self) -> Option<DocumentType> {
        match self {
            DocumentType::RelayB => Some(DocumentType::Strategy),
            DocumentType::RelayC => Some(DocumentType::Schema),
            DocumentType::RelayD => Some(DocumentType::Design),
            DocumentType::RelayE => Some(DocumentType::Backlog),
            DocumentType::RelayF => Some(DocumentType::Instructions),
            _ => None,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            DocumentType::Prd => Phase::Discovery,
            DocumentType::Strategy => Phase::Strategy,
            DocumentType::Schema => Phase::Substructure,
            DocumentType::Design => Phase::Design,
            DocumentType::Backlog => Phase::Planning,
            DocumentType::Instructions => Phase::Construction,
            relay => relay
                .relay_source()
                .map(DocumentType::phase)
                .unwrap_or(Phase::Discovery),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = crate::error::MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        DocumentType::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| crate::error::MissionError::UnknownDocumentType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
