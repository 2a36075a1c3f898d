use crate::error::{MissionError, Result};
use crate::types::DocumentType;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

// ---------------------------------------------------------------------------
// DependencyRule (config form)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRule {
    pub document: DocumentType,
    #[serde(default)]
    pub depends_on: Vec<DocumentType>,
}

impl DependencyRule {
    pub fn new(document: DocumentType, depends_on: &[DocumentType]) -> Self {
        Self {
            document,
            depends_on: depends_on.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// DependencyTable
// ---------------------------------------------------------------------------

/// Which document types each document type is derived from.
///
/// Entries keep their declared order, and so do the upstream lists inside
/// them: the evaluator reports the first stale upstream it meets.
/// A table is acyclic once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyTable {
    entries: Vec<(DocumentType, Vec<DocumentType>)>,
}

impl Default for DependencyTable {
    fn default() -> Self {
        use DocumentType::*;

        let mut entries = vec![
            (Strategy, vec![Prd]),
            (Schema, vec![Strategy]),
            (Design, vec![Schema, Strategy]),
            (Backlog, vec![Design, Schema]),
            (Instructions, vec![Backlog]),
        ];
        for relay in DocumentType::all().iter().copied() {
            if let Some(source) = relay.relay_source() {
                entries.push((relay, vec![source]));
            }
        }
        Self { entries }
    }
}

impl DependencyTable {
    /// Build a table from configured rules, rejecting cycles.
    ///
    /// Repeated rules for one document append to its list; an edge that is
    /// already present is not added twice.
    pub fn from_rules(rules: &[DependencyRule]) -> Result<Self> {
        let mut entries: Vec<(DocumentType, Vec<DocumentType>)> = Vec::new();
        for rule in rules {
            let idx = match entries.iter().position(|(d, _)| *d == rule.document) {
                Some(i) => i,
                None => {
                    entries.push((rule.document, Vec::new()));
                    entries.len() - 1
                }
            };
            let deps = &mut entries[idx].1;
            for dep in &rule.depends_on {
                if !deps.contains(dep) {
                    deps.push(*dep);
                }
            }
        }

        let table = Self { entries };
        if let Some(cycle) = table.find_cycle() {
            return Err(MissionError::CyclicDependency(format_cycle(&cycle)));
        }
        Ok(table)
    }

    /// Upstream types of `doc_type` in declared order; empty when the type
    /// has no entry.
    pub fn depends_on(&self, doc_type: DocumentType) -> &[DocumentType] {
        self.entries
            .iter()
            .find(|(d, _)| *d == doc_type)
            .map(|(_, deps)| deps.as_slice())
            .unwrap_or(&[])
    }

    pub fn entries(&self) -> impl Iterator<Item = (DocumentType, &[DocumentType])> {
        self.entries.iter().map(|(d, deps)| (*d, deps.as_slice()))
    }

    pub fn to_rules(&self) -> Vec<DependencyRule> {
        self.entries
            .iter()
            .map(|(d, deps)| DependencyRule::new(*d, deps))
            .collect()
    }

    /// Types that list `doc_type` directly as an upstream.
    pub fn dependents_of(&self, doc_type: DocumentType) -> Vec<DocumentType> {
        self.entries
            .iter()
            .filter(|(_, deps)| deps.contains(&doc_type))
            .map(|(d, _)| *d)
            .collect()
    }

    /// Every type that may go stale when `doc_type` changes, nearest first.
    pub fn downstream_of(&self, doc_type: DocumentType) -> Vec<DocumentType> {
        let mut seen: HashSet<DocumentType> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([doc_type]);
        seen.insert(doc_type);

        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents_of(current) {
                if seen.insert(dependent) {
                    order.push(dependent);
                    queue.push_back(dependent);
                }
            }
        }
        order
    }

    /// DFS over upstream edges. Returns the first cycle found as a path
    /// whose last element repeats the node where the cycle closes.
    pub fn find_cycle(&self) -> Option<Vec<DocumentType>> {
        let mut visited: HashSet<DocumentType> = HashSet::new();
        let mut stack: Vec<DocumentType> = Vec::new();

        for (doc_type, _) in &self.entries {
            if !visited.contains(doc_type) {
                if let Some(cycle) = self.visit(*doc_type, &mut visited, &mut stack) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit(
        &self,
        node: DocumentType,
        visited: &mut HashSet<DocumentType>,
        stack: &mut Vec<DocumentType>,
    ) -> Option<Vec<DocumentType>> {
        visited.insert(node);
        stack.push(node);

        for dep in self.depends_on(node) {
            if let Some(pos) = stack.iter().position(|n| n == dep) {
                let mut cycle = stack[pos..].to_vec();
                cycle.push(*dep);
                return Some(cycle);
            }
            if !visited.contains(dep) {
                if let Some(cycle) = self.visit(*dep, visited, stack) {
                    return Some(cycle);
                }
            }
        }

        stack.pop();
        None
    }
}

pub fn format_cycle(cycle: &[DocumentType]) -> String {
    cycle
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
