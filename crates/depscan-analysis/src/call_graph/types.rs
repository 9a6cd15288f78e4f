//! Call graph types: method definitions, conflicts, ingest reports, stats.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A method known to the table. At most one exists per name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    /// File that first defined the name.
    pub defined_in: PathBuf,
    pub line: u32,
    pub return_type: Option<String>,
    /// Distinct callees, ordered by first sighting in the body.
    pub dependencies: Vec<String>,
    /// Distinct files whose methods call this one.
    pub references: BTreeSet<PathBuf>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, defined_in: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            defined_in: defined_in.into(),
            line: 0,
            return_type: None,
            dependencies: Vec::new(),
            references: BTreeSet::new(),
        }
    }

    pub fn is_referenced(&self) -> bool {
        !self.references.is_empty()
    }
}

/// A second file tried to define a name that already has an owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinitionConflict {
    pub name: String,
    pub owner: PathBuf,
    pub rejected: PathBuf,
}

/// What one `ingest_file` call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    pub conflicts: usize,
    /// Callees of this file that resolved to a known definition.
    pub references_linked: usize,
}

/// Table-wide counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphStats {
    pub methods: usize,
    pub files: usize,
    /// Total outgoing call names across all definitions.
    pub call_edges: usize,
    /// Outgoing calls whose callee is itself a known definition.
    pub resolved_edges: usize,
    pub references: usize,
    pub conflicts: usize,
}

impl CallGraphStats {
    /// Fraction of call edges that resolved to a known definition.
    pub fn resolution_rate(&self) -> f64 {
        if self.call_edges == 0 {
            0.0
        } else {
            self.resolved_edges as f64 / self.call_edges as f64
        }
    }
}
