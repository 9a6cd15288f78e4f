//! Process-wide method table: name-keyed definitions linked by calls.
//!
//! Ingestion is order-independent: each file's outgoing callee names are
//! remembered, so a definition created after its callers were ingested
//! still picks up their references.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use depscan_core::errors::CallGraphError;
use depscan_core::types::{FxHashMap, FxHashSet};

use super::types::{CallGraphStats, DefinitionConflict, IngestReport, MethodDefinition};
use crate::extractors::ExtractedDependency;
use crate::grammar::Layer;

/// One method as a single file defines it, owned or not.
#[derive(Debug, Clone)]
struct FileMethod {
    line: u32,
    return_type: Option<String>,
    calls: Vec<String>,
}

impl FileMethod {
    fn from_dependency(dep: &ExtractedDependency) -> Self {
        Self {
            line: dep.line,
            return_type: dep.return_type().map(str::to_string),
            calls: dep.calls().to_vec(),
        }
    }

    fn to_definition(&self, name: &str, path: &Path) -> MethodDefinition {
        let mut def = MethodDefinition::new(name, path);
        def.line = self.line;
        def.return_type = self.return_type.clone();
        def.dependencies = self.calls.clone();
        def
    }
}

#[derive(Debug, Default)]
struct TableState {
    methods: FxHashMap<String, MethodDefinition>,
    /// Methods each ingested file defines, including rejected ones.
    defs_by_file: FxHashMap<PathBuf, FxHashMap<String, FileMethod>>,
    /// Callee names referenced by each ingested file.
    calls_by_file: FxHashMap<PathBuf, FxHashSet<String>>,
    conflicts: Vec<DefinitionConflict>,
}

impl TableState {
    /// `owner` no longer defines `name`. The earliest rejected definer
    /// takes over, rebuilt from its own recorded definition; otherwise the
    /// name is dropped.
    fn release(&mut self, name: &str, owner: &Path) {
        self.methods.remove(name);
        let Some(pos) = self.conflicts.iter().position(|c| c.name == name && c.owner == owner) else {
            return;
        };
        let heir = self.conflicts.remove(pos).rejected;
        for conflict in self.conflicts.iter_mut().filter(|c| c.name == name && c.owner == owner) {
            conflict.owner = heir.clone();
        }

        let Some(mut def) = self
            .defs_by_file
            .get(&heir)
            .and_then(|defs| defs.get(name))
            .map(|method| method.to_definition(name, &heir))
        else {
            return;
        };
        def.references.extend(self.callers_of(name));
        self.methods.insert(name.to_string(), def);
        debug!(method = %name, owner = %heir.display(), "definition handed to next definer");
    }

    /// Drop the references `path` contributed on its previous ingestion.
    fn unlink_file(&mut self, path: &Path) {
        if let Some(previous) = self.calls_by_file.remove(path) {
            for callee in &previous {
                if let Some(def) = self.methods.get_mut(callee) {
                    def.references.remove(path);
                }
            }
        }
    }

    /// Files whose recorded calls name `callee`.
    fn callers_of(&self, callee: &str) -> Vec<PathBuf> {
        self.calls_by_file
            .iter()
            .filter(|(_, callees)| callees.contains(callee))
            .map(|(path, _)| path.clone())
            .collect()
    }
}

/// Mutex-guarded method table, shared between workers via `Arc`.
#[derive(Debug, Default)]
pub struct MethodTable {
    state: Mutex<TableState>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, TableState>, CallGraphError> {
        self.state.lock().map_err(|_| CallGraphError::LockPoisoned)
    }

    /// Merge one file's METHOD dependencies into the table.
    ///
    /// Re-ingesting a file replaces its previous contribution: definitions
    /// it owns are rebuilt (or dropped when gone) and its old references
    /// are unlinked before the new ones are added.
    pub fn ingest_file(
        &self,
        path: &Path,
        deps: &[ExtractedDependency],
    ) -> Result<IngestReport, CallGraphError> {
        let mut state = self.lock()?;
        let mut report = IngestReport::default();

        state.unlink_file(path);

        let methods: Vec<&ExtractedDependency> =
            deps.iter().filter(|d| d.layer == Layer::Method).collect();
        let defined_here: FxHashMap<String, FileMethod> = methods
            .iter()
            .map(|d| (d.target.clone(), FileMethod::from_dependency(d)))
            .collect();

        state
            .conflicts
            .retain(|c| c.rejected != path || defined_here.contains_key(&c.name));
        let stale: Vec<String> = state
            .methods
            .values()
            .filter(|def| def.defined_in == path && !defined_here.contains_key(&def.name))
            .map(|def| def.name.clone())
            .collect();
        if defined_here.is_empty() {
            state.defs_by_file.remove(path);
        } else {
            state.defs_by_file.insert(path.to_path_buf(), defined_here);
        }
        for name in stale {
            state.release(&name, path);
            report.removed += 1;
        }

        let mut file_callees: FxHashSet<String> = FxHashSet::default();
        for dep in &methods {
            file_callees.extend(dep.calls().iter().cloned());
            let owner = state.methods.get(&dep.target).map(|d| d.defined_in.clone());
            match owner {
                None => {
                    let mut def = FileMethod::from_dependency(dep).to_definition(&dep.target, path);
                    def.references.extend(state.callers_of(&dep.target));
                    state.methods.insert(dep.target.clone(), def);
                    report.created += 1;
                }
                Some(owner) if owner == path => {
                    if let Some(def) = state.methods.get_mut(&dep.target) {
                        def.line = dep.line;
                        def.return_type = dep.return_type().map(str::to_string);
                        def.dependencies.clear();
                        def.dependencies.extend(dep.calls().iter().cloned());
                    }
                    report.updated += 1;
                }
                Some(owner) => {
                    warn!(
                        method = %dep.target,
                        owner = %owner.display(),
                        rejected = %path.display(),
                        "method defined in more than one file, keeping first definition"
                    );
                    let conflict = DefinitionConflict {
                        name: dep.target.clone(),
                        owner,
                        rejected: path.to_path_buf(),
                    };
                    if !state.conflicts.contains(&conflict) {
                        state.conflicts.push(conflict);
                    }
                    report.conflicts += 1;
                }
            }
        }

        for callee in &file_callees {
            if let Some(def) = state.methods.get_mut(callee) {
                def.references.insert(path.to_path_buf());
                report.references_linked += 1;
            }
        }
        if !file_callees.is_empty() {
            state.calls_by_file.insert(path.to_path_buf(), file_callees);
        }

        debug!(
            file = %path.display(),
            created = report.created,
            updated = report.updated,
            removed = report.removed,
            linked = report.references_linked,
            "ingested file into method table"
        );
        Ok(report)
    }

    /// Forget everything `path` contributed. Names it owned pass to the
    /// next file defining them. Returns the number of names it owned.
    pub fn remove_file(&self, path: &Path) -> Result<usize, CallGraphError> {
        let mut state = self.lock()?;
        state.unlink_file(path);
        state.defs_by_file.remove(path);
        state.conflicts.retain(|c| c.rejected != path);
        let owned: Vec<String> = state
            .methods
            .values()
            .filter(|def| def.defined_in == path)
            .map(|def| def.name.clone())
            .collect();
        for name in &owned {
            state.release(name, path);
        }
        Ok(owned.len())
    }

    pub fn get(&self, name: &str) -> Result<Option<MethodDefinition>, CallGraphError> {
        Ok(self.lock()?.methods.get(name).cloned())
    }

    /// Like [`get`](Self::get) but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<MethodDefinition, CallGraphError> {
        self.get(name)?.ok_or_else(|| CallGraphError::UnknownMethod {
            name: name.to_string(),
        })
    }

    /// All definitions, sorted by name.
    pub fn snapshot(&self) -> Result<Vec<MethodDefinition>, CallGraphError> {
        let state = self.lock()?;
        let mut defs: Vec<MethodDefinition> = state.methods.values().cloned().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(defs)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.methods.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn conflicts(&self) -> Result<Vec<DefinitionConflict>, CallGraphError> {
        Ok(self.lock()?.conflicts.clone())
    }

    pub fn clear(&self) -> Result<(), CallGraphError> {
        let mut state = self.lock()?;
        *state = TableState::default();
        Ok(())
    }

    pub fn stats(&self) -> Result<CallGraphStats, CallGraphError> {
        let state = self.lock()?;
        let mut stats = CallGraphStats {
            methods: state.methods.len(),
            conflicts: state.conflicts.len(),
            ..Default::default()
        };
        let mut files: FxHashSet<&Path> = FxHashSet::default();
        for def in state.methods.values() {
            files.insert(def.defined_in.as_path());
            stats.call_edges += def.dependencies.len();
            stats.resolved_edges += def
                .dependencies
                .iter()
                .filter(|callee| state.methods.contains_key(*callee))
                .count();
            stats.references += def.references.len();
        }
        stats.files = files.len();
        Ok(stats)
    }
}
