//! Structure index: where each type is defined and which files mention it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aho_corasick::{AhoCorasick, MatchKind};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extractors::{DependencyDetail, ExtractedDependency};
use crate::grammar::Layer;

/// One declared structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureEntry {
    pub name: String,
    pub defined_in: PathBuf,
    pub line: u32,
    pub declaration: String,
    pub base: Option<String>,
    /// Other files containing the name as a whole word.
    pub referenced_in: BTreeSet<PathBuf>,
}

/// Name-keyed index over every STRUCT dependency. The first file to
/// declare a name owns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureIndex {
    entries: BTreeMap<String, StructureEntry>,
}

impl StructureIndex {
    /// Collect declarations from `deps`, then scan `contents` for
    /// whole-word mentions of every declared name.
    pub fn build(deps: &[ExtractedDependency], contents: &[(PathBuf, Arc<str>)]) -> Self {
        let mut entries: BTreeMap<String, StructureEntry> = BTreeMap::new();
        for dep in deps.iter().filter(|d| d.layer == Layer::Struct) {
            if entries.contains_key(&dep.target) {
                continue;
            }
            let (declaration, base) = match &dep.detail {
                Some(DependencyDetail::Struct { declaration, base }) => {
                    (declaration.clone(), base.clone())
                }
                _ => ("struct".to_string(), None),
            };
            entries.insert(
                dep.target.clone(),
                StructureEntry {
                    name: dep.target.clone(),
                    defined_in: dep.source.clone(),
                    line: dep.line,
                    declaration,
                    base,
                    referenced_in: BTreeSet::new(),
                },
            );
        }

        let mut index = Self { entries };
        index.link_references(contents);
        index
    }

    fn link_references(&mut self, contents: &[(PathBuf, Arc<str>)]) {
        if self.entries.is_empty() || contents.is_empty() {
            return;
        }
        let names: Vec<String> = self.entries.keys().cloned().collect();
        let automaton = match AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&names)
        {
            Ok(ac) => ac,
            Err(e) => {
                warn!(error = %e, "structure reference scan skipped");
                return;
            }
        };

        let hits: Vec<(&Path, BTreeSet<usize>)> = contents
            .par_iter()
            .map(|(path, text)| {
                let found = automaton
                    .find_iter(&**text)
                    .filter(|m| is_whole_word(text, m.start(), m.end()))
                    .map(|m| m.pattern().as_usize())
                    .collect();
                (path.as_path(), found)
            })
            .collect();

        for (path, found) in hits {
            for id in found {
                if let Some(entry) = self.entries.get_mut(&names[id]) {
                    if entry.defined_in != path {
                        entry.referenced_in.insert(path.to_path_buf());
                    }
                }
            }
        }
        debug!(structures = self.entries.len(), files = contents.len(), "structure index linked");
    }

    pub fn get(&self, name: &str) -> Option<&StructureEntry> {
        self.entries.get(name)
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &StructureEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Structures declared with `base` as parent.
    pub fn derived_from<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a StructureEntry> + 'a {
        self.entries
            .values()
            .filter(move |e| e.base.as_deref() == Some(base))
    }
}

fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    let before = text[..start].chars().next_back().is_some_and(is_ident);
    let after = text[end..].chars().next().is_some_and(is_ident);
    !before && !after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::language_detect::Language;

    fn decl(file: &str, name: &str, base: Option<&str>) -> ExtractedDependency {
        ExtractedDependency {
            source: PathBuf::from(file),
            target: name.to_string(),
            layer: Layer::Struct,
            language: Language::Java,
            line: 1,
            detail: Some(DependencyDetail::Struct {
                declaration: "class".into(),
                base: base.map(str::to_string),
            }),
        }
    }

    #[test]
    fn references_are_whole_words_from_other_files() {
        let deps = vec![decl("A.java", "Shape", None), decl("B.java", "Circle", Some("Shape"))];
        let contents: Vec<(PathBuf, Arc<str>)> = vec![
            (PathBuf::from("A.java"), Arc::from("class Shape {}")),
            (PathBuf::from("B.java"), Arc::from("class Circle extends Shape {}")),
            (PathBuf::from("C.java"), Arc::from("ShapeFactory f; Circle c;")),
        ];
        let index = StructureIndex::build(&deps, &contents);

        let shape = index.get("Shape").unwrap();
        assert_eq!(shape.referenced_in, BTreeSet::from([PathBuf::from("B.java")]));
        let circle = index.get("Circle").unwrap();
        assert_eq!(circle.referenced_in, BTreeSet::from([PathBuf::from("C.java")]));
        assert_eq!(index.derived_from("Shape").count(), 1);
    }

    #[test]
    fn first_declaration_wins() {
        let deps = vec![decl("A.java", "Node", None), decl("B.java", "Node", None)];
        let index = StructureIndex::build(&deps, &[]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("Node").unwrap().defined_in, PathBuf::from("A.java"));
    }

    #[test]
    fn whole_word_boundaries() {
        assert!(is_whole_word("a Foo b", 2, 5));
        assert!(!is_whole_word("aFoo", 1, 4));
        assert!(!is_whole_word("Foo_x", 0, 3));
    }
}
