//! Extraction result types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::grammar::Layer;
use crate::scanner::language_detect::Language;

/// One dependency edge found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedDependency {
    /// File the dependency was found in.
    pub source: PathBuf,
    /// Imported module, declared structure, or defined method name.
    pub target: String,
    pub layer: Layer,
    pub language: Language,
    /// 1-based line of the match.
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<DependencyDetail>,
}

/// Layer-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DependencyDetail {
    Struct {
        /// Declaring keyword (`struct`, `class`, `trait`, ...).
        declaration: String,
        /// Parent type or implemented trait, when declared.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<String>,
    },
    Method {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        return_type: Option<String>,
        /// Names called from the body, in first-seen order, deduplicated.
        #[serde(default)]
        calls: Vec<String>,
    },
}

impl ExtractedDependency {
    /// Calls recorded for a method dependency; empty for other layers.
    pub fn calls(&self) -> &[String] {
        match &self.detail {
            Some(DependencyDetail::Method { calls, .. }) => calls,
            _ => &[],
        }
    }

    pub fn return_type(&self) -> Option<&str> {
        match &self.detail {
            Some(DependencyDetail::Method { return_type, .. }) => return_type.as_deref(),
            _ => None,
        }
    }

    pub fn base(&self) -> Option<&str> {
        match &self.detail {
            Some(DependencyDetail::Struct { base, .. }) => base.as_deref(),
            _ => None,
        }
    }
}

/// Byte offset to line number lookup for one file.
#[derive(Debug)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        let line = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        u32::try_from(line + 1).unwrap_or(u32::MAX)
    }

    /// Byte offset of the start of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let idx = match self.starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert - 1,
        };
        self.starts[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_index_lookup() {
        let idx = LineIndex::new("a\nbc\n\nd");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(2), 2);
        assert_eq!(idx.line_of(3), 2);
        assert_eq!(idx.line_of(5), 3);
        assert_eq!(idx.line_of(6), 4);
        assert_eq!(idx.line_start(3), 2);
    }

    #[test]
    fn detail_serializes_with_tag() {
        let dep = ExtractedDependency {
            source: PathBuf::from("a.rs"),
            target: "main".into(),
            layer: Layer::Method,
            language: Language::Rust,
            line: 3,
            detail: Some(DependencyDetail::Method {
                return_type: None,
                calls: vec!["add".into()],
            }),
        };
        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(json["detail"]["kind"], "method");
        assert_eq!(json["detail"]["calls"][0], "add");
        assert_eq!(json["layer"], "method");
        assert_eq!(dep.calls(), ["add".to_string()]);
    }
}
