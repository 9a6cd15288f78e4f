//! Renderers over a finished [`DependencyGraph`].
//!
//! Every renderer reads the graph without modifying it and sees only
//! what [`RenderFilter`] lets through.

mod dot;
mod json;
mod terminal;

use std::io::{self, Write};

use depscan_analysis::call_graph::MethodDefinition;
use depscan_analysis::crawler::DependencyGraph;
use depscan_analysis::extractors::ExtractedDependency;
use depscan_analysis::grammar::{Layer, LayerMask};
use depscan_analysis::structures::StructureEntry;

use crate::args::OutputFormat;

/// Which dependencies reach the output.
#[derive(Debug, Clone)]
pub struct RenderFilter {
    pub layers: LayerMask,
    /// Keep a dependency only if its target or file contains one of these.
    pub include: Vec<String>,
    /// Drop a dependency if its target or file contains one of these.
    pub exclude: Vec<String>,
}

impl Default for RenderFilter {
    fn default() -> Self {
        Self {
            layers: LayerMask::ALL,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl RenderFilter {
    fn matches_text(&self, name: &str, file: &str) -> bool {
        let hit = |needle: &String| name.contains(needle.as_str()) || file.contains(needle.as_str());
        if self.exclude.iter().any(hit) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(hit)
    }

    pub fn accepts(&self, dep: &ExtractedDependency) -> bool {
        self.layers.contains(dep.layer)
            && self.matches_text(&dep.target, &dep.source.to_string_lossy())
    }

    pub fn accepts_method(&self, method: &MethodDefinition) -> bool {
        self.layers.contains(Layer::Method)
            && self.matches_text(&method.name, &method.defined_in.to_string_lossy())
    }

    pub fn accepts_structure(&self, entry: &StructureEntry) -> bool {
        self.layers.contains(Layer::Struct)
            && self.matches_text(&entry.name, &entry.defined_in.to_string_lossy())
    }

    pub fn dependencies<'a>(&'a self, graph: &'a DependencyGraph) -> impl Iterator<Item = &'a ExtractedDependency> + 'a {
        graph.dependencies.iter().filter(move |d| self.accepts(d))
    }

    pub fn methods<'a>(&'a self, graph: &'a DependencyGraph) -> impl Iterator<Item = &'a MethodDefinition> + 'a {
        graph.methods.iter().filter(move |m| self.accepts_method(m))
    }

    pub fn structures<'a>(&'a self, graph: &'a DependencyGraph) -> impl Iterator<Item = &'a StructureEntry> + 'a {
        graph.structures.iter().filter(move |s| self.accepts_structure(s))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub filter: RenderFilter,
    /// Include crawl statistics.
    pub stats: bool,
}

/// Write `graph` to `out` in the chosen format.
pub fn render(graph: &DependencyGraph, format: OutputFormat, options: &RenderOptions, out: &mut dyn Write) -> io::Result<()> {
    match format {
        OutputFormat::Terminal => terminal::write(graph, options, out),
        OutputFormat::Json => json::write(graph, options, out),
        OutputFormat::Dot => dot::write(graph, options, out),
    }
}

/// Render into an owned string.
pub fn render_to_string(graph: &DependencyGraph, format: OutputFormat, options: &RenderOptions) -> io::Result<String> {
    let mut buf = Vec::new();
    render(graph, format, options, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use depscan_analysis::scanner::Language;

    use super::*;

    fn dep(target: &str, layer: Layer, source: &str) -> ExtractedDependency {
        ExtractedDependency {
            source: PathBuf::from(source),
            target: target.to_string(),
            layer,
            language: Language::Python,
            line: 1,
            detail: None,
        }
    }

    #[test]
    fn exclude_beats_include() {
        let filter = RenderFilter {
            include: vec!["num".to_string()],
            exclude: vec!["numba".to_string()],
            ..RenderFilter::default()
        };
        assert!(filter.accepts(&dep("numpy", Layer::Module, "a.py")));
        assert!(!filter.accepts(&dep("numba", Layer::Module, "a.py")));
        assert!(!filter.accepts(&dep("pandas", Layer::Module, "a.py")));
    }

    #[test]
    fn include_matches_the_file_too() {
        let filter = RenderFilter {
            include: vec!["services/".to_string()],
            ..RenderFilter::default()
        };
        assert!(filter.accepts(&dep("requests", Layer::Module, "app/services/http.py")));
        assert!(!filter.accepts(&dep("requests", Layer::Module, "app/models.py")));
    }

    #[test]
    fn layer_mask_applies() {
        let filter = RenderFilter {
            layers: LayerMask::MODULE,
            ..RenderFilter::default()
        };
        assert!(filter.accepts(&dep("numpy", Layer::Module, "a.py")));
        assert!(!filter.accepts(&dep("Service", Layer::Struct, "a.py")));
    }
}
