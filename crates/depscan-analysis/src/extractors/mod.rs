//! Per-language dependency extraction.
//!
//! Every language shares the same three passes (module, struct, method),
//! driven by its grammar. [`LanguageExtractor`] is a closed set with one
//! variant per registered grammar; the few language-specific steps (import
//! blocks, module-name cleanup) dispatch on the variant.

pub mod method_layer;
pub mod module_layer;
pub mod struct_layer;
pub mod types;

pub use types::{DependencyDetail, ExtractedDependency, LineIndex};

use std::path::Path;

use depscan_core::errors::ExtractError;

use crate::grammar::{grammar_for, Layer, LanguageGrammar, LayerMask};
use crate::patterns::{CompiledPatterns, PatternCache};
use crate::scanner::language_detect::Language;

/// Shared state for one file's extraction.
pub struct ExtractContext<'a> {
    pub patterns: &'a PatternCache,
    pub grammar: &'static LanguageGrammar,
    pub path: &'a Path,
    pub content: &'a str,
    pub lines: LineIndex,
}

impl<'a> ExtractContext<'a> {
    pub fn new(patterns: &'a PatternCache, language: Language, path: &'a Path, content: &'a str) -> Self {
        Self {
            patterns,
            grammar: grammar_for(language),
            path,
            content,
            lines: LineIndex::new(content),
        }
    }

    pub fn language(&self) -> Language {
        self.grammar.language
    }

    /// Compiled patterns for `layer`, or an error naming the missing set.
    pub fn layer_patterns(&self, layer: Layer) -> Result<&'a CompiledPatterns, ExtractError> {
        self.patterns
            .lookup(self.language(), layer)
            .ok_or_else(|| ExtractError::PatternsUnavailable {
                language: self.language().name().to_string(),
                layer: layer.name().to_string(),
            })
    }

    /// Build a record for a match at byte `offset`.
    pub fn record(
        &self,
        target: String,
        layer: Layer,
        offset: usize,
        detail: Option<DependencyDetail>,
    ) -> ExtractedDependency {
        ExtractedDependency {
            source: self.path.to_path_buf(),
            target,
            layer,
            language: self.language(),
            line: self.lines.line_of(offset),
            detail,
        }
    }
}

/// Extraction entry point for one language.
pub trait Extractor {
    fn language(&self) -> Language;

    /// Extract dependencies for the enabled `layers`, in layer order
    /// (module, struct, method).
    fn extract(
        &self,
        patterns: &PatternCache,
        path: &Path,
        content: &str,
        layers: LayerMask,
    ) -> Result<Vec<ExtractedDependency>, ExtractError>;
}

/// One variant per registered grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageExtractor {
    Rust,
    C,
    JavaScript,
    Go,
    Python,
    Java,
    Php,
    Ruby,
    Svelte,
}

impl LanguageExtractor {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Rust => Self::Rust,
            Language::C => Self::C,
            Language::JavaScript => Self::JavaScript,
            Language::Go => Self::Go,
            Language::Python => Self::Python,
            Language::Java => Self::Java,
            Language::Php => Self::Php,
            Language::Ruby => Self::Ruby,
            Language::Svelte => Self::Svelte,
        }
    }

    /// Clean a captured module name. Returns `None` when nothing is left.
    pub fn normalize_module(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'' || c == ';');
        let cleaned = match self {
            Self::Rust => trimmed.trim_end_matches("::"),
            Self::Php => trimmed.trim_start_matches('\\'),
            _ => trimmed,
        };
        let cleaned = cleaned.trim();
        (!cleaned.is_empty()).then(|| cleaned.to_string())
    }

    /// Whether this language expands grouped import blocks.
    pub fn has_import_blocks(&self) -> bool {
        matches!(self, Self::Go)
    }
}

impl Extractor for LanguageExtractor {
    fn language(&self) -> Language {
        match self {
            Self::Rust => Language::Rust,
            Self::C => Language::C,
            Self::JavaScript => Language::JavaScript,
            Self::Go => Language::Go,
            Self::Python => Language::Python,
            Self::Java => Language::Java,
            Self::Php => Language::Php,
            Self::Ruby => Language::Ruby,
            Self::Svelte => Language::Svelte,
        }
    }

    fn extract(
        &self,
        patterns: &PatternCache,
        path: &Path,
        content: &str,
        layers: LayerMask,
    ) -> Result<Vec<ExtractedDependency>, ExtractError> {
        let ctx = ExtractContext::new(patterns, self.language(), path, content);
        let mut out = Vec::new();
        if layers.contains(Layer::Module) {
            module_layer::extract(&ctx, *self, &mut out)?;
        }
        if layers.contains(Layer::Struct) {
            struct_layer::extract(&ctx, &mut out)?;
        }
        if layers.contains(Layer::Method) {
            method_layer::extract(&ctx, &mut out)?;
        }
        Ok(out)
    }
}

/// Extract from `content`, detecting the language from `path`.
pub fn extract(
    patterns: &PatternCache,
    path: &Path,
    content: &str,
    layers: LayerMask,
) -> Result<Vec<ExtractedDependency>, ExtractError> {
    let language = Language::from_path(path).ok_or_else(|| ExtractError::UnsupportedLanguage {
        path: path.to_path_buf(),
    })?;
    extract_language(patterns, language, path, content, layers)
}

/// Extract from `content` with an explicit language.
pub fn extract_language(
    patterns: &PatternCache,
    language: Language,
    path: &Path,
    content: &str,
    layers: LayerMask,
) -> Result<Vec<ExtractedDependency>, ExtractError> {
    LanguageExtractor::for_language(language).extract(patterns, path, content, layers)
}
