//! Grammar registry: per-language declarative pattern tables.
//!
//! Each supported language has exactly one [`LanguageGrammar`], built from
//! static tables and never mutated. The engine is driven entirely by this
//! data, so supporting a new language means adding a [`Language`] variant
//! and a grammar entry in [`tables`].

pub mod layer;
pub mod stdlib;
pub mod tables;

pub use layer::{Layer, LayerMask};
pub use stdlib::StdlibFilter;

use crate::scanner::language_detect::Language;

/// How a method body is delimited in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    /// `{ ... }` bodies; definitions are told apart from prototypes by the
    /// brace-before-terminator rule.
    Braces,
    /// Indentation-delimited bodies (Python, Ruby); definitions start with
    /// one of the grammar's definition keywords.
    Indented,
}

/// What a method-layer pattern is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRole {
    /// Module import statement.
    Import,
    /// Struct/class/trait declaration.
    Structure,
    /// Candidate method definition (subject to the definition check).
    Definition,
    /// Call-like token, used when scanning a method body.
    Call,
}

/// One method-layer pattern with its role.
#[derive(Debug, Clone, Copy)]
pub struct MethodPattern {
    pub pattern: &'static str,
    pub role: PatternRole,
}

impl MethodPattern {
    pub const fn definition(pattern: &'static str) -> Self {
        Self {
            pattern,
            role: PatternRole::Definition,
        }
    }

    pub const fn call(pattern: &'static str) -> Self {
        Self {
            pattern,
            role: PatternRole::Call,
        }
    }
}

/// Immutable per-language analysis record.
#[derive(Debug)]
pub struct LanguageGrammar {
    pub language: Language,
    /// MODULE layer: capture group 1 is the imported name.
    pub module_patterns: &'static [&'static str],
    /// Optional grouped-import pattern (Go `import ( ... )`); group 1 is the block body.
    pub import_block: Option<&'static str>,
    /// STRUCT layer: the last non-empty positional group is the name, a
    /// `base` named group records inheritance.
    pub struct_patterns: &'static [&'static str],
    /// METHOD layer: `name` group is the method, optional `ret` group the return type.
    pub method_patterns: &'static [MethodPattern],
    /// Names never accepted as methods or calls.
    pub keywords: &'static [&'static str],
    /// Builtin type names, used to recognise return types.
    pub builtin_types: &'static [&'static str],
    /// Standard-library modules dropped from MODULE results.
    pub stdlib: StdlibFilter,
    pub body_style: BodyStyle,
    /// Leading keywords that mark a definition for [`BodyStyle::Indented`] grammars.
    pub definition_keywords: &'static [&'static str],
    /// Drop imports that start with `.` or `/`.
    pub skip_relative_imports: bool,
}

impl LanguageGrammar {
    /// Number of declared patterns for `layer`.
    pub fn pattern_count(&self, layer: Layer) -> usize {
        match layer {
            Layer::Module => self.module_patterns.len(),
            Layer::Struct => self.struct_patterns.len(),
            Layer::Method => self.method_patterns.len(),
        }
    }

    /// Declared patterns for `layer` with their roles, in order.
    pub fn patterns(&self, layer: Layer) -> Vec<(&'static str, PatternRole)> {
        match layer {
            Layer::Module => self
                .module_patterns
                .iter()
                .map(|p| (*p, PatternRole::Import))
                .collect(),
            Layer::Struct => self
                .struct_patterns
                .iter()
                .map(|p| (*p, PatternRole::Structure))
                .collect(),
            Layer::Method => self.method_patterns.iter().map(|p| (p.pattern, p.role)).collect(),
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    pub fn is_builtin_type(&self, word: &str) -> bool {
        self.builtin_types.contains(&word)
    }

    /// True when `module` belongs to this language's standard library.
    pub fn is_stdlib(&self, module: &str) -> bool {
        self.stdlib.matches(module)
    }
}

/// Grammar for `language`.
pub fn grammar_for(language: Language) -> &'static LanguageGrammar {
    match language {
        Language::Rust => &tables::RUST,
        Language::C => &tables::C,
        Language::JavaScript => &tables::JAVASCRIPT,
        Language::Go => &tables::GO,
        Language::Python => &tables::PYTHON,
        Language::Java => &tables::JAVA,
        Language::Php => &tables::PHP,
        Language::Ruby => &tables::RUBY,
        Language::Svelte => &tables::SVELTE,
    }
}

/// Every grammar, in registry order.
pub fn all() -> impl Iterator<Item = &'static LanguageGrammar> {
    Language::ALL.into_iter().map(grammar_for)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_language() {
        for lang in Language::ALL {
            assert_eq!(grammar_for(lang).language, lang);
        }
        assert_eq!(all().count(), Language::ALL.len());
    }

    #[test]
    fn every_grammar_has_definition_and_call_patterns() {
        for grammar in all() {
            let roles: Vec<_> = grammar.method_patterns.iter().map(|p| p.role).collect();
            assert!(roles.contains(&PatternRole::Definition), "{}", grammar.language);
            assert!(roles.contains(&PatternRole::Call), "{}", grammar.language);
            assert!(!grammar.module_patterns.is_empty(), "{}", grammar.language);
            assert!(!grammar.struct_patterns.is_empty(), "{}", grammar.language);
        }
    }

    #[test]
    fn indented_grammars_declare_definition_keywords() {
        for grammar in all() {
            if grammar.body_style == BodyStyle::Indented {
                assert!(!grammar.definition_keywords.is_empty(), "{}", grammar.language);
            }
        }
    }

    #[test]
    fn control_flow_words_are_keywords() {
        for grammar in all() {
            assert!(grammar.is_keyword("if"), "{}", grammar.language);
            assert!(!grammar.is_keyword("add"), "{}", grammar.language);
        }
    }
}
