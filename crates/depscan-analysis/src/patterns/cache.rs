//! Pattern cache: compiles every grammar pattern once, up front.
//!
//! The cache is an owned value handed to whoever needs it (usually behind
//! an `Arc`). After [`PatternCache::initialize`] it is read-only, so lookups
//! from worker threads need no locking.

use regex::Regex;
use tracing::{debug, info};

use depscan_core::errors::PatternError;
use depscan_core::types::FxHashMap;

use crate::grammar::{self, Layer, LanguageGrammar, PatternRole};
use crate::scanner::language_detect::Language;

/// One compiled pattern and what it is used for.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub role: PatternRole,
}

/// Compiled patterns for one (language, layer) pair, in declaration order.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    language: Language,
    layer: Layer,
    patterns: Vec<CompiledPattern>,
    import_block: Option<Regex>,
}

impl CompiledPatterns {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    /// Method-definition patterns.
    pub fn definitions(&self) -> impl Iterator<Item = &Regex> {
        self.by_role(PatternRole::Definition)
    }

    /// Call-token patterns used when scanning method bodies.
    pub fn calls(&self) -> impl Iterator<Item = &Regex> {
        self.by_role(PatternRole::Call)
    }

    /// Grouped-import pattern, MODULE layer only.
    pub fn import_block(&self) -> Option<&Regex> {
        self.import_block.as_ref()
    }

    fn by_role(&self, role: PatternRole) -> impl Iterator<Item = &Regex> {
        self.patterns
            .iter()
            .filter(move |p| p.role == role)
            .map(|p| &p.regex)
    }
}

/// Read-only store of compiled patterns for every registered grammar.
#[derive(Debug, Default)]
pub struct PatternCache {
    sets: FxHashMap<(Language, Layer), CompiledPatterns>,
    initialized: bool,
}

impl PatternCache {
    /// Compile every pattern of every grammar. Fails on the first pattern
    /// that does not compile, naming it by language, layer and index.
    pub fn initialize() -> Result<Self, PatternError> {
        let mut sets = FxHashMap::default();
        for grammar in grammar::all() {
            for layer in Layer::ALL {
                let compiled = compile_layer(grammar, layer)?;
                debug!(
                    language = %grammar.language,
                    layer = %layer,
                    patterns = compiled.pattern_count(),
                    "compiled grammar layer"
                );
                sets.insert((grammar.language, layer), compiled);
            }
        }
        let cache = Self {
            sets,
            initialized: true,
        };
        info!(
            languages = Language::ALL.len(),
            patterns = cache.total_patterns(),
            "pattern cache initialized"
        );
        Ok(cache)
    }

    /// Compiled patterns for a language and layer. `None` before
    /// initialization or after shutdown.
    pub fn lookup(&self, language: Language, layer: Layer) -> Option<&CompiledPatterns> {
        if !self.initialized {
            return None;
        }
        self.sets.get(&(language, layer))
    }

    /// Lookup by registry index; out-of-range indices yield `None`.
    pub fn lookup_index(&self, index: usize, layer: Layer) -> Option<&CompiledPatterns> {
        Language::from_index(index).and_then(|lang| self.lookup(lang, layer))
    }

    /// Lookup that reports an uninitialized cache as an error.
    pub fn require(&self, language: Language, layer: Layer) -> Result<&CompiledPatterns, PatternError> {
        self.lookup(language, layer).ok_or(PatternError::Uninitialized)
    }

    /// Release every compiled pattern. Later lookups return `None`.
    pub fn shutdown(&mut self) {
        self.sets.clear();
        self.initialized = false;
        debug!("pattern cache shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Total compiled patterns across all languages and layers.
    pub fn total_patterns(&self) -> usize {
        self.sets.values().map(|s| s.pattern_count()).sum()
    }
}

fn compile_layer(grammar: &LanguageGrammar, layer: Layer) -> Result<CompiledPatterns, PatternError> {
    let failed = |index: usize, err: regex::Error| PatternError::CompilationFailed {
        language: grammar.language.name().to_string(),
        layer: layer.name().to_string(),
        index,
        message: err.to_string(),
    };

    let mut patterns = Vec::with_capacity(grammar.pattern_count(layer));
    for (index, (source, role)) in grammar.patterns(layer).into_iter().enumerate() {
        let regex = Regex::new(source).map_err(|e| failed(index, e))?;
        patterns.push(CompiledPattern { regex, role });
    }

    let import_block = match (layer, grammar.import_block) {
        (Layer::Module, Some(source)) => {
            Some(Regex::new(source).map_err(|e| failed(patterns.len(), e))?)
        }
        _ => None,
    };

    Ok(CompiledPatterns {
        language: grammar.language,
        layer,
        patterns,
        import_block,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cache_is_uninitialized() {
        let cache = PatternCache::default();
        assert!(!cache.is_initialized());
        assert!(cache.lookup(Language::Rust, Layer::Module).is_none());
        assert!(matches!(
            cache.require(Language::Rust, Layer::Module),
            Err(PatternError::Uninitialized)
        ));
    }

    #[test]
    fn compiled_counts_match_grammar() {
        let cache = PatternCache::initialize().unwrap();
        for grammar in grammar::all() {
            for layer in Layer::ALL {
                let set = cache.lookup(grammar.language, layer).unwrap();
                assert_eq!(set.pattern_count(), grammar.pattern_count(layer));
                assert_eq!(set.language(), grammar.language);
                assert_eq!(set.layer(), layer);
            }
        }
    }

    #[test]
    fn import_block_only_on_module_layer() {
        let cache = PatternCache::initialize().unwrap();
        assert!(cache.lookup(Language::Go, Layer::Module).unwrap().import_block().is_some());
        assert!(cache.lookup(Language::Go, Layer::Method).unwrap().import_block().is_none());
        assert!(cache.lookup(Language::Rust, Layer::Module).unwrap().import_block().is_none());
    }
}
