//! Language detection from file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Languages with a grammar in the registry.
///
/// Declaration order is the registry index used by [`Language::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
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

impl Language {
    /// Every language, in registry order.
    pub const ALL: [Language; 9] = [
        Language::Rust,
        Language::C,
        Language::JavaScript,
        Language::Go,
        Language::Python,
        Language::Java,
        Language::Php,
        Language::Ruby,
        Language::Svelte,
    ];

    /// Detect language from a file extension string.
    pub fn from_extension(ext: Option<&str>) -> Option<Language> {
        match ext? {
            "rs" => Some(Language::Rust),
            "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Some(Language::C),
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" | "mts" | "cts" => {
                Some(Language::JavaScript)
            }
            "go" => Some(Language::Go),
            "py" | "pyi" => Some(Language::Python),
            "java" => Some(Language::Java),
            "php" => Some(Language::Php),
            "rb" | "rake" => Some(Language::Ruby),
            "svelte" => Some(Language::Svelte),
            _ => None,
        }
    }

    /// Detect language from a path's extension.
    pub fn from_path(path: &Path) -> Option<Language> {
        Self::from_extension(path.extension().and_then(|e| e.to_str()))
    }

    /// Returns all file extensions associated with this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["rs"],
            Language::C => &["c", "h", "cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"],
            Language::Go => &["go"],
            Language::Python => &["py", "pyi"],
            Language::Java => &["java"],
            Language::Php => &["php"],
            Language::Ruby => &["rb", "rake"],
            Language::Svelte => &["svelte"],
        }
    }

    /// Returns the display name of the language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::C => "C",
            Language::JavaScript => "JavaScript",
            Language::Go => "Go",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
            Language::Svelte => "Svelte",
        }
    }

    /// Position in [`Language::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Inverse of [`Language::index`]; out-of-range yields `None`.
    pub fn from_index(index: usize) -> Option<Language> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_extension_maps_back() {
        for lang in Language::ALL {
            for ext in lang.extensions() {
                assert_eq!(Language::from_extension(Some(ext)), Some(lang), "{ext}");
            }
        }
    }

    #[test]
    fn index_round_trips() {
        for (i, lang) in Language::ALL.iter().enumerate() {
            assert_eq!(lang.index(), i);
            assert_eq!(Language::from_index(i), Some(*lang));
        }
        assert_eq!(Language::from_index(Language::ALL.len()), None);
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(Language::from_extension(Some("txt")), None);
        assert_eq!(Language::from_extension(None), None);
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
        assert_eq!(Language::from_path(Path::new("src/app.tsx")), Some(Language::JavaScript));
    }
}
