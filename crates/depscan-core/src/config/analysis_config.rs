//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Which layers to extract and which derived indexes to build.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Layers to extract: any of "module", "struct", "method". Empty means all.
    #[serde(default)]
    pub layers: Vec<String>,
    /// Report cycles in the method call graph. Default: true.
    pub detect_cycles: Option<bool>,
    /// Build the structure reference index. Default: true.
    pub structure_index: Option<bool>,
}

impl AnalysisConfig {
    /// Returns true when `layer` should be extracted.
    pub fn layer_enabled(&self, layer: &str) -> bool {
        self.layers.is_empty() || self.layers.iter().any(|l| l.eq_ignore_ascii_case(layer))
    }

    pub fn effective_detect_cycles(&self) -> bool {
        self.detect_cycles.unwrap_or(true)
    }

    pub fn effective_structure_index(&self) -> bool {
        self.structure_index.unwrap_or(true)
    }
}
