//! Analysis layers and layer bitmasks.

use serde::{Deserialize, Serialize};

/// Granularity of a dependency relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Module,
    Struct,
    Method,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Module, Layer::Struct, Layer::Method];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Module => "module",
            Layer::Struct => "struct",
            Layer::Method => "method",
        }
    }

    /// Parse a layer name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Layer> {
        Self::ALL
            .into_iter()
            .find(|layer| layer.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of layers, used for per-layer enable flags and renderer filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(u8);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const MODULE: LayerMask = LayerMask(1 << 0);
    pub const STRUCT: LayerMask = LayerMask(1 << 1);
    pub const METHOD: LayerMask = LayerMask(1 << 2);
    pub const ALL: LayerMask = LayerMask(0b111);

    pub fn of(layer: Layer) -> LayerMask {
        match layer {
            Layer::Module => Self::MODULE,
            Layer::Struct => Self::STRUCT,
            Layer::Method => Self::METHOD,
        }
    }

    /// Build a mask from layer names; an empty list means every layer.
    /// Unknown names are ignored (config validation rejects them earlier).
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> LayerMask {
        if names.is_empty() {
            return Self::ALL;
        }
        names
            .iter()
            .filter_map(|n| Layer::from_name(n.as_ref()))
            .fold(Self::NONE, |mask, layer| mask.with(layer))
    }

    pub fn contains(&self, layer: Layer) -> bool {
        self.0 & Self::of(layer).0 != 0
    }

    #[must_use]
    pub fn with(self, layer: Layer) -> LayerMask {
        LayerMask(self.0 | Self::of(layer).0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        Layer::ALL.into_iter().filter(|l| self.contains(*l))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}
