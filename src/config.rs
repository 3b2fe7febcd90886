//! Runtime configuration for a [`ShatterSystem`](crate::shatter::ShatterSystem)

use crate::float_types::Real;

/// Tunables for pattern loading and shattering.
///
/// ```
/// # use meshshatter::config::ShatterConfig;
/// let config = ShatterConfig::default().with_seed(7).with_pattern_prefix("ShatterPlanes");
/// assert_eq!(config.canonical_radius, 5.0);
/// assert_eq!(config.pattern_prefix, "ShatterPlanes");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShatterConfig {
    /// Radius every pattern is authored for. Meshes are uniformly scaled so
    /// their bounding sphere matches it in shatter space.
    pub canonical_radius: Real,
    /// Hierarchies are looked up as `"{pattern_prefix}{index}"`.
    pub pattern_prefix: String,
    /// Pivot holding the first cutting plane. Pivot 0 is the hierarchy root.
    pub root_bone: usize,
    /// Patterns with this many pivots or more are rejected.
    pub max_fragments: usize,
    /// Seed for pattern selection; `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self {
            canonical_radius: 5.0,
            pattern_prefix: String::from("pattern"),
            root_bone: 1,
            max_fragments: 32,
            seed: None,
        }
    }
}

impl ShatterConfig {
    pub fn with_canonical_radius(mut self, radius: Real) -> Self {
        self.canonical_radius = radius;
        self
    }

    pub fn with_pattern_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.pattern_prefix = prefix.into();
        self
    }

    pub const fn with_root_bone(mut self, root_bone: usize) -> Self {
        self.root_bone = root_bone;
        self
    }

    pub const fn with_max_fragments(mut self, max_fragments: usize) -> Self {
        self.max_fragments = max_fragments;
        self
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Name of the `index`-th pattern hierarchy.
    pub fn pattern_name(&self, index: usize) -> String {
        format!("{}{}", self.pattern_prefix, index)
    }
}
