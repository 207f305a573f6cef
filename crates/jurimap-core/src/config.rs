//! Model configuration with the demo defaults.

use serde::{Deserialize, Serialize};

/// TF-IDF vectorizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Vocabulary cap; the highest corpus-frequency terms are kept.
    pub max_features: usize,
    /// Largest n-gram emitted (1 = unigrams only, 2 = unigrams + bigrams).
    pub ngram_max: usize,
    /// Minimum document frequency (absolute count) for a term to survive.
    pub min_df: usize,
    /// Maximum document frequency as a fraction of the corpus.
    pub max_df: f64,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_max: 2,
            min_df: 2,
            max_df: 0.95,
        }
    }
}

/// Random-forest training settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Depth cap; `None` grows trees until pure or below `min_leaf`.
    pub max_depth: Option<usize>,
    /// Minimum samples per leaf.
    pub min_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_leaf: 1,
        }
    }
}
