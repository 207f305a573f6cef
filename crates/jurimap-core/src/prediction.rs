//! Ranked article prediction.

use serde::{Deserialize, Serialize};

/// One candidate article with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 1-based position in the descending-probability ranking.
    pub rank: u32,
    /// Predicted statutory article label.
    pub article: String,
    /// Predicted probability for this article.
    pub confidence: f64,
}
