//! Descriptive aggregate views over the loaded tables.

use std::collections::HashMap;

/// Per-table record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableInfo {
    pub cases: usize,
    pub laws: usize,
    pub links: usize,
}

/// Usage counts derived from the case↔law association table.
///
/// Each list is sorted by descending count, ties by key ascending.
#[derive(Debug, Clone, Default)]
pub struct LawStats {
    /// law_id → number of citing links (orphaned ids included).
    pub law_usage: Vec<(u64, usize)>,
    pub type_usage: Vec<(String, usize)>,
    pub clause_usage: Vec<(String, usize)>,
    pub point_usage: Vec<(String, usize)>,
}

/// Distributions over case metadata columns.
#[derive(Debug, Clone, Default)]
pub struct CaseStats {
    pub court_distribution: Vec<(String, usize)>,
    pub level_distribution: Vec<(String, usize)>,
    pub document_type_distribution: Vec<(String, usize)>,
}

/// Tally values into a count list sorted by descending count, key ascending.
pub(crate) fn ranked_counts<K: Ord + Clone + std::hash::Hash>(
    values: impl Iterator<Item = K>,
) -> Vec<(K, usize)> {
    let mut counts: HashMap<K, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_counts_orders_by_count_then_key() {
        let ranked = ranked_counts(["b", "a", "b", "c", "a", "b"].into_iter());
        assert_eq!(ranked, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn ranked_counts_breaks_ties_on_key() {
        let ranked = ranked_counts(["y", "x"].into_iter());
        assert_eq!(ranked, vec![("x", 1), ("y", 1)]);
    }
}
