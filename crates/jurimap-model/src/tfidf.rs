//! Bag-of-words TF-IDF vectorizer.
//!
//! Fit on training texts only: tokenize, emit unigrams and bigrams, drop
//! terms outside the document-frequency cutoffs, cap the vocabulary at the
//! highest corpus-frequency terms, weight with smoothed IDF and L2-normalize
//! each document vector. `transform` ignores terms outside the vocabulary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use jurimap_core::TfidfParams;

use crate::ModelError;

/// A sparse document vector: `(feature index, weight)` sorted by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVec {
    pub entries: Vec<(u32, f64)>,
}

impl SparseVec {
    /// Weight of one feature, zero when absent.
    pub fn get(&self, index: u32) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}

/// Fitted TF-IDF vectorizer state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    params: TfidfParams,
    /// term → feature index, indices assigned in sorted term order.
    vocabulary: HashMap<String, u32>,
    /// Smoothed IDF per feature index: `ln((1+n)/(1+df)) + 1`.
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit vocabulary and IDF weights on a corpus.
    pub fn fit(params: TfidfParams, texts: &[String]) -> Result<Self, ModelError> {
        let n_docs = texts.len();
        let max_df_count = (params.max_df * n_docs as f64).floor() as usize;

        // Document frequency and total corpus frequency per term.
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut corpus_freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            let counts = term_counts(text, params.ngram_max);
            for (term, count) in counts {
                *df.entry(term.clone()).or_insert(0) += 1;
                *corpus_freq.entry(term).or_insert(0) += count;
            }
        }

        // Apply document-frequency cutoffs.
        let mut kept: Vec<(String, usize)> = df
            .iter()
            .filter(|&(_, &d)| d >= params.min_df && d <= max_df_count)
            .map(|(term, _)| (term.clone(), corpus_freq[term]))
            .collect();
        if kept.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        // Cap the vocabulary: keep the most frequent terms, ties by term.
        if kept.len() > params.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            kept.truncate(params.max_features);
        }

        // Feature indices follow sorted term order.
        let mut terms: Vec<String> = kept.into_iter().map(|(t, _)| t).collect();
        terms.sort();
        let vocabulary: HashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();

        let idf: Vec<f64> = terms
            .iter()
            .map(|t| (((1 + n_docs) as f64) / ((1 + df[t]) as f64)).ln() + 1.0)
            .collect();

        info!(
            vocabulary = vocabulary.len(),
            docs = n_docs,
            "fitted tf-idf vectorizer"
        );
        Ok(Self {
            params,
            vocabulary,
            idf,
        })
    }

    /// Vectorize one document with the fitted vocabulary.
    pub fn transform(&self, text: &str) -> SparseVec {
        let counts = term_counts(text, self.params.ngram_max);
        let mut entries: Vec<(u32, f64)> = counts
            .into_iter()
            .filter_map(|(term, count)| {
                let &idx = self.vocabulary.get(&term)?;
                Some((idx, count as f64 * self.idf[idx as usize]))
            })
            .collect();
        entries.sort_by_key(|&(i, _)| i);

        // L2 row normalization.
        let norm: f64 = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        SparseVec { entries }
    }

    /// Vectorize a batch of documents.
    pub fn transform_batch(&self, texts: &[String]) -> Vec<SparseVec> {
        texts.iter().map(|t| self.transform(t)).collect()
    }

    /// Number of features in the fitted vocabulary.
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Feature index for a term, when in vocabulary.
    pub fn feature_index(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }
}

/// Lowercased alphanumeric tokens of length ≥ 2.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Term counts for one document: unigrams plus n-grams up to `ngram_max`.
fn term_counts(text: &str, ngram_max: usize) -> HashMap<String, usize> {
    let tokens = tokenize(text);
    let mut counts = HashMap::new();
    for n in 1..=ngram_max.max(1) {
        if tokens.len() < n {
            break;
        }
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(min_df: usize, max_df: f64, max_features: usize) -> TfidfParams {
        TfidfParams {
            max_features,
            ngram_max: 2,
            min_df,
            max_df,
        }
    }

    fn corpus() -> Vec<String> {
        vec![
            "the defendant stole property".to_string(),
            "the defendant used violence".to_string(),
            "the court ruled on property".to_string(),
            "violence against property owners".to_string(),
        ]
    }

    #[test]
    fn tokenizer_drops_short_and_non_alphanumeric() {
        assert_eq!(tokenize("A knife, a wound; x!"), vec!["knife", "wound"]);
    }

    #[test]
    fn bigrams_are_emitted() {
        let counts = term_counts("stole the property", 2);
        assert_eq!(counts["stole the"], 1);
        assert_eq!(counts["the property"], 1);
        assert_eq!(counts["stole"], 1);
    }

    #[test]
    fn min_df_filters_rare_terms() {
        let v = TfidfVectorizer::fit(params(2, 1.0, 5000), &corpus()).unwrap();
        // "property" appears in 3 docs, survives; "stole" in 1 doc, dropped.
        assert!(v.feature_index("property").is_some());
        assert!(v.feature_index("stole").is_none());
    }

    #[test]
    fn max_df_filters_ubiquitous_terms() {
        let v = TfidfVectorizer::fit(params(1, 0.6, 5000), &corpus()).unwrap();
        // "the" appears in 3/4 docs (0.75 > 0.6), dropped.
        assert!(v.feature_index("the").is_none());
        assert!(v.feature_index("violence").is_some());
    }

    #[test]
    fn max_features_keeps_most_frequent() {
        let v = TfidfVectorizer::fit(params(1, 1.0, 2), &corpus()).unwrap();
        assert_eq!(v.n_features(), 2);
        // "the" (4 occurrences) and "property" (3) beat everything else.
        assert!(v.feature_index("the").is_some());
        assert!(v.feature_index("property").is_some());
    }

    #[test]
    fn cutoffs_can_empty_the_vocabulary() {
        let err = TfidfVectorizer::fit(params(10, 1.0, 5000), &corpus()).unwrap_err();
        assert!(matches!(err, ModelError::EmptyVocabulary));
    }

    #[test]
    fn transform_is_l2_normalized() {
        let v = TfidfVectorizer::fit(params(1, 1.0, 5000), &corpus()).unwrap();
        let vec = v.transform("the defendant stole property");
        let norm: f64 = vec.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn transform_ignores_unseen_terms() {
        let v = TfidfVectorizer::fit(params(1, 1.0, 5000), &corpus()).unwrap();
        let vec = v.transform("zebra quagga");
        assert!(vec.entries.is_empty());
    }

    #[test]
    fn sparse_get_returns_zero_for_absent_feature() {
        let vec = SparseVec {
            entries: vec![(2, 0.5), (7, 0.25)],
        };
        assert_eq!(vec.get(2), 0.5);
        assert_eq!(vec.get(3), 0.0);
    }
}
