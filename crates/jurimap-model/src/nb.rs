//! Multinomial naive Bayes over TF-IDF weights.
//!
//! Stores log-probabilities in a flat `n_classes × n_features` table so the
//! scoring path is an indexed walk over the document's sparse entries.
//! Probabilities come out of a log-sum-exp normalization of the joint
//! log-likelihoods.

use serde::{Deserialize, Serialize};

use crate::tfidf::SparseVec;

const ALPHA: f64 = 1.0;

/// A fitted multinomial naive Bayes model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    n_classes: usize,
    n_features: usize,
    /// Row-major `n_classes × n_features` feature log-probabilities.
    log_prob: Vec<f64>,
    log_prior: Vec<f64>,
}

impl MultinomialNb {
    /// Fit from sparse documents and encoded class labels.
    pub fn fit(x: &[SparseVec], y: &[u32], n_classes: usize, n_features: usize) -> Self {
        let mut class_counts = vec![0usize; n_classes];
        let mut feature_totals = vec![0.0f64; n_classes * n_features];

        for (doc, &class) in x.iter().zip(y) {
            class_counts[class as usize] += 1;
            let row = class as usize * n_features;
            for &(idx, weight) in &doc.entries {
                feature_totals[row + idx as usize] += weight;
            }
        }

        let n_docs = x.len().max(1) as f64;
        let log_prior: Vec<f64> = class_counts
            .iter()
            .map(|&c| ((c as f64).max(f64::MIN_POSITIVE) / n_docs).ln())
            .collect();

        // Laplace smoothing per class row.
        let mut log_prob = vec![0.0f64; n_classes * n_features];
        for class in 0..n_classes {
            let row = class * n_features;
            let class_total: f64 =
                feature_totals[row..row + n_features].iter().sum::<f64>() + ALPHA * n_features as f64;
            for f in 0..n_features {
                log_prob[row + f] = ((feature_totals[row + f] + ALPHA) / class_total).ln();
            }
        }

        Self {
            n_classes,
            n_features,
            log_prob,
            log_prior,
        }
    }

    /// Joint log-likelihood per class for one document.
    fn log_joint(&self, doc: &SparseVec) -> Vec<f64> {
        (0..self.n_classes)
            .map(|class| {
                let row = class * self.n_features;
                let ll: f64 = doc
                    .entries
                    .iter()
                    .map(|&(idx, weight)| weight * self.log_prob[row + idx as usize])
                    .sum();
                self.log_prior[class] + ll
            })
            .collect()
    }

    /// Class probabilities for one document.
    pub fn predict_proba(&self, doc: &SparseVec) -> Vec<f64> {
        let joint = self.log_joint(doc);
        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = joint.iter().map(|&v| (v - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        exp.into_iter().map(|v| v / total).collect()
    }

    /// Most likely class for one document.
    pub fn predict(&self, doc: &SparseVec) -> u32 {
        let joint = self.log_joint(doc);
        let mut best = 0usize;
        for (i, &v) in joint.iter().enumerate() {
            if v > joint[best] {
                best = i;
            }
        }
        best as u32
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(entries: &[(u32, f64)]) -> SparseVec {
        SparseVec {
            entries: entries.to_vec(),
        }
    }

    /// Two classes with disjoint vocabulary: class 0 uses features 0-1,
    /// class 1 uses features 2-3.
    fn separable_fit() -> MultinomialNb {
        let x = vec![
            doc(&[(0, 1.0), (1, 0.5)]),
            doc(&[(0, 0.8), (1, 0.9)]),
            doc(&[(2, 1.0), (3, 0.5)]),
            doc(&[(2, 0.7), (3, 0.8)]),
        ];
        let y = vec![0, 0, 1, 1];
        MultinomialNb::fit(&x, &y, 2, 4)
    }

    #[test]
    fn separable_classes_predict_correctly() {
        let nb = separable_fit();
        assert_eq!(nb.predict(&doc(&[(0, 1.0)])), 0);
        assert_eq!(nb.predict(&doc(&[(3, 1.0)])), 1);
    }

    #[test]
    fn probabilities_sum_to_one_and_favor_true_class() {
        let nb = separable_fit();
        let probs = nb.predict_proba(&doc(&[(2, 1.0), (3, 1.0)]));
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(probs[1] > 0.5);
    }

    #[test]
    fn empty_document_falls_back_to_priors() {
        let x = vec![doc(&[(0, 1.0)]), doc(&[(0, 1.0)]), doc(&[(1, 1.0)])];
        let y = vec![0, 0, 1];
        let nb = MultinomialNb::fit(&x, &y, 2, 2);
        let probs = nb.predict_proba(&doc(&[]));
        // Priors are 2/3 vs 1/3.
        assert!(probs[0] > probs[1]);
        assert!((probs[0] - 2.0 / 3.0).abs() < 1e-9);
    }
}
