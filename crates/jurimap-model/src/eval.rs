//! Held-out evaluation: accuracy and a per-class breakdown.
//!
//! The per-class report covers only labels present in the union of test
//! and predicted classes; a class absent from both sides of a split is
//! not reported.

use std::collections::BTreeSet;

use tracing::info;

use crate::labels::LabelEncoder;

/// Precision/recall/F1 for one article label.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of test examples with this true label.
    pub support: usize,
}

/// Training evaluation summary.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub accuracy: f64,
    /// Restricted to the test∪prediction label union, class-index order.
    pub per_class: Vec<ClassMetrics>,
    /// Predicted classes tallied by frequency, descending.
    pub top_predictions: Vec<(String, usize)>,
    pub train_size: usize,
    pub test_size: usize,
}

/// Compute the evaluation from encoded true/predicted test labels.
pub fn evaluate(
    y_true: &[u32],
    y_pred: &[u32],
    encoder: &LabelEncoder,
    train_size: usize,
) -> Evaluation {
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t == p)
        .count();
    let accuracy = if y_true.is_empty() {
        0.0
    } else {
        correct as f64 / y_true.len() as f64
    };

    // Only classes observed in the split are reported.
    let observed: BTreeSet<u32> = y_true.iter().chain(y_pred).copied().collect();

    let per_class = observed
        .iter()
        .map(|&class| {
            let tp = y_true
                .iter()
                .zip(y_pred)
                .filter(|&(&t, &p)| t == class && p == class)
                .count() as f64;
            let pred_count = y_pred.iter().filter(|&&p| p == class).count() as f64;
            let support = y_true.iter().filter(|&&t| t == class).count();

            let precision = if pred_count > 0.0 { tp / pred_count } else { 0.0 };
            let recall = if support > 0 { tp / support as f64 } else { 0.0 };
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label: encoder.decode(class).unwrap_or("?").to_string(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let mut tally: Vec<(u32, usize)> = observed
        .iter()
        .map(|&class| (class, y_pred.iter().filter(|&&p| p == class).count()))
        .filter(|&(_, n)| n > 0)
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let top_predictions = tally
        .into_iter()
        .map(|(class, n)| (encoder.decode(class).unwrap_or("?").to_string(), n))
        .collect();

    let eval = Evaluation {
        accuracy,
        per_class,
        top_predictions,
        train_size,
        test_size: y_true.len(),
    };
    info!(
        accuracy = eval.accuracy,
        test_size = eval.test_size,
        classes = eval.per_class.len(),
        "evaluated held-out split"
    );
    eval
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::fit(&[
            "104".to_string(),
            "108".to_string(),
            "260".to_string(),
        ])
    }

    #[test]
    fn accuracy_counts_exact_matches() {
        let eval = evaluate(&[0, 1, 1, 2], &[0, 1, 0, 2], &encoder(), 10);
        assert!((eval.accuracy - 0.75).abs() < 1e-12);
        assert_eq!(eval.test_size, 4);
        assert_eq!(eval.train_size, 10);
    }

    #[test]
    fn report_restricted_to_observed_label_union() {
        // Class 2 ("260") appears in neither truth nor predictions.
        let eval = evaluate(&[0, 1], &[1, 1], &encoder(), 0);
        let labels: Vec<&str> = eval.per_class.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["104", "108"]);
    }

    #[test]
    fn predicted_only_class_is_reported_with_zero_recall() {
        // Class 2 predicted but never true.
        let eval = evaluate(&[0, 0], &[0, 2], &encoder(), 0);
        let m260 = eval.per_class.iter().find(|m| m.label == "260").unwrap();
        assert_eq!(m260.support, 0);
        assert_eq!(m260.recall, 0.0);
        assert_eq!(m260.precision, 0.0);
    }

    #[test]
    fn per_class_metrics_match_hand_computation() {
        // truth: [0,0,1,1], pred: [0,1,1,1]
        let eval = evaluate(&[0, 0, 1, 1], &[0, 1, 1, 1], &encoder(), 0);
        let m104 = &eval.per_class[0];
        assert!((m104.precision - 1.0).abs() < 1e-12);
        assert!((m104.recall - 0.5).abs() < 1e-12);
        let m108 = &eval.per_class[1];
        assert!((m108.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((m108.recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn top_predictions_ranked_by_count() {
        let eval = evaluate(&[0, 1, 2, 1], &[1, 1, 1, 0], &encoder(), 0);
        assert_eq!(eval.top_predictions[0], ("108".to_string(), 3));
        assert_eq!(eval.top_predictions[1], ("104".to_string(), 1));
    }

    #[test]
    fn empty_test_set_yields_zero_accuracy() {
        let eval = evaluate(&[], &[], &encoder(), 5);
        assert_eq!(eval.accuracy, 0.0);
        assert!(eval.per_class.is_empty());
    }
}
