//! Classification backend selection.
//!
//! The backend choice is a closed enum resolved at construction time — an
//! unsupported name fails when the classifier is built, not mid-training.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported classification backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Laplace-smoothed multinomial naive Bayes over TF-IDF weights.
    NaiveBayes,
    /// Bagged ensemble of Gini decision trees.
    RandomForest,
}

impl Algorithm {
    /// Stable tag persisted inside the model artifact.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaiveBayes => "naive_bayes",
            Self::RandomForest => "random_forest",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported algorithm '{0}' (expected 'naive_bayes' or 'random_forest')")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive_bayes" | "naive-bayes" => Ok(Self::NaiveBayes),
            "random_forest" | "random-forest" => Ok(Self::RandomForest),
            other => Err(ParseAlgorithmError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        assert_eq!("naive_bayes".parse::<Algorithm>(), Ok(Algorithm::NaiveBayes));
        assert_eq!(
            "random-forest".parse::<Algorithm>(),
            Ok(Algorithm::RandomForest)
        );
    }

    #[test]
    fn parse_unknown_name_fails_fast() {
        let err = "gradient_boosting".parse::<Algorithm>().unwrap_err();
        assert_eq!(err, ParseAlgorithmError("gradient_boosting".to_string()));
    }

    #[test]
    fn tag_round_trip() {
        for alg in [Algorithm::NaiveBayes, Algorithm::RandomForest] {
            assert_eq!(alg.as_str().parse::<Algorithm>(), Ok(alg));
        }
    }
}
