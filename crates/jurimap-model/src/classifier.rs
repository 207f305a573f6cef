//! Article classifier facade: train, predict top-k, persist.
//!
//! Wraps the vectorizer, label encoder, and the selected backend behind one
//! train/predict/save/load surface. The backend is fixed at construction
//! from the closed [`Algorithm`] enum.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use jurimap_core::{Algorithm, EnrichedCase, ForestParams, Prediction, TfidfParams};

use crate::eval::{evaluate, Evaluation};
use crate::forest::Forest;
use crate::labels::LabelEncoder;
use crate::nb::MultinomialNb;
use crate::split::stratified_split;
use crate::tfidf::{SparseVec, TfidfVectorizer};
use crate::ModelError;

const TOP_K_SINGLE: usize = 5;
const TOP_K_BATCH: usize = 3;
const DEFAULT_SEED: u64 = 42;

/// The fitted backend, chosen from [`Algorithm`] at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Backend {
    NaiveBayes(MultinomialNb),
    RandomForest(Forest),
}

impl Backend {
    fn predict_proba(&self, doc: &SparseVec) -> Vec<f64> {
        match self {
            Self::NaiveBayes(nb) => nb.predict_proba(doc),
            Self::RandomForest(forest) => forest.predict_proba(doc),
        }
    }

    fn predict(&self, doc: &SparseVec) -> u32 {
        match self {
            Self::NaiveBayes(nb) => nb.predict(doc),
            Self::RandomForest(forest) => forest.predict(doc),
        }
    }
}

/// The persisted model blob: exactly the four fitted fields.
#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    algorithm: Algorithm,
    vectorizer: TfidfVectorizer,
    classifier: Backend,
    label_encoder: LabelEncoder,
}

#[derive(Debug, Clone)]
struct Fitted {
    vectorizer: TfidfVectorizer,
    backend: Backend,
    encoder: LabelEncoder,
}

/// Maps case text to a ranked list of candidate articles with confidences.
#[derive(Debug)]
pub struct ArticleClassifier {
    algorithm: Algorithm,
    tfidf_params: TfidfParams,
    forest_params: ForestParams,
    seed: u64,
    fitted: Option<Fitted>,
}

impl ArticleClassifier {
    /// Build an untrained classifier with the demo defaults.
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_params(
            algorithm,
            TfidfParams::default(),
            ForestParams::default(),
            DEFAULT_SEED,
        )
    }

    /// Build with explicit vectorizer/forest settings and split seed.
    pub fn with_params(
        algorithm: Algorithm,
        tfidf_params: TfidfParams,
        forest_params: ForestParams,
        seed: u64,
    ) -> Self {
        Self {
            algorithm,
            tfidf_params,
            forest_params,
            seed,
            fitted: None,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    // ── Training ──

    /// Train on enrichment rows that carry a non-null article label.
    ///
    /// Splits train/test stratified on the label, fits the vectorizer on
    /// training texts only, fits the backend, and reports held-out
    /// accuracy with a per-class breakdown.
    pub fn train(
        &mut self,
        rows: &[EnrichedCase],
        test_size: f64,
    ) -> Result<Evaluation, ModelError> {
        let labelled: Vec<(&str, &str)> = rows
            .iter()
            .filter_map(|row| {
                let article = row.article.as_deref().filter(|a| !a.is_empty())?;
                Some((row.text.as_str(), article))
            })
            .collect();
        if labelled.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let labels: Vec<String> = labelled.iter().map(|&(_, a)| a.to_string()).collect();
        let encoder = LabelEncoder::fit(&labels);
        let y: Vec<u32> = labels
            .iter()
            .map(|l| encoder.encode(l))
            .collect::<Result<_, _>>()?;

        let (train_idx, test_idx) = stratified_split(&y, test_size, self.seed);
        info!(
            algorithm = %self.algorithm,
            train = train_idx.len(),
            test = test_idx.len(),
            classes = encoder.len(),
            "training article classifier"
        );

        let train_texts: Vec<String> = train_idx
            .iter()
            .map(|&i| labelled[i].0.to_string())
            .collect();
        let vectorizer = TfidfVectorizer::fit(self.tfidf_params.clone(), &train_texts)?;

        let x_train: Vec<SparseVec> = train_texts.iter().map(|t| vectorizer.transform(t)).collect();
        let y_train: Vec<u32> = train_idx.iter().map(|&i| y[i]).collect();

        let backend = match self.algorithm {
            Algorithm::NaiveBayes => Backend::NaiveBayes(MultinomialNb::fit(
                &x_train,
                &y_train,
                encoder.len(),
                vectorizer.n_features(),
            )),
            Algorithm::RandomForest => Backend::RandomForest(Forest::fit(
                &x_train,
                &y_train,
                encoder.len(),
                vectorizer.n_features(),
                &self.forest_params,
                self.seed,
            )),
        };

        let y_test: Vec<u32> = test_idx.iter().map(|&i| y[i]).collect();
        let y_pred: Vec<u32> = test_idx
            .iter()
            .map(|&i| backend.predict(&vectorizer.transform(labelled[i].0)))
            .collect();
        let evaluation = evaluate(&y_test, &y_pred, &encoder, train_idx.len());

        self.fitted = Some(Fitted {
            vectorizer,
            backend,
            encoder,
        });
        Ok(evaluation)
    }

    // ── Prediction ──

    /// Top-5 candidate articles for one case text, descending confidence.
    ///
    /// An untrained classifier yields an empty list, never a panic.
    pub fn predict(&self, text: &str) -> Vec<Prediction> {
        let Some(fitted) = &self.fitted else {
            warn!("predict called on untrained classifier");
            return Vec::new();
        };
        Self::ranked(fitted, text, TOP_K_SINGLE)
    }

    /// Top-3 candidates per text for a batch of case texts.
    pub fn predict_batch(&self, texts: &[String]) -> Vec<Vec<Prediction>> {
        let Some(fitted) = &self.fitted else {
            warn!("predict_batch called on untrained classifier");
            return Vec::new();
        };
        texts
            .iter()
            .map(|t| Self::ranked(fitted, t, TOP_K_BATCH))
            .collect()
    }

    fn ranked(fitted: &Fitted, text: &str, k: usize) -> Vec<Prediction> {
        let doc = fitted.vectorizer.transform(text);
        let probs = fitted.backend.predict_proba(&doc);

        // Stable sort: equal probabilities keep class-index order.
        let mut order: Vec<usize> = (0..probs.len()).collect();
        order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));

        order
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(i, class)| Prediction {
                rank: i as u32 + 1,
                article: fitted
                    .encoder
                    .decode(class as u32)
                    .unwrap_or("?")
                    .to_string(),
                confidence: probs[class],
            })
            .collect()
    }

    // ── Persistence ──

    /// Serialize the four fitted fields as one blob.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let fitted = self.fitted.as_ref().ok_or(ModelError::NotTrained)?;
        let artifact = ModelArtifact {
            algorithm: self.algorithm,
            vectorizer: fitted.vectorizer.clone(),
            classifier: fitted.backend.clone(),
            label_encoder: fitted.encoder.clone(),
        };
        let blob = serde_json::to_vec(&artifact)?;
        fs::write(path, blob).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "saved model");
        Ok(())
    }

    /// Restore a saved model, marking the instance trained.
    ///
    /// A nonexistent path is an error that leaves every field untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), ModelError> {
        if !path.exists() {
            return Err(ModelError::ModelNotFound(path.to_path_buf()));
        }
        let blob = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut artifact: ModelArtifact = serde_json::from_slice(&blob)?;
        artifact.label_encoder.rebuild_index();

        self.algorithm = artifact.algorithm;
        self.fitted = Some(Fitted {
            vectorizer: artifact.vectorizer,
            backend: artifact.classifier,
            encoder: artifact.label_encoder,
        });
        info!(path = %path.display(), algorithm = %self.algorithm, "loaded model");
        Ok(())
    }
}
