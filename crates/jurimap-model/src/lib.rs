//! Article classification: TF-IDF features over case text, a multinomial
//! naive Bayes or random-forest backend, ranked top-k predictions, and
//! single-blob model persistence.

mod classifier;
mod error;
mod eval;
mod forest;
mod labels;
mod nb;
mod split;
mod tfidf;

pub use classifier::ArticleClassifier;
pub use error::ModelError;
pub use eval::{ClassMetrics, Evaluation};
pub use forest::{DecisionTree, Forest};
pub use labels::LabelEncoder;
pub use nb::MultinomialNb;
pub use split::stratified_split;
pub use tfidf::{SparseVec, TfidfVectorizer};
