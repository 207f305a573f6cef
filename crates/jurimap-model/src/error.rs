use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no rows with a non-null article label to train on")]
    EmptyTrainingSet,

    #[error("document-frequency cutoffs left an empty vocabulary")]
    EmptyVocabulary,

    #[error("label '{0}' was not seen during fitting")]
    UnknownLabel(String),

    #[error("model has not been trained")]
    NotTrained,

    #[error("model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("model artifact is not valid: {0}")]
    Artifact(#[from] serde_json::Error),
}
