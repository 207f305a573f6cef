pub mod algorithm;
pub mod config;
pub mod prediction;
pub mod record;

pub use algorithm::{Algorithm, ParseAlgorithmError};
pub use config::{ForestParams, TfidfParams};
pub use prediction::Prediction;
pub use record::{Case, CaseLink, EnrichedCase, Law};
