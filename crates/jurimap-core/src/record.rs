//! Record types for the three input tables and their enrichment join.
//!
//! All three tables are read-only inputs loaded once per process; nothing
//! in Jurimap creates, updates, or deletes a record.

use serde::{Deserialize, Serialize};

/// A judicial decision record from `case_data.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: u64,
    #[serde(default)]
    pub case_name: String,
    /// Free-text body of the decision; the classifier's input.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub court_name: Option<String>,
    #[serde(default)]
    pub case_level: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
}

/// A statutory provision record from `law_data.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Law {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub law_type: Option<String>,
}

/// An association row from `case_law_data.csv` linking a case to a law.
///
/// `article` is the classification target. `law_id` may dangle — law-level
/// enrichment is a left join and tolerates orphaned references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseLink {
    pub case_id: u64,
    #[serde(default)]
    pub law_id: Option<u64>,
    #[serde(default, rename = "type")]
    pub law_type: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub clause: Option<String>,
    #[serde(default)]
    pub point: Option<String>,
}

/// One row of the enrichment view: Case ⋈ CaseLink ⟕ Law.
///
/// Carries the case fields, the link's provision sub-references, and the
/// referenced law's metadata when the reference resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedCase {
    pub case_id: u64,
    pub case_name: String,
    pub text: String,
    pub court_name: Option<String>,
    pub case_level: Option<String>,
    pub document_type: Option<String>,
    pub law_id: Option<u64>,
    pub law_name: Option<String>,
    pub law_type: Option<String>,
    pub article: Option<String>,
    pub clause: Option<String>,
    pub point: Option<String>,
}
