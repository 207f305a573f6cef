//! CSV-backed in-memory store for case, law, and case↔law tables.
//!
//! All three tables load once and are read-only afterwards. A missing file
//! degrades to an empty table with a diagnostic; only malformed content is
//! an error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use jurimap_core::{Case, CaseLink, EnrichedCase, Law};

use crate::stats::{CaseStats, LawStats, TableInfo, ranked_counts};
use crate::StoreError;

const CASE_FILE: &str = "case_data.csv";
const LAW_FILE: &str = "law_data.csv";
const CASE_LAW_FILE: &str = "case_law_data.csv";

/// Searchable case text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseField {
    Text,
    CaseName,
    CourtName,
}

impl CaseField {
    fn value<'a>(&self, case: &'a Case) -> Option<&'a str> {
        match self {
            Self::Text => Some(&case.text),
            Self::CaseName => Some(&case.case_name),
            Self::CourtName => case.court_name.as_deref(),
        }
    }
}

/// In-memory store over the three exported tables, with id indexes for
/// point lookups and the enrichment join.
pub struct CaseStore {
    cases: Vec<Case>,
    laws: Vec<Law>,
    links: Vec<CaseLink>,
    case_index: HashMap<u64, usize>,
    law_index: HashMap<u64, usize>,
}

impl CaseStore {
    /// Load all three tables from a data directory.
    ///
    /// Absent files become empty tables; rows that fail to parse are a
    /// [`StoreError`] for that file.
    pub fn load(data_dir: &Path) -> Result<Self, StoreError> {
        let cases: Vec<Case> = read_table(&data_dir.join(CASE_FILE))?;
        let laws: Vec<Law> = read_table(&data_dir.join(LAW_FILE))?;
        let links: Vec<CaseLink> = read_table(&data_dir.join(CASE_LAW_FILE))?;

        let case_index = cases.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        let law_index = laws.iter().enumerate().map(|(i, l)| (l.id, i)).collect();

        Ok(Self {
            cases,
            laws,
            links,
            case_index,
            law_index,
        })
    }

    /// Build a store from already-materialized tables.
    pub fn from_tables(cases: Vec<Case>, laws: Vec<Law>, links: Vec<CaseLink>) -> Self {
        let case_index = cases.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        let law_index = laws.iter().enumerate().map(|(i, l)| (l.id, i)).collect();
        Self {
            cases,
            laws,
            links,
            case_index,
            law_index,
        }
    }

    /// Per-table record counts.
    pub fn table_info(&self) -> TableInfo {
        TableInfo {
            cases: self.cases.len(),
            laws: self.laws.len(),
            links: self.links.len(),
        }
    }

    // ── Enrichment view ──

    /// Case ⋈ CaseLink (inner on id = case_id) ⟕ Law (left on law_id = id).
    ///
    /// One output row per link whose case resolves; law metadata attaches
    /// when the law reference resolves, and stays `None` for orphans.
    pub fn cases_with_laws(&self) -> Vec<EnrichedCase> {
        self.links
            .iter()
            .filter_map(|link| {
                let case = self.case_index.get(&link.case_id).map(|&i| &self.cases[i])?;
                let law = link
                    .law_id
                    .and_then(|id| self.law_index.get(&id))
                    .map(|&i| &self.laws[i]);
                Some(EnrichedCase {
                    case_id: case.id,
                    case_name: case.case_name.clone(),
                    text: case.text.clone(),
                    court_name: case.court_name.clone(),
                    case_level: case.case_level.clone(),
                    document_type: case.document_type.clone(),
                    law_id: link.law_id,
                    law_name: law.map(|l| l.name.clone()),
                    law_type: law.and_then(|l| l.law_type.clone()).or_else(|| link.law_type.clone()),
                    article: link.article.clone(),
                    clause: link.clause.clone(),
                    point: link.point.clone(),
                })
            })
            .collect()
    }

    /// Enrichment rows for a single case.
    pub fn case_with_laws(&self, case_id: u64) -> Vec<EnrichedCase> {
        self.cases_with_laws()
            .into_iter()
            .filter(|row| row.case_id == case_id)
            .collect()
    }

    // ── Descriptive statistics ──

    /// Usage counts from the association table: most-cited laws, link
    /// types, clauses, and points.
    pub fn law_stats(&self) -> LawStats {
        LawStats {
            law_usage: ranked_counts(self.links.iter().filter_map(|l| l.law_id)),
            type_usage: ranked_counts(self.links.iter().filter_map(|l| l.law_type.clone())),
            clause_usage: ranked_counts(self.links.iter().filter_map(|l| l.clause.clone())),
            point_usage: ranked_counts(self.links.iter().filter_map(|l| l.point.clone())),
        }
    }

    /// Distributions over court, case level, and document type.
    pub fn case_stats(&self) -> CaseStats {
        CaseStats {
            court_distribution: ranked_counts(
                self.cases.iter().filter_map(|c| c.court_name.clone()),
            ),
            level_distribution: ranked_counts(
                self.cases.iter().filter_map(|c| c.case_level.clone()),
            ),
            document_type_distribution: ranked_counts(
                self.cases.iter().filter_map(|c| c.document_type.clone()),
            ),
        }
    }

    // ── Search & lookups ──

    /// Case-insensitive substring search over a selectable case column.
    pub fn search_cases(&self, keyword: &str, field: CaseField) -> Vec<&Case> {
        let needle = keyword.to_lowercase();
        let hits: Vec<&Case> = self
            .cases
            .iter()
            .filter(|case| {
                field
                    .value(case)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
            .collect();
        info!(hits = hits.len(), keyword, "case search");
        hits
    }

    pub fn case_by_id(&self, case_id: u64) -> Option<&Case> {
        self.case_index.get(&case_id).map(|&i| &self.cases[i])
    }

    pub fn law_by_id(&self, law_id: u64) -> Option<&Law> {
        self.law_index.get(&law_id).map(|&i| &self.laws[i])
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn laws(&self) -> &[Law] {
        &self.laws
    }

    pub fn links(&self) -> &[CaseLink] {
        &self.links
    }
}

/// Read one CSV table, tolerating absence and a UTF-8 BOM.
fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        warn!(path = %path.display(), "table file missing, using empty table");
        return Ok(Vec::new());
    }

    let bytes = fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = strip_bom(&bytes);

    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        let row: T = row.map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }
    info!(count = rows.len(), path = %path.display(), "loaded table");
    Ok(rows)
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes)
}
