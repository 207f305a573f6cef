//! In-memory relational store over the three exported case/law tables.

mod error;
mod stats;
mod store;

pub use error::StoreError;
pub use stats::{CaseStats, LawStats, TableInfo};
pub use store::{CaseField, CaseStore};
