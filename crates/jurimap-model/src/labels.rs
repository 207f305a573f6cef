//! Bidirectional mapping between article labels and class indices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Label encoder fitted over the observed article strings.
///
/// Class indices follow sorted label order, so encoding is deterministic
/// for a given label set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Fit over the observed labels (duplicates collapse, order sorted).
    pub fn fit(labels: &[String]) -> Self {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        let index = build_index(&classes);
        Self { classes, index }
    }

    /// Class index for a label.
    pub fn encode(&self, label: &str) -> Result<u32, ModelError> {
        self.index()
            .get(label)
            .copied()
            .ok_or_else(|| ModelError::UnknownLabel(label.to_string()))
    }

    /// Label for a class index.
    pub fn decode(&self, class: u32) -> Option<&str> {
        self.classes.get(class as usize).map(String::as_str)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// All labels in class-index order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Rebuild the reverse index after deserialization (the map is derived
    /// from `classes` and not persisted).
    pub fn rebuild_index(&mut self) {
        self.index = build_index(&self.classes);
    }

    fn index(&self) -> &HashMap<String, u32> {
        &self.index
    }
}

fn build_index(classes: &[String]) -> HashMap<String, u32> {
    classes
        .iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), i as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_sorts_and_dedups() {
        let enc = LabelEncoder::fit(&[
            "108".to_string(),
            "104".to_string(),
            "108".to_string(),
            "260".to_string(),
        ]);
        assert_eq!(enc.classes(), ["104", "108", "260"]);
        assert_eq!(enc.len(), 3);
    }

    #[test]
    fn encode_decode_round_trip() {
        let enc = LabelEncoder::fit(&["173".to_string(), "123".to_string()]);
        let idx = enc.encode("173").unwrap();
        assert_eq!(enc.decode(idx), Some("173"));
        assert_eq!(enc.encode("123").unwrap(), 0);
    }

    #[test]
    fn unseen_label_is_an_error() {
        let enc = LabelEncoder::fit(&["104".to_string()]);
        assert!(matches!(
            enc.encode("999"),
            Err(ModelError::UnknownLabel(l)) if l == "999"
        ));
    }

    #[test]
    fn index_rebuilds_after_deserialization() {
        let enc = LabelEncoder::fit(&["104".to_string(), "108".to_string()]);
        let json = serde_json::to_string(&enc).unwrap();
        let mut restored: LabelEncoder = serde_json::from_str(&json).unwrap();
        restored.rebuild_index();
        assert_eq!(restored.encode("108").unwrap(), 1);
    }
}
