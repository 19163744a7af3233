//! Label-index encoding for categorical columns
//!
//! The vocabulary is the fixed set of values known at fit time; inference on
//! a value outside it is an error, not an extension.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label-to-index table for one categorical column
///
/// Labels observed during fit are stored sorted; re-fitting with new data
/// appends previously unseen labels (again sorted) after the existing ones,
/// so already-assigned indices stay stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    labels: Vec<String>,
}

impl CategoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every distinct unseen value to the vocabulary
    pub fn fit_extend<'a>(&mut self, values: impl IntoIterator<Item = &'a str>) {
        let unseen: BTreeSet<&str> = values
            .into_iter()
            .filter(|v| !self.labels.iter().any(|l| l == v))
            .collect();
        self.labels.extend(unseen.into_iter().map(String::from));
    }

    /// Index of a label, or `None` for out-of-vocabulary values
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == value)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
