//! Column-oriented data table consumed by the trainer and transformer
//!
//! Columns are addressed by name only, so the order in which a caller adds
//! them can never influence transformed features or downstream predictions.
//! Absent numeric cells are `None`, never zero; imputation happens later with
//! training-set means.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single named column: numeric or text, with absent cells allowed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }
}

/// Tabular input with named columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    rows: usize,
    columns: HashMap<String, Column>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (set by the first inserted column)
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Insert a numeric column; all present values must be finite
    pub fn insert_numeric(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), EngineError> {
        let name = name.into();
        if let Some(v) = values.iter().flatten().find(|v| !v.is_finite()) {
            return Err(EngineError::InvalidFeature {
                name: name.clone(),
                reason: format!("non-finite value {v}"),
            });
        }
        self.insert(name, Column::Numeric(values))
    }

    /// Insert a text column (categorical values or ISO dates)
    pub fn insert_text(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<(), EngineError> {
        self.insert(name.into(), Column::Text(values))
    }

    fn insert(&mut self, name: String, column: Column) -> Result<(), EngineError> {
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(EngineError::ColumnLength {
                column: name,
                expected: self.rows,
                actual: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Numeric column by name, if present and numeric
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.columns.get(name) {
            Some(Column::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    /// Text column by name, if present and text
    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        match self.columns.get(name) {
            Some(Column::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// A single numeric cell; `None` when the column is absent or the cell is
    pub fn numeric_cell(&self, name: &str, row: usize) -> Option<f64> {
        self.numeric(name).and_then(|v| v.get(row).copied().flatten())
    }

    /// Mean over the present cells of a numeric column
    pub fn numeric_mean(&self, name: &str) -> Option<f64> {
        let values = self.numeric(name)?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}
