//! CSV loading for training tables and dealer summaries
//!
//! Thin plumbing: a column whose present values all parse as numbers
//! becomes a numeric column, everything else stays text. Empty cells are
//! absent values, not zeros; imputation is the engine's decision.

use anyhow::{Context, Result};
use predictor_lib::{DataTable, DealerSummary};
use std::path::Path;

/// Load a CSV file into a column-oriented table
pub fn load_table(path: &Path) -> Result<DataTable> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.context("failed to read CSV record")?;
        for (column, cell) in cells.iter_mut().enumerate() {
            let field = record.get(column).unwrap_or("");
            cell.push(if field.is_empty() {
                None
            } else {
                Some(field.to_string())
            });
        }
    }

    let mut table = DataTable::new();
    for (header, values) in headers.into_iter().zip(cells) {
        if is_numeric(&values) {
            let numeric = values
                .iter()
                .map(|v| v.as_deref().and_then(|s| s.parse::<f64>().ok()))
                .collect();
            table.insert_numeric(header, numeric)?;
        } else {
            table.insert_text(header, values)?;
        }
    }
    Ok(table)
}

/// A column is numeric when every present value parses as f64
fn is_numeric(values: &[Option<String>]) -> bool {
    let mut present = values.iter().flatten().peekable();
    present.peek().is_some() && present.all(|v| v.parse::<f64>().is_ok())
}

/// Load a CSV file of dealer summary records
pub fn load_dealers(path: &Path) -> Result<Vec<DealerSummary>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut dealers = Vec::new();
    for record in reader.deserialize() {
        let dealer: DealerSummary = record.context("failed to parse dealer record")?;
        dealers.push(dealer);
    }
    Ok(dealers)
}
