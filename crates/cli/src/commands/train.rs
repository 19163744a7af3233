//! Model training command

use crate::data;
use crate::output::{format_score, print_success, print_table, print_warning, OutputFormat};
use anyhow::{Context, Result};
use predictor_lib::{FileModelStore, ModelStore, TargetMetrics, Trainer};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

/// Row for the fit-metrics table
#[derive(Tabled, Serialize)]
struct MetricsRow {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "R²")]
    r2: String,
    #[tabled(rename = "RMSE")]
    rmse: String,
    #[tabled(rename = "MAE")]
    mae: String,
}

impl MetricsRow {
    fn new(target: &str, metrics: &TargetMetrics) -> Self {
        Self {
            target: target.to_string(),
            r2: format_score(metrics.r2),
            rmse: format_score(metrics.rmse),
            mae: format_score(metrics.mae),
        }
    }
}

pub fn run(
    data_path: &Path,
    key: &str,
    profit_column: &str,
    delivery_column: &str,
    model_dir: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = data::load_table(data_path)?;
    info!(rows = table.rows(), path = %data_path.display(), "training table loaded");

    let mut trainer = Trainer::new();
    let (bundle, metrics) = trainer
        .fit(&table, profit_column, delivery_column)
        .context("training failed")?;

    let mut rows = Vec::new();
    if let Some(m) = &metrics.profit {
        rows.push(MetricsRow::new(profit_column, m));
    }
    if let Some(m) = &metrics.delivery {
        rows.push(MetricsRow::new(delivery_column, m));
    }
    print_table(&rows, format);

    if metrics.low_confidence {
        print_warning(&format!(
            "training set has only {} rows, metrics are low-confidence",
            metrics.training_rows + metrics.holdout_rows
        ));
    }

    let store = FileModelStore::new(model_dir)?;
    store.save(&bundle, key)?;
    print_success(&format!("model bundle saved under key `{key}`"));
    Ok(())
}
