//! Scenario forecasting command

use crate::output::{format_score, print_table, OutputFormat};
use anyhow::{Context, Result};
use predictor_lib::{DealPredictor, FileModelStore, ModelStore, RawScenario};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::Tabled;

/// Key/value row for the forecast table
#[derive(Tabled, Serialize)]
struct ForecastRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn run(scenario_path: &Path, key: &str, model_dir: &str, format: OutputFormat) -> Result<()> {
    let raw = fs::read_to_string(scenario_path)
        .with_context(|| format!("failed to read {}", scenario_path.display()))?;
    let scenario: RawScenario =
        serde_json::from_str(&raw).context("failed to parse scenario JSON")?;

    let store = FileModelStore::new(model_dir)?;
    let predictor = DealPredictor::from_bundle(store.load(key)?);
    let prediction = predictor.predict(&scenario)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        OutputFormat::Table => {
            let mut rows = vec![
                ForecastRow {
                    field: "Profit margin (%)".to_string(),
                    value: format!("{:.2}", prediction.profit_margin),
                },
                ForecastRow {
                    field: "Delivery days".to_string(),
                    value: prediction.delivery_days.to_string(),
                },
                ForecastRow {
                    field: "Confidence".to_string(),
                    value: format_score(prediction.confidence),
                },
                ForecastRow {
                    field: "Recommendation".to_string(),
                    value: prediction.recommendation.describe().to_string(),
                },
            ];
            for (name, value) in &prediction.risk_factors {
                rows.push(ForecastRow {
                    field: format!("Risk: {name}"),
                    value: format_score(*value),
                });
            }
            print_table(&rows, format);
        }
    }
    Ok(())
}
