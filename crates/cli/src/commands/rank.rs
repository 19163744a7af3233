//! Dealer ranking command

use crate::data;
use crate::output::{format_score, print_table, OutputFormat};
use anyhow::Result;
use predictor_lib::DealerRankingSystem;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use tracing::info;

/// Row for the ranked dealer table
#[derive(Tabled, Serialize)]
struct DealerRow {
    #[tabled(rename = "Rank")]
    rank: u32,
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Unit Cost")]
    unit_cost: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
}

pub fn run(dealers_path: &Path, reference_cost: Option<f64>, format: OutputFormat) -> Result<()> {
    let dealers = data::load_dealers(dealers_path)?;
    info!(dealers = dealers.len(), "dealer batch loaded");

    let mut system = DealerRankingSystem::new();
    if let Some(reference) = reference_cost {
        system = system.with_reference_cost(reference);
    }
    let ranked = system.rank(dealers)?;

    let rows: Vec<DealerRow> = ranked
        .iter()
        .map(|d| DealerRow {
            rank: d.rank.unwrap_or(0),
            id: d.id,
            name: d.name.clone(),
            country: d.country.clone(),
            score: d.ranking_score.map(format_score).unwrap_or_default(),
            unit_cost: format!("{:.2}", d.average_unit_cost),
            capacity: format!("{:.0}", d.max_supply_capacity),
        })
        .collect();
    print_table(&rows, format);
    Ok(())
}
