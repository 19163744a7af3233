//! Synthetic training data generator
//!
//! Seeded, so the same invocation always produces the same CSV. Value
//! ranges follow the shape of real transaction history: unit costs and
//! duties drive the profit margin, transit time drives the delivery days.

use crate::output::print_success;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

const DEALER_COUNTRIES: [&str; 4] = ["India", "China", "Germany", "Vietnam"];
const DESTINATIONS: [&str; 5] = ["USA", "Germany", "Japan", "Brazil", "UAE"];
const CATEGORIES: [&str; 4] = ["Electronics", "Textiles", "Machinery", "Chemicals"];
const TRANSPORT_MODES: [&str; 3] = ["sea", "air", "road"];
const BUSINESS_TYPES: [&str; 3] = ["manufacturer", "wholesaler", "trader"];

pub fn run(rows: usize, output: &Path, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    writer.write_record([
        "quantity",
        "dealer_cost_per_unit",
        "logistics_cost_per_kg",
        "import_duty_rate",
        "export_duty_rate",
        "exchange_rate",
        "dealer_quality_score",
        "dealer_reliability_score",
        "dealer_delivery_performance",
        "average_delivery_days",
        "delay_probability",
        "defect_rate",
        "market_price",
        "dealer_country",
        "destination_country",
        "product_category",
        "transport_mode",
        "dealer_business_type",
        "order_date",
        "profit_margin_percentage",
        "actual_delivery_days",
    ])?;

    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    for _ in 0..rows {
        let unit_cost: f64 = rng.gen_range(20.0..800.0);
        let duty: f64 = rng.gen_range(0.0..18.0);
        let transit_days: f64 = rng.gen_range(5.0..60.0);
        let reliability: f64 = rng.gen_range(0.6..1.0);
        let delay_probability: f64 = rng.gen_range(0.0..0.35);
        let market_price = unit_cost * rng.gen_range(1.1..1.6);
        let order_date = start + chrono::Duration::days(rng.gen_range(0..700));

        // Margin shrinks with cost share and duties, improves with a
        // reliable dealer; delivery stretches with delays
        let profit_margin = (1.0 - unit_cost / market_price) * 100.0 - duty * 0.4
            + reliability * 4.0
            + rng.gen_range(-3.0..3.0);
        let actual_days =
            transit_days * (1.0 + delay_probability * rng.gen_range(0.0..1.5)) + rng.gen_range(-2.0..2.0);

        writer.write_record([
            format!("{}", rng.gen_range(10..2000)),
            format!("{unit_cost:.2}"),
            format!("{:.2}", rng.gen_range(0.5..9.0)),
            format!("{duty:.2}"),
            format!("{:.2}", rng.gen_range(0.0..2.5)),
            format!("{:.2}", rng.gen_range(70.0..90.0)),
            format!("{:.3}", rng.gen_range(0.7..1.0)),
            format!("{reliability:.3}"),
            format!("{:.3}", rng.gen_range(0.6..0.95)),
            format!("{transit_days:.0}"),
            format!("{delay_probability:.3}"),
            format!("{:.3}", rng.gen_range(0.0..0.1)),
            format!("{market_price:.2}"),
            DEALER_COUNTRIES[rng.gen_range(0..DEALER_COUNTRIES.len())].to_string(),
            DESTINATIONS[rng.gen_range(0..DESTINATIONS.len())].to_string(),
            CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string(),
            TRANSPORT_MODES[rng.gen_range(0..TRANSPORT_MODES.len())].to_string(),
            BUSINESS_TYPES[rng.gen_range(0..BUSINESS_TYPES.len())].to_string(),
            order_date.format("%Y-%m-%d").to_string(),
            format!("{profit_margin:.2}"),
            format!("{:.0}", actual_days.max(1.0)),
        ])?;
    }
    writer.flush()?;
    print_success(&format!("wrote {rows} rows to {}", output.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        run(25, &a, 7).unwrap();
        run(25, &b, 7).unwrap();
        assert_eq!(
            std::fs::read_to_string(&a).unwrap(),
            std::fs::read_to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_generated_csv_trains() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("train.csv");
        run(40, &path, 3).unwrap();

        let table = crate::data::load_table(&path).unwrap();
        assert_eq!(table.rows(), 40);
        assert!(table.numeric("profit_margin_percentage").is_some());
        assert!(table.text("transport_mode").is_some());
    }
}
