//! Shared fixtures for unit tests

use crate::boosting::GbmParams;
use crate::table::DataTable;
use crate::trainer::TrainerConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trainer configuration small enough for fast test runs
pub(crate) fn fast_config() -> TrainerConfig {
    let params = GbmParams {
        n_estimators: 30,
        max_depth: 3,
        ..GbmParams::default()
    };
    TrainerConfig {
        profit_params: params.clone(),
        delivery_params: params,
        ..TrainerConfig::default()
    }
}

/// Fully-populated scenario whose categorical values are all inside the
/// vocabulary of [`synthetic_training_table`]
pub(crate) fn sample_scenario() -> crate::models::RawScenario {
    crate::models::RawScenario {
        quantity: Some(100.0),
        dealer_cost_per_unit: Some(250.0),
        logistics_cost_per_kg: Some(2.5),
        import_duty_rate: Some(5.0),
        export_duty_rate: Some(0.5),
        exchange_rate: Some(83.2),
        dealer_quality_score: Some(0.9),
        dealer_reliability_score: Some(0.85),
        dealer_delivery_performance: Some(0.8),
        average_delivery_days: Some(30.0),
        delay_probability: Some(0.1),
        defect_rate: Some(0.02),
        market_price: Some(325.0),
        dealer_country: "India".into(),
        destination_country: "Germany".into(),
        product_category: "Electronics".into(),
        transport_mode: "sea".into(),
        dealer_business_type: "manufacturer".into(),
        order_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 14),
    }
}

/// Deterministic synthetic training table with both target columns
pub(crate) fn synthetic_training_table(rows: usize) -> DataTable {
    let mut rng = StdRng::seed_from_u64(7);
    let countries = ["India", "China", "Germany"];
    let destinations = ["USA", "Germany", "Japan", "Brazil"];
    let categories = ["Electronics", "Textiles", "Machinery"];
    let modes = ["sea", "air", "road"];
    let business_types = ["manufacturer", "wholesaler", "trader"];

    let mut quantity = Vec::new();
    let mut unit_cost = Vec::new();
    let mut logistics = Vec::new();
    let mut import_duty = Vec::new();
    let mut export_duty = Vec::new();
    let mut exchange = Vec::new();
    let mut quality = Vec::new();
    let mut reliability = Vec::new();
    let mut delivery_perf = Vec::new();
    let mut avg_days = Vec::new();
    let mut delay_prob = Vec::new();
    let mut defect = Vec::new();
    let mut market = Vec::new();
    let mut dealer_country = Vec::new();
    let mut destination = Vec::new();
    let mut category = Vec::new();
    let mut mode = Vec::new();
    let mut business = Vec::new();
    let mut order_date = Vec::new();
    let mut profit = Vec::new();
    let mut actual_days = Vec::new();

    for i in 0..rows {
        let cost: f64 = rng.gen_range(50.0..500.0);
        let days: f64 = rng.gen_range(5.0..60.0);
        let rel: f64 = rng.gen_range(0.6..1.0);
        let duty: f64 = rng.gen_range(0.0..15.0);

        quantity.push(Some(rng.gen_range(10.0..1000.0_f64).round()));
        unit_cost.push(Some(cost));
        logistics.push(Some(rng.gen_range(0.5..8.0)));
        import_duty.push(Some(duty));
        export_duty.push(Some(rng.gen_range(0.0..2.0)));
        exchange.push(Some(83.2));
        quality.push(Some(rng.gen_range(0.7..1.0)));
        reliability.push(Some(rel));
        delivery_perf.push(Some(rng.gen_range(0.6..0.95)));
        avg_days.push(Some(days));
        delay_prob.push(Some(rng.gen_range(0.0..0.3)));
        defect.push(Some(rng.gen_range(0.0..0.1)));
        market.push(Some(cost * 1.3));
        dealer_country.push(Some(countries[i % countries.len()].to_string()));
        destination.push(Some(destinations[i % destinations.len()].to_string()));
        category.push(Some(categories[i % categories.len()].to_string()));
        mode.push(Some(modes[i % modes.len()].to_string()));
        business.push(Some(business_types[i % business_types.len()].to_string()));
        order_date.push(Some(format!("2024-{:02}-15", (i % 12) + 1)));

        // Targets loosely tied to the inputs so the models have signal
        profit.push(Some(30.0 - cost / 50.0 - duty * 0.5 + rel * 5.0));
        actual_days.push(Some(days + rng.gen_range(-3.0..6.0)));
    }

    let mut table = DataTable::new();
    table.insert_numeric("quantity", quantity).unwrap();
    table.insert_numeric("dealer_cost_per_unit", unit_cost).unwrap();
    table.insert_numeric("logistics_cost_per_kg", logistics).unwrap();
    table.insert_numeric("import_duty_rate", import_duty).unwrap();
    table.insert_numeric("export_duty_rate", export_duty).unwrap();
    table.insert_numeric("exchange_rate", exchange).unwrap();
    table.insert_numeric("dealer_quality_score", quality).unwrap();
    table.insert_numeric("dealer_reliability_score", reliability).unwrap();
    table
        .insert_numeric("dealer_delivery_performance", delivery_perf)
        .unwrap();
    table.insert_numeric("average_delivery_days", avg_days).unwrap();
    table.insert_numeric("delay_probability", delay_prob).unwrap();
    table.insert_numeric("defect_rate", defect).unwrap();
    table.insert_numeric("market_price", market).unwrap();
    table.insert_text("dealer_country", dealer_country).unwrap();
    table.insert_text("destination_country", destination).unwrap();
    table.insert_text("product_category", category).unwrap();
    table.insert_text("transport_mode", mode).unwrap();
    table.insert_text("dealer_business_type", business).unwrap();
    table.insert_text("order_date", order_date).unwrap();
    table.insert_numeric("profit_margin_percentage", profit).unwrap();
    table.insert_numeric("actual_delivery_days", actual_days).unwrap();
    table
}
