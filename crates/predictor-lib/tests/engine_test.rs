//! Cross-component properties of the prediction and ranking engine

use predictor_lib::boosting::GbmParams;
use predictor_lib::{
    DataTable, DealPredictor, DealerRankingSystem, DealerSummary, EngineError, FileModelStore,
    ModelStore, RawScenario, Trainer, TrainerConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

const PROFIT_TARGET: &str = "profit_margin_percentage";
const DELIVERY_TARGET: &str = "actual_delivery_days";

fn fast_config() -> TrainerConfig {
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

/// Column data for a deterministic synthetic training set
fn training_columns(rows: usize) -> Vec<(&'static str, Vec<Option<f64>>)> {
    let mut rng = StdRng::seed_from_u64(11);
    let mut columns: Vec<(&'static str, Vec<Option<f64>>)> = vec![
        ("quantity", Vec::new()),
        ("dealer_cost_per_unit", Vec::new()),
        ("logistics_cost_per_kg", Vec::new()),
        ("import_duty_rate", Vec::new()),
        ("export_duty_rate", Vec::new()),
        ("exchange_rate", Vec::new()),
        ("dealer_quality_score", Vec::new()),
        ("dealer_reliability_score", Vec::new()),
        ("dealer_delivery_performance", Vec::new()),
        ("average_delivery_days", Vec::new()),
        ("delay_probability", Vec::new()),
        ("defect_rate", Vec::new()),
        ("market_price", Vec::new()),
        (PROFIT_TARGET, Vec::new()),
        (DELIVERY_TARGET, Vec::new()),
    ];
    for _ in 0..rows {
        let cost: f64 = rng.gen_range(50.0..500.0);
        let days: f64 = rng.gen_range(5.0..60.0);
        let rel: f64 = rng.gen_range(0.6..1.0);
        let duty: f64 = rng.gen_range(0.0..15.0);
        let values = [
            rng.gen_range(10.0..1000.0_f64).round(),
            cost,
            rng.gen_range(0.5..8.0),
            duty,
            rng.gen_range(0.0..2.0),
            83.2,
            rng.gen_range(0.7..1.0),
            rel,
            rng.gen_range(0.6..0.95),
            days,
            rng.gen_range(0.0..0.3),
            rng.gen_range(0.0..0.1),
            cost * 1.3,
            30.0 - cost / 50.0 - duty * 0.5 + rel * 5.0,
            days + rng.gen_range(-3.0..6.0),
        ];
        for (column, value) in columns.iter_mut().zip(values) {
            column.1.push(Some(value));
        }
    }
    columns
}

fn categorical_columns(rows: usize) -> Vec<(&'static str, Vec<Option<String>>)> {
    let pools: [(&'static str, &[&str]); 5] = [
        ("dealer_country", &["India", "China", "Germany"]),
        ("destination_country", &["USA", "Germany", "Japan"]),
        ("product_category", &["Electronics", "Textiles", "Machinery"]),
        ("transport_mode", &["sea", "air", "road"]),
        ("dealer_business_type", &["manufacturer", "wholesaler"]),
    ];
    pools
        .into_iter()
        .map(|(name, pool)| {
            let values = (0..rows)
                .map(|i| Some(pool[i % pool.len()].to_string()))
                .collect();
            (name, values)
        })
        .collect()
}

/// Build the table inserting numeric columns in the given order
fn training_table(rows: usize, reverse_insertion: bool) -> DataTable {
    let mut numeric = training_columns(rows);
    if reverse_insertion {
        numeric.reverse();
    }
    let mut table = DataTable::new();
    for (name, values) in numeric {
        table.insert_numeric(name, values).unwrap();
    }
    for (name, values) in categorical_columns(rows) {
        table.insert_text(name, values).unwrap();
    }
    table
}

fn scenario() -> RawScenario {
    RawScenario {
        quantity: Some(120.0),
        dealer_cost_per_unit: Some(300.0),
        logistics_cost_per_kg: Some(3.0),
        import_duty_rate: Some(4.0),
        export_duty_rate: Some(0.5),
        exchange_rate: Some(83.2),
        dealer_quality_score: Some(0.85),
        dealer_reliability_score: Some(0.9),
        dealer_delivery_performance: Some(0.75),
        average_delivery_days: Some(25.0),
        delay_probability: Some(0.08),
        defect_rate: Some(0.03),
        market_price: Some(390.0),
        dealer_country: "India".to_string(),
        destination_country: "Japan".to_string(),
        product_category: "Textiles".to_string(),
        transport_mode: "air".to_string(),
        dealer_business_type: "wholesaler".to_string(),
        order_date: None,
    }
}

fn train(table: &DataTable) -> DealPredictor {
    let mut trainer = Trainer::with_config(fast_config());
    let (bundle, _) = trainer.fit(table, PROFIT_TARGET, DELIVERY_TARGET).unwrap();
    DealPredictor::from_bundle(bundle)
}

#[test]
fn fit_and_predict_are_deterministic() {
    let table = training_table(60, false);
    let a = train(&table).predict(&scenario()).unwrap();
    let b = train(&table).predict(&scenario()).unwrap();
    assert_eq!(a.profit_margin, b.profit_margin);
    assert_eq!(a.delivery_days, b.delivery_days);
    assert_eq!(a.confidence, b.confidence);
    assert_eq!(a.recommendation, b.recommendation);
}

#[test]
fn column_insertion_order_does_not_change_predictions() {
    let forward = train(&training_table(60, false)).predict(&scenario()).unwrap();
    let reversed = train(&training_table(60, true)).predict(&scenario()).unwrap();
    assert_eq!(forward.profit_margin, reversed.profit_margin);
    assert_eq!(forward.delivery_days, reversed.delivery_days);
}

#[test]
fn saved_and_loaded_bundle_predicts_identically() {
    let table = training_table(60, false);
    let predictor = train(&table);
    let before = predictor.predict(&scenario()).unwrap();

    let dir = TempDir::new().unwrap();
    let store = FileModelStore::new(dir.path()).unwrap();
    store.save(predictor.bundle().unwrap(), "round-trip").unwrap();

    let reloaded = DealPredictor::from_bundle(store.load("round-trip").unwrap());
    let after = reloaded.predict(&scenario()).unwrap();
    assert_eq!(before.profit_margin, after.profit_margin);
    assert_eq!(before.delivery_days, after.delivery_days);
    assert_eq!(before.confidence, after.confidence);
}

#[test]
fn untrained_predictor_never_returns_a_default_response() {
    let predictor = DealPredictor::new();
    assert!(matches!(
        predictor.predict(&scenario()),
        Err(EngineError::NotTrained)
    ));
}

fn dealer_batch() -> Vec<DealerSummary> {
    (0..6)
        .map(|i| DealerSummary {
            id: i as u64 + 1,
            name: format!("dealer-{i}"),
            country: "India".to_string(),
            business_type: "manufacturer".to_string(),
            average_unit_cost: 100.0 + i as f64 * 40.0,
            quality_score: 0.5 + i as f64 * 0.08,
            delivery_performance: 0.9 - i as f64 * 0.05,
            reliability_score: 0.6 + i as f64 * 0.05,
            max_supply_capacity: 1000.0 * (i as f64 + 1.0),
            ranking_score: None,
            rank: None,
        })
        .collect()
}

#[test]
fn ranking_is_stable_across_input_permutations() {
    let system = DealerRankingSystem::new();
    let ranked = system.rank(dealer_batch()).unwrap();

    let mut shuffled = dealer_batch();
    shuffled.reverse();
    let ranked_again = system.rank(shuffled).unwrap();

    let mut ranks: Vec<u32> = ranked.iter().map(|d| d.rank.unwrap()).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=6).collect::<Vec<u32>>());

    for dealer in &ranked {
        let twin = ranked_again.iter().find(|d| d.id == dealer.id).unwrap();
        assert_eq!(dealer.ranking_score, twin.ranking_score);
    }
}
