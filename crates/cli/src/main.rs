//! Trade Deal Predictor CLI
//!
//! A command-line wrapper around the prediction and ranking engine:
//! trains models from CSV transaction history, forecasts individual trade
//! scenarios, ranks dealer batches, and generates synthetic training data.

mod commands;
mod config;
mod data;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Trade Deal Predictor CLI
#[derive(Parser)]
#[command(name = "tdp")]
#[command(author, version, about = "CLI for the Trade Deal Predictor", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the prediction models from a CSV of historical transactions
    Train {
        /// Path to the training CSV
        #[arg(long)]
        data: PathBuf,

        /// Key under which the trained bundle is stored
        #[arg(long, default_value = "default")]
        key: String,

        /// Profit target column (overrides TDP_PROFIT_COLUMN)
        #[arg(long)]
        profit_column: Option<String>,

        /// Delivery target column (overrides TDP_DELIVERY_COLUMN)
        #[arg(long)]
        delivery_column: Option<String>,
    },

    /// Forecast profit and delivery time for a scenario JSON file
    Predict {
        /// Path to the scenario JSON
        #[arg(long)]
        scenario: PathBuf,

        /// Key of the stored bundle to load
        #[arg(long, default_value = "default")]
        key: String,
    },

    /// Rank dealers from a CSV of dealer summaries
    Rank {
        /// Path to the dealer CSV
        #[arg(long)]
        dealers: PathBuf,

        /// Market-wide reference cost for the cost-efficiency term
        #[arg(long)]
        reference_cost: Option<f64>,
    },

    /// Generate a synthetic training CSV
    Generate {
        /// Number of rows to generate
        #[arg(long, default_value_t = 500)]
        rows: usize,

        /// Output CSV path
        #[arg(long)]
        output: PathBuf,

        /// Generator seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_target(false))
        .init();

    let config = config::CliConfig::load()?;

    match cli.command {
        Commands::Train {
            data,
            key,
            profit_column,
            delivery_column,
        } => commands::train::run(
            &data,
            &key,
            profit_column.as_deref().unwrap_or(&config.profit_column),
            delivery_column.as_deref().unwrap_or(&config.delivery_column),
            &config.model_dir,
            cli.format,
        ),
        Commands::Predict { scenario, key } => {
            commands::predict::run(&scenario, &key, &config.model_dir, cli.format)
        }
        Commands::Rank {
            dealers,
            reference_cost,
        } => commands::rank::run(&dealers, reference_cost, cli.format),
        Commands::Generate { rows, output, seed } => commands::generate::run(rows, &output, seed),
    }
}
