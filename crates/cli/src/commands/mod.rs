//! CLI subcommand implementations

pub mod generate;
pub mod predict;
pub mod rank;
pub mod train;
