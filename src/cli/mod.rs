//! Command-line parsing for the listings pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the cleaning/modeling code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "propfit",
    version,
    about = "Real-estate listings cleaning, feature engineering, and price-model pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean a raw listings CSV and write the cleaned table.
    Clean(CleanArgs),
    /// Run the full pipeline: clean, engineer, encode, fit, persist artifact.
    Train(TrainArgs),
    /// Predict prices for a batch of sparse listing payloads.
    Predict(PredictArgs),
}

/// Options for `propfit clean`.
#[derive(Debug, Parser)]
pub struct CleanArgs {
    /// Raw listings CSV.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output path for the cleaned table.
    #[arg(short = 'o', long, default_value = "cleaned_listings.csv")]
    pub output: PathBuf,

    /// Drop columns with a missing fraction above this.
    #[arg(long, default_value_t = 0.25)]
    pub missing_threshold: f64,
}

/// Options for `propfit train`.
#[derive(Debug, Parser)]
pub struct TrainArgs {
    /// Raw listings CSV.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output path for the model artifact JSON.
    #[arg(long, default_value = "model.json")]
    pub artifact: PathBuf,

    /// Also write the cleaned table to this path.
    #[arg(long)]
    pub export_cleaned: Option<PathBuf>,

    /// Ridge penalty strength.
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,

    /// Held-out test fraction.
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Seed for the train/test shuffle.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Top-K locality levels kept by the encoder.
    #[arg(long, default_value_t = 20)]
    pub top_localities: usize,

    /// Top-K city levels kept by the encoder.
    #[arg(long, default_value_t = 10)]
    pub top_cities: usize,

    /// Drop columns with a missing fraction above this.
    #[arg(long, default_value_t = 0.25)]
    pub missing_threshold: f64,
}

/// Options for `propfit predict`.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// Model artifact JSON written by `propfit train`.
    #[arg(long)]
    pub artifact: PathBuf,

    /// JSON array of listing payloads.
    #[arg(short = 'i', long)]
    pub input: PathBuf,
}
