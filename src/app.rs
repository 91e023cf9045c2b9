//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the cleaning/training pipeline
//! - prints reports
//! - writes exports and artifacts
//! - serves batch predictions from a persisted artifact

use clap::Parser;

use crate::cli::{CleanArgs, Command, PredictArgs, TrainArgs};
use crate::domain::PipelineConfig;
use crate::error::AppError;
use crate::serve::{Predictor, read_payloads};

pub mod pipeline;

/// Entry point for the `propfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Clean(args) => handle_clean(args),
        Command::Train(args) => handle_train(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_clean(args: CleanArgs) -> Result<(), AppError> {
    let mut config = PipelineConfig::new(args.input);
    config.missing_col_threshold = args.missing_threshold;

    let out = pipeline::run_clean(&config)?;
    crate::io::export::write_cleaned_csv(&args.output, &out.table)?;

    println!("{}", crate::report::format_clean_summary(&out.counts));
    println!("Cleaned table written to {}", args.output.display());
    Ok(())
}

fn handle_train(args: TrainArgs) -> Result<(), AppError> {
    let config = train_config_from_args(&args);
    let out = pipeline::run_train(&config)?;

    // Persist only after the whole chain has succeeded.
    crate::io::artifact::write_artifact(&args.artifact, &out.artifact)?;
    if let Some(path) = &args.export_cleaned {
        crate::io::export::write_cleaned_csv(path, &out.clean.table)?;
    }

    println!("{}", crate::report::format_clean_summary(&out.clean.counts));
    println!(
        "{}",
        crate::report::format_train_summary(&out.artifact, out.n_train)
    );
    println!("Artifact written to {}", args.artifact.display());
    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    // Loading is the configuration precondition: a missing/invalid artifact
    // fails here, before any payload is touched.
    let predictor = Predictor::load(&args.artifact)?;
    let payloads = read_payloads(&args.input)?;

    let predictions = predictor.predict_batch(&payloads)?;
    for p in &predictions {
        let line = serde_json::to_string(p)
            .map_err(|e| AppError::io(format!("Failed to encode prediction: {e}")))?;
        println!("{line}");
    }
    Ok(())
}

fn train_config_from_args(args: &TrainArgs) -> PipelineConfig {
    let mut config = PipelineConfig::new(args.input.clone());
    config.artifact = Some(args.artifact.clone());
    config.export_cleaned = args.export_cleaned.clone();
    config.missing_col_threshold = args.missing_threshold;
    config.alpha = args.alpha;
    config.test_size = args.test_size;
    config.seed = args.seed;
    config.top_localities = args.top_localities;
    config.top_cities = args.top_cities;
    config
}
