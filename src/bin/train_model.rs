// Train the fertilizer random forest and persist it with its encoders
//
// Usage: cargo run --release --bin train_model -- --data data/fertilizer_data.csv --model-dir model

use anyhow::Context;
use clap::Parser;
use fertilizer_advisor::{telemetry, train, AdvisorConfig, Dataset, TrainConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "train_model", about = "Fit the fertilizer model and write its artifacts", version)]
struct Cli {
    /// Dataset CSV (overrides FERTILIZER_DATA)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Output directory for fertilizer_model.json / encoders.json (overrides FERTILIZER_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
    /// Number of trees in the forest
    #[arg(long)]
    trees: Option<usize>,
    /// Seed for bootstrap sampling and the train/test split
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AdvisorConfig::from_env();
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(dir) = cli.model_dir {
        config.model_dir = dir;
    }
    telemetry::init(&config.log_filter)?;
    config.log_config();

    let mut train_config = TrainConfig::default();
    if let Some(trees) = cli.trees {
        train_config.forest.n_trees = trees;
    }
    if let Some(seed) = cli.seed {
        train_config.forest.seed = seed;
        train_config.split_seed = seed;
    }

    let dataset = Dataset::load(&config.data_path)?;
    tracing::info!("Loaded {} rows, columns: {:?}", dataset.height(), dataset.column_names());

    let (artifacts, report) = train(&dataset, &train_config)?;

    match report.test_accuracy {
        Some(accuracy) => println!(
            "Model accuracy: {:.4} ({} train rows, {} test rows)",
            accuracy, report.n_train, report.n_test
        ),
        None => println!("Model trained on {} rows (no test rows held out)", report.n_train),
    }

    artifacts
        .save(&config.model_dir)
        .with_context(|| format!("Failed to save model to {}", config.model_dir.display()))?;
    println!("Model and encoders saved to {}", config.model_dir.display());

    Ok(())
}
