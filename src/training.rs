//! Training Pipeline
//!
//! 1. Fit the soil / crop / fertilizer codecs on the whole dataset
//! 2. Encode every complete row into the 8-wide feature vector
//! 3. Shuffle (seeded) and hold out a test split
//! 4. Fit the random forest on the training split
//! 5. Score the held-out split and bundle the artifacts

use crate::artifacts::{ModelArtifacts, TrainedModel};
use crate::config::TrainConfig;
use crate::data::Dataset;
use crate::oracle::RandomForest;
use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Instant;

/// Summary of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub n_classes: usize,
    pub test_accuracy: Option<f64>,
    pub avg_depth: f64,
    pub total_nodes: usize,
}

/// Held-out row count: ⌈fraction · n⌉, leaving at least one training row
pub fn test_split_size(n_rows: usize, test_fraction: f64) -> usize {
    if n_rows < 2 {
        return 0;
    }
    let n_test = (test_fraction.clamp(0.0, 1.0) * n_rows as f64).ceil() as usize;
    n_test.min(n_rows - 1)
}

/// Fit codecs and forest on a validated dataset
pub fn train(dataset: &Dataset, config: &TrainConfig) -> Result<(ModelArtifacts, TrainingReport)> {
    let start = Instant::now();

    let codecs = dataset.fit_codecs()?;
    let records = dataset.training_records()?;
    tracing::info!(
        "Training rows: {} complete of {} ({} soil types, {} crop types, {} fertilizers)",
        records.len(),
        dataset.height(),
        codecs.soil.len(),
        codecs.crop.len(),
        codecs.fertilizer.len()
    );

    let mut x = Vec::with_capacity(records.len());
    let mut y = Vec::with_capacity(records.len());
    for record in &records {
        let vector = record
            .observation
            .encode(&codecs)
            .with_context(|| "Failed to encode training row")?;
        x.push(vector.to_vec());
        y.push(codecs.fertilizer.encode(&record.fertilizer)?);
    }

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(config.split_seed));
    let n_test = test_split_size(records.len(), config.test_fraction);
    let (test_idx, train_idx) = order.split_at(n_test);

    let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<usize>) {
        idx.iter().map(|&i| (x[i].clone(), y[i])).unzip()
    };
    let (x_train, y_train) = pick(train_idx);
    let (x_test, y_test) = pick(test_idx);

    let fit_start = Instant::now();
    let n_classes = codecs.fertilizer.len();
    let forest = RandomForest::fit(&x_train, &y_train, n_classes, &config.forest);
    tracing::info!(
        "Fitted {} trees on {} rows in {:.2}s (avg depth {:.1}, {} nodes)",
        forest.n_trees(),
        x_train.len(),
        fit_start.elapsed().as_secs_f64(),
        forest.avg_depth(),
        forest.total_nodes()
    );

    let test_accuracy = if x_test.is_empty() {
        tracing::warn!("Test split is empty; accuracy not measured");
        None
    } else {
        Some(forest.accuracy(&x_test, &y_test)?)
    };

    let report = TrainingReport {
        n_rows: records.len(),
        n_train: x_train.len(),
        n_test: x_test.len(),
        n_classes,
        test_accuracy,
        avg_depth: forest.avg_depth(),
        total_nodes: forest.total_nodes(),
    };

    let artifacts = ModelArtifacts {
        model: TrainedModel {
            codec_fingerprint: codecs.fingerprint(),
            trained_at: Utc::now(),
            config: config.forest,
            test_accuracy,
            forest,
        },
        codecs,
    };

    tracing::info!("Training complete in {:.2}s", start.elapsed().as_secs_f64());
    Ok((artifacts, report))
}
