//! Random Forest classifier.
//!
//! Ensemble of [`DecisionTree`]s, each grown on a bootstrap sample with a
//! random feature subset per split, predicting by majority vote.
//!
//! Trees are trained in parallel with rayon. Tree `i` draws from its own
//! `StdRng` seeded with `seed + i`, so a fitted forest is identical for a
//! given seed regardless of thread scheduling.

use super::decision_tree::{majority_class, DecisionTree, TreeParams};
use super::PredictionOracle;
use crate::error::{ModelStructureError, OracleError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Forest hyperparameters (fixed; not tuned)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Result of Random Forest prediction with vote details
#[derive(Debug, Clone, PartialEq)]
pub struct ForestPrediction {
    /// Predicted class (majority vote)
    pub class: usize,
    /// Vote count per class
    pub votes: Vec<usize>,
    /// Fraction of trees voting for the winning class
    pub confidence: f64,
}

/// A trained Random Forest classifier
///
/// Deserialization checks every tree with [`DecisionTree::check_structure`],
/// so a loaded forest can always be walked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForestRepr")]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

/// Unchecked on-disk shape of [`RandomForest`]
#[derive(Deserialize)]
struct ForestRepr {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl TryFrom<ForestRepr> for RandomForest {
    type Error = ModelStructureError;

    fn try_from(repr: ForestRepr) -> Result<Self, Self::Error> {
        if repr.trees.is_empty() {
            return Err(ModelStructureError::NoTrees);
        }
        for (tree, decision_tree) in repr.trees.iter().enumerate() {
            decision_tree
                .check_structure(repr.n_features, repr.n_classes)
                .map_err(|defect| ModelStructureError::Tree { tree, defect })?;
        }
        Ok(Self {
            trees: repr.trees,
            n_features: repr.n_features,
            n_classes: repr.n_classes,
        })
    }
}

impl RandomForest {
    /// Fit a forest on feature rows `x` and class labels `y` (`< n_classes`).
    ///
    /// Candidate features per split: max(1, ⌊√n_features⌋).
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, config: &ForestConfig) -> Self {
        let n_samples = x.len();
        let n_features = x.first().map(Vec::len).unwrap_or(0);
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        };

        let trees = (0..config.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let bootstrap: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                DecisionTree::fit(x, y, bootstrap, n_classes, params, &mut rng)
            })
            .collect();

        Self {
            trees,
            n_features,
            n_classes,
        }
    }

    /// Predict a single sample with vote details
    pub fn predict_with_votes(&self, features: &[f64]) -> Result<ForestPrediction, OracleError> {
        if self.trees.is_empty() {
            return Err(OracleError::EmptyModel);
        }
        if features.len() != self.n_features {
            return Err(OracleError::ShapeMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if let Some((index, &value)) = features.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OracleError::NonFinite { index, value });
        }

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let pred = tree.predict(features);
            if pred < self.n_classes {
                votes[pred] += 1;
            }
        }

        let class = majority_class(&votes);
        let confidence = votes[class] as f64 / self.trees.len() as f64;

        Ok(ForestPrediction {
            class,
            votes,
            confidence,
        })
    }

    /// Fraction of rows whose prediction matches the label
    pub fn accuracy(&self, x: &[Vec<f64>], y: &[usize]) -> Result<f64, OracleError> {
        if x.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0;
        for (row, &label) in x.iter().zip(y) {
            if self.predict(row)? == label {
                correct += 1;
            }
        }
        Ok(correct as f64 / x.len() as f64)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Average tree depth across the forest
    pub fn avg_depth(&self) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: usize = self.trees.iter().map(DecisionTree::depth).sum();
        total as f64 / self.trees.len() as f64
    }

    /// Total number of nodes across all trees
    pub fn total_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }
}

impl PredictionOracle for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<usize, OracleError> {
        self.predict_with_votes(features).map(|p| p.class)
    }
}
