//! Prediction Oracle
//!
//! The classifier is consumed through a single capability: map an encoded
//! feature vector to an encoded fertilizer label. The shipped
//! implementation is a random forest trained by `training`; any other model
//! can be substituted by implementing [`PredictionOracle`].

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::{DecisionTree, TreeNode};
pub use random_forest::{ForestConfig, ForestPrediction, RandomForest};

use crate::error::OracleError;

/// Opaque `predict(features) -> label` capability
pub trait PredictionOracle: Send + Sync {
    /// Predict the encoded label for one encoded feature vector
    fn predict(&self, features: &[f64]) -> Result<usize, OracleError>;
}
