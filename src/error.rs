//! Error types
//!
//! Core operations (profiling, codecs, oracle calls) return these typed
//! errors and never log. Binaries wrap them in `anyhow` for reporting.

use crate::codec::CategoryDomain;
use crate::features::NumericFeature;
use thiserror::Error;

/// Dataset failed validation before reaching the core. Fatal to startup.
#[derive(Debug, Error)]
pub enum DataQualityError {
    #[error("dataset is missing required columns: {missing:?} (actual columns: {actual:?})")]
    MissingColumns {
        missing: Vec<String>,
        actual: Vec<String>,
    },

    #[error("column '{column}' contains no valid values")]
    NoValidValues { column: String },

    #[error("no row has valid values for every feature and the target")]
    NoCompleteRows,
}

/// Profiling failed. Fatal to startup.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("cannot profile {feature}: no valid values")]
    EmptyInput { feature: NumericFeature },
}

/// Category encode/decode failed. Recoverable per request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("unknown {domain} '{name}' (not seen during training)")]
    UnknownCategory { domain: CategoryDomain, name: String },

    #[error("invalid {domain} code {code} (expected 0..{n_categories})")]
    InvalidCode {
        domain: CategoryDomain,
        code: usize,
        n_categories: usize,
    },

    #[error("{domain} classes must be sorted and distinct (found '{previous}' before '{next}')")]
    UnsortedClasses {
        domain: CategoryDomain,
        previous: String,
        next: String,
    },
}

/// Prediction oracle rejected its input. Recoverable per request.
#[derive(Debug, Error, PartialEq)]
pub enum OracleError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature {index} is not a finite number ({value})")]
    NonFinite { index: usize, value: f64 },

    #[error("model has no trees")]
    EmptyModel,
}

/// Structural defect in a single tree
#[derive(Debug, Error, PartialEq)]
pub enum TreeDefect {
    #[error("tree has no nodes")]
    Empty,

    #[error("node {node} points to child {child}, which is not a later node")]
    BadChild { node: usize, child: usize },

    #[error("node {node} splits on feature {feature} of {n_features}")]
    FeatureOutOfRange {
        node: usize,
        feature: usize,
        n_features: usize,
    },

    #[error("node {node} predicts class {class} of {n_classes}")]
    ClassOutOfRange {
        node: usize,
        class: usize,
        n_classes: usize,
    },
}

/// A forest that cannot be walked safely, or does not fit its encoders
#[derive(Debug, Error, PartialEq)]
pub enum ModelStructureError {
    #[error("forest has no trees")]
    NoTrees,

    #[error("tree {tree}: {defect}")]
    Tree {
        tree: usize,
        #[source]
        defect: TreeDefect,
    },

    #[error("forest expects {actual} features, observations encode to {expected}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("forest predicts {actual} classes, fertilizer encoder has {expected}")]
    ClassCount { expected: usize, actual: usize },
}

/// Persisted model artifacts could not be used. Fatal to startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    InvalidModel(#[from] ModelStructureError),

    #[error("model was trained with different encoders (model fingerprint {model:016x}, encoders fingerprint {encoders:016x})")]
    FingerprintMismatch { model: u64, encoders: u64 },
}

/// Failure of a single recommendation request.
#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("prediction failed: {0}")]
    Oracle(#[from] OracleError),
}

impl RecommendError {
    /// Whether the session may continue after this error.
    ///
    /// Every per-request failure is recoverable: the request is rejected
    /// and the caller keeps its state.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RecommendError::Codec(_) | RecommendError::Oracle(_) => true,
        }
    }
}
