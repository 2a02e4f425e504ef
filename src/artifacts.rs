//! Model Artifacts
//!
//! The trained forest and the codec triple are persisted as two JSON files
//! in one directory:
//! - `fertilizer_model.json`: forest, training metadata, codec fingerprint
//! - `encoders.json`: soil / crop / fertilizer class lists
//!
//! The forest's inputs and outputs are codes, so it is only meaningful with
//! the encoders it was trained with. Loading recomputes the encoders'
//! fingerprint and refuses a mismatched pair. The forest must also take an
//! encoded observation and answer within the fertilizer encoder; malformed
//! trees are already rejected while parsing.

use crate::codec::CodecSet;
use crate::error::{ArtifactError, ModelStructureError};
use crate::features::Feature;
use crate::oracle::{ForestConfig, RandomForest};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MODEL_FILE: &str = "fertilizer_model.json";
pub const ENCODERS_FILE: &str = "encoders.json";

/// Contents of `fertilizer_model.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// `CodecSet::fingerprint` of the encoders used in training
    pub codec_fingerprint: u64,
    pub trained_at: DateTime<Utc>,
    pub config: ForestConfig,
    /// Accuracy on the held-out split (None when the split was empty)
    pub test_accuracy: Option<f64>,
    pub forest: RandomForest,
}

/// A forest paired with the encoders it was trained with
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub model: TrainedModel,
    pub codecs: CodecSet,
}

impl ModelArtifacts {
    /// Write both files into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        write_json(&dir.join(MODEL_FILE), &self.model)?;
        write_json(&dir.join(ENCODERS_FILE), &self.codecs)?;
        Ok(())
    }

    /// Read both files from `dir` and verify they belong together
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let model: TrainedModel = read_json(&dir.join(MODEL_FILE))?;
        let codecs: CodecSet = read_json(&dir.join(ENCODERS_FILE))?;

        let encoders = codecs.fingerprint();
        if model.codec_fingerprint != encoders {
            return Err(ArtifactError::FingerprintMismatch {
                model: model.codec_fingerprint,
                encoders,
            });
        }

        let forest = &model.forest;
        if forest.n_features() != Feature::ALL.len() {
            return Err(ModelStructureError::FeatureWidth {
                expected: Feature::ALL.len(),
                actual: forest.n_features(),
            }
            .into());
        }
        if forest.n_classes() != codecs.fertilizer.len() {
            return Err(ModelStructureError::ClassCount {
                expected: codecs.fertilizer.len(),
                actual: forest.n_classes(),
            }
            .into());
        }

        Ok(Self { model, codecs })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| ArtifactError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Json {
        path: path.display().to_string(),
        source,
    })
}
