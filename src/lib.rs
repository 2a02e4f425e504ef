//! Fertilizer Advisor
//!
//! Recommends a fertilizer from field conditions and explains the
//! recommendation in terms of where each input falls within the training
//! data.
//!
//! - `utils/`: distribution profiling (quartiles per numeric feature)
//! - `codec`: category name ↔ code mapping
//! - `oracle/`: prediction capability and the random forest behind it
//! - `explanation/`: bucket classification, advisory notes, composer, formatters
//! - `data`: dataset loading with Polars
//! - `training` / `artifacts`: fitting and persisting the model
//! - `advisor`: encode → predict → decode → explain
//! - `shell`: interactive prompts for one observation

pub mod error;
pub mod features;
pub mod config;
pub mod telemetry;
pub mod utils;
pub mod codec;
pub mod observation;
pub mod data;
pub mod oracle;
pub mod explanation;
pub mod artifacts;
pub mod training;
pub mod advisor;
pub mod shell;

// Re-export commonly used types
pub use advisor::{AdvisorContext, FertilizerAdvisor, Recommendation};
pub use artifacts::{ModelArtifacts, TrainedModel};
pub use codec::{CategoryCodec, CategoryDomain, CodecSet};
pub use config::{AdvisorConfig, TrainConfig};
pub use data::Dataset;
pub use error::*;
pub use explanation::{AdvisoryTable, Bucket, Explanation, ExplanationGenerator, JsonFormatter, MarkdownFormatter};
pub use features::{Feature, NumericFeature};
pub use observation::{FeatureVector, Observation};
pub use oracle::{ForestConfig, PredictionOracle, RandomForest};
pub use shell::Prompter;
pub use training::{train, TrainingReport};
pub use utils::{FeatureProfile, FeatureProfiles};
