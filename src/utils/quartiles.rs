//! Quartile Profiling
//!
//! Five-number summaries (min, q1, median, q3, max) of each numeric
//! training column. Bucket boundaries downstream depend on these values, so
//! the interpolation method is fixed:
//!
//! Linear interpolation between order statistics (Hyndman & Fan type 7,
//! the pandas/NumPy default):
//! 1. Sort the values: x[0] <= ... <= x[n-1]
//! 2. h = (n - 1) × p
//! 3. quantile = x[⌊h⌋] + (h - ⌊h⌋) × (x[⌈h⌉] - x[⌊h⌋])

use crate::data::Dataset;
use crate::error::ProfileError;
use crate::features::NumericFeature;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Distribution summary for a single numeric feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfile {
    pub min: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub max: f64,
}

impl FeatureProfile {
    /// Profile one column of observed values.
    ///
    /// Non-finite entries are skipped. Fails with `EmptyInput` when nothing
    /// remains.
    pub fn from_values(feature: NumericFeature, values: &[f64]) -> Result<Self, ProfileError> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Err(ProfileError::EmptyInput { feature });
        }
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            q2: quantile_sorted(&sorted, 0.50),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }

    /// Quartile breakpoints (q1, q2, q3)
    pub fn quartiles(&self) -> [f64; 3] {
        [self.q1, self.q2, self.q3]
    }

    /// Whether `value` lies within the observed training range
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Type-7 quantile of an ascending, non-empty slice
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let fraction = h - lower as f64;
    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Profiles for all six numeric features
///
/// Built once at startup; complete by construction, so lookups cannot fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfiles {
    profiles: [FeatureProfile; 6],
}

impl FeatureProfiles {
    /// Build from per-feature value columns, profiling each independently
    pub fn from_columns<F>(mut column: F) -> Result<Self, ProfileError>
    where
        F: FnMut(NumericFeature) -> Vec<f64>,
    {
        let empty = FeatureProfile { min: 0.0, q1: 0.0, q2: 0.0, q3: 0.0, max: 0.0 };
        let mut profiles = [empty; 6];
        for feature in NumericFeature::ALL {
            profiles[feature.slot()] = FeatureProfile::from_values(feature, &column(feature))?;
        }
        Ok(Self { profiles })
    }

    /// Profile every numeric column of a loaded dataset
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let mut columns = Vec::with_capacity(NumericFeature::ALL.len());
        for feature in NumericFeature::ALL {
            columns.push(dataset.numeric_values(feature)?);
        }
        let profiles = Self::from_columns(|feature| std::mem::take(&mut columns[feature.slot()]))?;
        Ok(profiles)
    }

    pub fn get(&self, feature: NumericFeature) -> &FeatureProfile {
        &self.profiles[feature.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NumericFeature, &FeatureProfile)> {
        NumericFeature::ALL.into_iter().zip(self.profiles.iter())
    }
}
