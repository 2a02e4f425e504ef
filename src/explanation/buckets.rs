//! Quartile bucket classification.
//!
//! Places a raw value into one of four ordinal buckets relative to a
//! feature's training quartiles. Each bucket includes its upper bound:
//! a value equal to q1 is Low, not Medium-Low.
//!
//! min/max play no part: values outside the training range fall into Low
//! or High like any other.

use crate::utils::FeatureProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal position of a value within the training distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Low,
    MediumLow,
    MediumHigh,
    High,
}

impl Bucket {
    /// Classify `value` against the profile's quartiles.
    ///
    /// Total: NaN fails every comparison and lands in High.
    pub fn classify(value: f64, profile: &FeatureProfile) -> Self {
        if value <= profile.q1 {
            Bucket::Low
        } else if value <= profile.q2 {
            Bucket::MediumLow
        } else if value <= profile.q3 {
            Bucket::MediumHigh
        } else {
            Bucket::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Low => "Low",
            Bucket::MediumLow => "Medium-Low",
            Bucket::MediumHigh => "Medium-High",
            Bucket::High => "High",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
