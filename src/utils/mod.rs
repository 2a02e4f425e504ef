//! Shared statistics helpers

pub mod quartiles;

pub use quartiles::{quantile_sorted, FeatureProfile, FeatureProfiles};
