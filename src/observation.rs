//! A single prediction request.

use crate::codec::CodecSet;
use crate::error::CodecError;
use crate::features::{Feature, NumericFeature};
use serde::{Deserialize, Serialize};

/// Encoded feature vector in oracle order
pub type FeatureVector = [f64; 8];

/// Raw field measurements plus soil and crop names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub soil_type: String,
    pub crop_type: String,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
}

impl Observation {
    pub fn value(&self, feature: NumericFeature) -> f64 {
        match feature {
            NumericFeature::Temperature => self.temperature,
            NumericFeature::Humidity => self.humidity,
            NumericFeature::Moisture => self.moisture,
            NumericFeature::Nitrogen => self.nitrogen,
            NumericFeature::Potassium => self.potassium,
            NumericFeature::Phosphorous => self.phosphorous,
        }
    }

    /// Encode into the oracle's 8-wide vector.
    ///
    /// Fails when soil or crop type was not seen during training; names are
    /// never coerced into a code.
    pub fn encode(&self, codecs: &CodecSet) -> Result<FeatureVector, CodecError> {
        let mut vector = [0.0; 8];
        for numeric in NumericFeature::ALL {
            vector[numeric.feature().index()] = self.value(numeric);
        }
        vector[Feature::SoilType.index()] = codecs.soil.encode(&self.soil_type)? as f64;
        vector[Feature::CropType.index()] = codecs.crop.encode(&self.crop_type)? as f64;
        Ok(vector)
    }
}
