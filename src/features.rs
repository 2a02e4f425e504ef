//! Input dimensions
//!
//! Fixed identities for the eight inputs. The order of [`Feature::ALL`] is
//! both the oracle's feature-vector layout and the explanation order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight input dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    Temperature,
    Humidity,
    Moisture,
    SoilType,
    CropType,
    Nitrogen,
    Potassium,
    Phosphorous,
}

impl Feature {
    /// All features in vector/explanation order
    pub const ALL: [Feature; 8] = [
        Feature::Temperature,
        Feature::Humidity,
        Feature::Moisture,
        Feature::SoilType,
        Feature::CropType,
        Feature::Nitrogen,
        Feature::Potassium,
        Feature::Phosphorous,
    ];

    /// Canonical dataset column name
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::Moisture => "Moisture",
            Feature::SoilType => "Soil Type",
            Feature::CropType => "Crop Type",
            Feature::Nitrogen => "Nitrogen",
            Feature::Potassium => "Potassium",
            Feature::Phosphorous => "Phosphorous",
        }
    }

    /// Position in the encoded feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_numeric(self) -> Option<NumericFeature> {
        match self {
            Feature::Temperature => Some(NumericFeature::Temperature),
            Feature::Humidity => Some(NumericFeature::Humidity),
            Feature::Moisture => Some(NumericFeature::Moisture),
            Feature::Nitrogen => Some(NumericFeature::Nitrogen),
            Feature::Potassium => Some(NumericFeature::Potassium),
            Feature::Phosphorous => Some(NumericFeature::Phosphorous),
            Feature::SoilType | Feature::CropType => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// The six numeric dimensions (the ones that get profiled)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NumericFeature {
    Temperature,
    Humidity,
    Moisture,
    Nitrogen,
    Potassium,
    Phosphorous,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 6] = [
        NumericFeature::Temperature,
        NumericFeature::Humidity,
        NumericFeature::Moisture,
        NumericFeature::Nitrogen,
        NumericFeature::Potassium,
        NumericFeature::Phosphorous,
    ];

    pub fn feature(self) -> Feature {
        match self {
            NumericFeature::Temperature => Feature::Temperature,
            NumericFeature::Humidity => Feature::Humidity,
            NumericFeature::Moisture => Feature::Moisture,
            NumericFeature::Nitrogen => Feature::Nitrogen,
            NumericFeature::Potassium => Feature::Potassium,
            NumericFeature::Phosphorous => Feature::Phosphorous,
        }
    }

    pub fn column_name(self) -> &'static str {
        self.feature().column_name()
    }

    /// Display unit appended to raw values ("°C", "%", or none)
    pub fn unit(self) -> &'static str {
        match self {
            NumericFeature::Temperature => "°C",
            NumericFeature::Humidity | NumericFeature::Moisture => "%",
            NumericFeature::Nitrogen | NumericFeature::Potassium | NumericFeature::Phosphorous => "",
        }
    }

    /// Dense index into `NumericFeature::ALL`
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for NumericFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_layout() {
        assert_eq!(Feature::Temperature.index(), 0);
        assert_eq!(Feature::SoilType.index(), 3);
        assert_eq!(Feature::CropType.index(), 4);
        assert_eq!(Feature::Phosphorous.index(), 7);
    }

    #[test]
    fn test_numeric_round_trip() {
        for numeric in NumericFeature::ALL {
            assert_eq!(numeric.feature().as_numeric(), Some(numeric));
        }
        assert_eq!(Feature::SoilType.as_numeric(), None);
        assert_eq!(Feature::CropType.as_numeric(), None);
    }
}
