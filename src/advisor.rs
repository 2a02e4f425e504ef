//! Recommendation orchestration
//!
//! Encode → predict → decode → explain, over an immutable context built
//! once at startup.

use crate::artifacts::ModelArtifacts;
use crate::codec::CodecSet;
use crate::data::Dataset;
use crate::error::RecommendError;
use crate::explanation::{AdvisoryTable, Explanation, ExplanationGenerator};
use crate::observation::Observation;
use crate::oracle::PredictionOracle;
use crate::utils::FeatureProfiles;
use anyhow::Result;
use serde::Serialize;

/// Everything a recommendation reads besides the oracle
///
/// Built once; shared read-only across requests.
#[derive(Debug, Clone)]
pub struct AdvisorContext {
    pub profiles: FeatureProfiles,
    pub codecs: CodecSet,
    pub advisories: AdvisoryTable,
}

/// One answered request
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub fertilizer: String,
    pub observation: Observation,
    pub profiles: FeatureProfiles,
    pub explanation: Explanation,
}

pub struct FertilizerAdvisor {
    context: AdvisorContext,
    oracle: Box<dyn PredictionOracle>,
}

impl FertilizerAdvisor {
    pub fn new(context: AdvisorContext, oracle: Box<dyn PredictionOracle>) -> Self {
        Self { context, oracle }
    }

    /// Profiles from the dataset, codecs and forest from the artifacts
    pub fn from_parts(dataset: &Dataset, artifacts: ModelArtifacts, advisories: AdvisoryTable) -> Result<Self> {
        let profiles = FeatureProfiles::from_dataset(dataset)?;
        let ModelArtifacts { model, codecs } = artifacts;

        Ok(Self::new(
            AdvisorContext {
                profiles,
                codecs,
                advisories,
            },
            Box::new(model.forest),
        ))
    }

    pub fn context(&self) -> &AdvisorContext {
        &self.context
    }

    /// Predict a fertilizer for `observation` and compose its rationale
    ///
    /// Every error is per-request; the advisor is unchanged afterwards.
    pub fn recommend(&self, observation: &Observation) -> Result<Recommendation, RecommendError> {
        let ctx = &self.context;
        let features = observation.encode(&ctx.codecs)?;
        let code = self.oracle.predict(&features)?;

        let fertilizer = ctx.codecs.fertilizer.decode(code)?;
        let soil = ctx.codecs.soil.decode(features[3] as usize)?;
        let crop = ctx.codecs.crop.decode(features[4] as usize)?;

        let explanation = ExplanationGenerator::explain(
            observation,
            &ctx.profiles,
            soil,
            crop,
            fertilizer,
            &ctx.advisories,
        );

        Ok(Recommendation {
            fertilizer: fertilizer.to_string(),
            observation: observation.clone(),
            profiles: ctx.profiles.clone(),
            explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CategoryCodec, CategoryDomain};
    use crate::error::{CodecError, OracleError};

    /// Always answers the same code
    struct FixedOracle(usize);

    impl PredictionOracle for FixedOracle {
        fn predict(&self, features: &[f64]) -> Result<usize, OracleError> {
            if features.len() != 8 {
                return Err(OracleError::ShapeMismatch { expected: 8, actual: features.len() });
            }
            Ok(self.0)
        }
    }

    fn context() -> AdvisorContext {
        AdvisorContext {
            profiles: FeatureProfiles::from_columns(|_| vec![10.0, 20.0, 30.0, 40.0]).unwrap(),
            codecs: CodecSet {
                soil: CategoryCodec::fit(CategoryDomain::Soil, ["Clayey", "Loamy", "Sandy"]),
                crop: CategoryCodec::fit(CategoryDomain::Crop, ["Maize", "Wheat"]),
                fertilizer: CategoryCodec::fit(CategoryDomain::Fertilizer, ["28-28", "DAP", "Urea"]),
            },
            advisories: AdvisoryTable::default(),
        }
    }

    fn observation() -> Observation {
        Observation {
            temperature: 26.0,
            humidity: 52.0,
            moisture: 38.0,
            soil_type: "Sandy".to_string(),
            crop_type: "Maize".to_string(),
            nitrogen: 37.0,
            potassium: 0.0,
            phosphorous: 0.0,
        }
    }

    #[test]
    fn test_recommend() {
        let advisor = FertilizerAdvisor::new(context(), Box::new(FixedOracle(2)));
        let rec = advisor.recommend(&observation()).unwrap();

        assert_eq!(rec.fertilizer, "Urea");
        assert_eq!(rec.explanation.fertilizer(), Some("Urea"));
        assert_eq!(rec.explanation.sections.len(), Explanation::SECTION_COUNT);
        assert_eq!(rec.observation, observation());
    }

    #[test]
    fn test_unknown_category_is_recoverable() {
        let advisor = FertilizerAdvisor::new(context(), Box::new(FixedOracle(0)));
        let mut obs = observation();
        obs.soil_type = "Peaty".to_string();

        let err = advisor.recommend(&obs).unwrap_err();
        assert_eq!(
            err,
            RecommendError::Codec(CodecError::UnknownCategory {
                domain: CategoryDomain::Soil,
                name: "Peaty".to_string(),
            })
        );
        assert!(err.is_recoverable());

        // Same advisor keeps serving
        assert!(advisor.recommend(&observation()).is_ok());
    }

    #[test]
    fn test_label_outside_codec() {
        let advisor = FertilizerAdvisor::new(context(), Box::new(FixedOracle(7)));
        let err = advisor.recommend(&observation()).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::Codec(CodecError::InvalidCode { code: 7, n_categories: 3, .. })
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_advisor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FertilizerAdvisor>();
    }
}
