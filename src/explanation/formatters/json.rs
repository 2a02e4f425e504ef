use crate::advisor::Recommendation;
use crate::explanation::types::ExplanationSection;
use crate::features::NumericFeature;
use crate::observation::Observation;
use serde::Serialize;

/// Machine-readable recommendation report
///
/// ```json
/// {
///   "fertilizer": "Urea",
///   "inputs": { "temperature": 26.0, ... },
///   "outside_training_range": ["Nitrogen"],
///   "sections": [ ... nine sections ... ]
/// }
/// ```
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    fertilizer: &'a str,
    inputs: &'a Observation,
    /// Numeric inputs outside the [min, max] seen in training
    outside_training_range: Vec<NumericFeature>,
    sections: &'a [ExplanationSection],
}

impl JsonFormatter {
    /// Pretty-printed report for one recommendation
    pub fn format(recommendation: &Recommendation) -> Result<String, serde_json::Error> {
        let outside_training_range = NumericFeature::ALL
            .into_iter()
            .filter(|&feature| {
                !recommendation
                    .profiles
                    .get(feature)
                    .contains(recommendation.observation.value(feature))
            })
            .collect();

        serde_json::to_string_pretty(&JsonReport {
            fertilizer: &recommendation.fertilizer,
            inputs: &recommendation.observation,
            outside_training_range,
            sections: &recommendation.explanation.sections,
        })
    }
}
