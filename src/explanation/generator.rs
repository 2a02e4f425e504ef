use crate::explanation::advisory::AdvisoryTable;
use crate::explanation::buckets::Bucket;
use crate::explanation::types::*;
use crate::features::Feature;
use crate::observation::Observation;
use crate::utils::FeatureProfiles;

/// Main explanation generator
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    /// Compose the templated rationale for a prediction
    ///
    /// Takes:
    /// - observation: raw (pre-encoding) inputs
    /// - profiles: training quartiles per numeric feature
    /// - decoded_soil / decoded_crop: category names after the codec round trip
    /// - decoded_label: the predicted fertilizer name
    /// - advisories: static feature → note table
    ///
    /// Returns: nine sections in fixed order. Nothing here looks at why the
    /// model chose `decoded_label`; sections only place each input within
    /// the training distribution.
    pub fn explain(
        observation: &Observation,
        profiles: &FeatureProfiles,
        decoded_soil: &str,
        decoded_crop: &str,
        decoded_label: &str,
        advisories: &AdvisoryTable,
    ) -> Explanation {
        let mut sections = Vec::with_capacity(Explanation::SECTION_COUNT);

        for (i, feature) in Feature::ALL.into_iter().enumerate() {
            let detail = match feature.as_numeric() {
                Some(numeric) => {
                    let value = observation.value(numeric);
                    let profile = profiles.get(numeric);
                    SectionDetail::Numeric {
                        feature,
                        value,
                        unit: numeric.unit().to_string(),
                        bucket: Bucket::classify(value, profile),
                        quartiles: profile.quartiles(),
                    }
                }
                None => SectionDetail::Categorical {
                    feature,
                    category: match feature {
                        Feature::SoilType => decoded_soil.to_string(),
                        _ => decoded_crop.to_string(),
                    },
                },
            };

            sections.push(ExplanationSection {
                number: i + 1,
                title: feature.column_name().to_string(),
                detail,
                advisory: Some(advisories.note(feature).to_string()),
            });
        }

        sections.push(ExplanationSection {
            number: Explanation::SECTION_COUNT,
            title: "Final Conclusion".to_string(),
            detail: SectionDetail::Conclusion {
                fertilizer: decoded_label.to_string(),
            },
            advisory: None,
        });

        Explanation { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NumericFeature;

    fn profiles() -> FeatureProfiles {
        FeatureProfiles::from_columns(|_| vec![10.0, 20.0, 30.0, 40.0]).unwrap()
    }

    fn observation() -> Observation {
        Observation {
            temperature: 17.5,
            humidity: 25.0,
            moisture: 26.0,
            soil_type: "Loamy".to_string(),
            crop_type: "Wheat".to_string(),
            nitrogen: 35.0,
            potassium: 5.0,
            phosphorous: 100.0,
        }
    }

    fn explain(obs: &Observation) -> Explanation {
        ExplanationGenerator::explain(obs, &profiles(), "Loamy", "Wheat", "Urea", &AdvisoryTable::default())
    }

    #[test]
    fn test_nine_sections_in_order() {
        let explanation = explain(&observation());
        assert_eq!(explanation.sections.len(), 9);

        let titles: Vec<&str> = explanation.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Temperature", "Humidity", "Moisture", "Soil Type", "Crop Type",
                "Nitrogen", "Potassium", "Phosphorous", "Final Conclusion",
            ]
        );
        let numbers: Vec<usize> = explanation.sections.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_numeric_buckets() {
        let explanation = explain(&observation());
        let buckets: Vec<Bucket> = explanation
            .sections
            .iter()
            .filter_map(|s| match &s.detail {
                SectionDetail::Numeric { bucket, .. } => Some(*bucket),
                _ => None,
            })
            .collect();

        assert_eq!(
            buckets,
            vec![
                Bucket::Low,        // temperature 17.5
                Bucket::MediumLow,  // humidity 25
                Bucket::MediumHigh, // moisture 26
                Bucket::High,       // nitrogen 35
                Bucket::Low,        // potassium 5
                Bucket::High,       // phosphorous 100
            ]
        );
    }

    #[test]
    fn test_categorical_sections_carry_decoded_names() {
        let explanation = explain(&observation());
        assert_eq!(
            explanation.sections[3].detail,
            SectionDetail::Categorical {
                feature: Feature::SoilType,
                category: "Loamy".to_string(),
            }
        );
        assert_eq!(
            explanation.sections[4].detail,
            SectionDetail::Categorical {
                feature: Feature::CropType,
                category: "Wheat".to_string(),
            }
        );
    }

    #[test]
    fn test_advisories_attached() {
        let explanation = explain(&observation());
        let table = AdvisoryTable::default();
        for (section, feature) in explanation.sections.iter().zip(Feature::ALL) {
            assert_eq!(section.advisory.as_deref(), Some(table.note(feature)));
        }
        assert_eq!(explanation.sections[8].advisory, None);
    }

    #[test]
    fn test_conclusion_names_label() {
        let explanation = explain(&observation());
        assert_eq!(explanation.fertilizer(), Some("Urea"));
    }

    #[test]
    fn test_quartiles_from_profile() {
        let explanation = explain(&observation());
        match &explanation.sections[0].detail {
            SectionDetail::Numeric { quartiles, unit, .. } => {
                assert_eq!(*quartiles, [17.5, 25.0, 32.5]);
                assert_eq!(unit, NumericFeature::Temperature.unit());
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_section_count_independent_of_values() {
        let mut obs = observation();
        obs.temperature = f64::NAN;
        obs.nitrogen = -1e9;
        assert_eq!(explain(&obs).sections.len(), Explanation::SECTION_COUNT);
    }
}
