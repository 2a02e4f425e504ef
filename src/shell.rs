//! Interactive prompts for one observation
//!
//! Numeric fields show the training range and default to the median;
//! out-of-range values are kept with a note. Categorical fields list the
//! known classes and default to the first one; unknown names are passed
//! through so the codec can reject them for that request only.

use crate::advisor::AdvisorContext;
use crate::codec::CategoryCodec;
use crate::features::{Feature, NumericFeature};
use crate::observation::Observation;
use crate::utils::FeatureProfile;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

/// Line-oriented prompter over any input/output pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Prompt for all eight fields in vector order; `None` at end of input
    pub fn read_observation(&mut self, ctx: &AdvisorContext) -> Result<Option<Observation>> {
        let profiles = &ctx.profiles;
        let numeric =
            |prompter: &mut Self, feature: NumericFeature| prompter.prompt_numeric(feature, profiles.get(feature));

        let Some(temperature) = numeric(self, NumericFeature::Temperature)? else { return Ok(None) };
        let Some(humidity) = numeric(self, NumericFeature::Humidity)? else { return Ok(None) };
        let Some(moisture) = numeric(self, NumericFeature::Moisture)? else { return Ok(None) };
        let Some(soil_type) = self.prompt_category(Feature::SoilType.column_name(), &ctx.codecs.soil)? else {
            return Ok(None);
        };
        let Some(crop_type) = self.prompt_category(Feature::CropType.column_name(), &ctx.codecs.crop)? else {
            return Ok(None);
        };
        let Some(nitrogen) = numeric(self, NumericFeature::Nitrogen)? else { return Ok(None) };
        let Some(potassium) = numeric(self, NumericFeature::Potassium)? else { return Ok(None) };
        let Some(phosphorous) = numeric(self, NumericFeature::Phosphorous)? else { return Ok(None) };

        Ok(Some(Observation {
            temperature,
            humidity,
            moisture,
            soil_type,
            crop_type,
            nitrogen,
            potassium,
            phosphorous,
        }))
    }

    /// Re-prompts until the answer is blank (median) or a finite number
    pub fn prompt_numeric(&mut self, feature: NumericFeature, profile: &FeatureProfile) -> Result<Option<f64>> {
        let unit = match feature.unit() {
            "" => String::new(),
            unit => format!(" ({})", unit),
        };
        loop {
            write!(
                self.output,
                "{}{} [min {:.1}, max {:.1}, default {:.1}]: ",
                feature, unit, profile.min, profile.max, profile.q2
            )?;
            let Some(line) = self.next_line()? else { return Ok(None) };
            if line.is_empty() {
                return Ok(Some(profile.q2));
            }
            match line.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    if !profile.contains(value) {
                        writeln!(
                            self.output,
                            "  note: {} is outside the training range [{:.1}, {:.1}]",
                            value, profile.min, profile.max
                        )?;
                    }
                    return Ok(Some(value));
                }
                _ => writeln!(self.output, "  please enter a number")?,
            }
        }
    }

    /// First known class by default; unknown names are passed through
    pub fn prompt_category(&mut self, label: &str, codec: &CategoryCodec) -> Result<Option<String>> {
        let Some(default) = codec.classes().first() else {
            bail!("no known {} values in the model encoders", codec.domain());
        };
        write!(self.output, "{} [{}] (default {}): ", label, codec.classes().join(", "), default)?;
        let Some(line) = self.next_line()? else { return Ok(None) };
        Ok(Some(if line.is_empty() { default.clone() } else { line }))
    }

    /// Trimmed next line; `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CategoryDomain, CodecSet};
    use crate::explanation::AdvisoryTable;
    use crate::utils::FeatureProfiles;
    use std::io::Cursor;

    fn context() -> AdvisorContext {
        AdvisorContext {
            profiles: FeatureProfiles::from_columns(|_| vec![10.0, 20.0, 30.0, 40.0]).unwrap(),
            codecs: CodecSet {
                soil: CategoryCodec::fit(CategoryDomain::Soil, ["Loamy", "Sandy"]),
                crop: CategoryCodec::fit(CategoryDomain::Crop, ["Maize", "Wheat"]),
                fertilizer: CategoryCodec::fit(CategoryDomain::Fertilizer, ["DAP", "Urea"]),
            },
            advisories: AdvisoryTable::default(),
        }
    }

    fn run(input: &str) -> (Option<Observation>, String) {
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new());
        let observation = prompter.read_observation(&context()).unwrap();
        (observation, String::from_utf8(prompter.output().clone()).unwrap())
    }

    #[test]
    fn test_blank_answers_take_defaults() {
        let (observation, transcript) = run("\n\n\n\n\n\n\n\n");
        let observation = observation.unwrap();

        assert_eq!(observation.temperature, 25.0);
        assert_eq!(observation.phosphorous, 25.0);
        assert_eq!(observation.soil_type, "Loamy");
        assert_eq!(observation.crop_type, "Maize");
        assert!(transcript.contains("Temperature (°C) [min 10.0, max 40.0, default 25.0]: "));
        assert!(transcript.contains("Soil Type [Loamy, Sandy] (default Loamy): "));
    }

    #[test]
    fn test_answers_fill_vector_order() {
        let (observation, _) = run("26\n52\n38\nSandy\nWheat\n37\n0\n5\n");
        assert_eq!(
            observation.unwrap(),
            Observation {
                temperature: 26.0,
                humidity: 52.0,
                moisture: 38.0,
                soil_type: "Sandy".to_string(),
                crop_type: "Wheat".to_string(),
                nitrogen: 37.0,
                potassium: 0.0,
                phosphorous: 5.0,
            }
        );
    }

    #[test]
    fn test_out_of_range_kept_with_note() {
        let (observation, transcript) = run("99\n\n\n\n\n\n\n\n");
        assert_eq!(observation.unwrap().temperature, 99.0);
        assert!(transcript.contains("note: 99 is outside the training range [10.0, 40.0]"));
    }

    #[test]
    fn test_non_numbers_reprompted() {
        let (observation, transcript) = run("hot\nNaN\n31\n\n\n\n\n\n\n\n");
        assert_eq!(observation.unwrap().temperature, 31.0);
        assert_eq!(transcript.matches("please enter a number").count(), 2);
    }

    #[test]
    fn test_unknown_category_passed_through() {
        let (observation, _) = run("\n\n\n Peaty \n\n\n\n\n");
        assert_eq!(observation.unwrap().soil_type, "Peaty");
    }

    #[test]
    fn test_empty_codec_is_an_error() {
        let mut prompter = Prompter::new(Cursor::new("\n"), Vec::new());
        let empty = CategoryCodec::fit(CategoryDomain::Crop, Vec::<String>::new());
        let err = prompter.prompt_category("Crop Type", &empty).unwrap_err();
        assert!(err.to_string().contains("no known crop type values"));
    }

    #[test]
    fn test_end_of_input_mid_observation() {
        let (observation, _) = run("26\n52\n");
        assert!(observation.is_none());
        assert!(run("").0.is_none());
    }
}
