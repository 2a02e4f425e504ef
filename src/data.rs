//! Data Loading and Column Normalization
//!
//! Loads the historical fertilizer dataset with Polars, normalizes column
//! names, and validates that every required column is present with at
//! least one usable value. Nothing reaches the profiler or the codecs
//! before these checks pass.

use crate::codec::{CategoryCodec, CategoryDomain, CodecSet};
use crate::error::DataQualityError;
use crate::features::{Feature, NumericFeature};
use crate::observation::Observation;
use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Target column holding the fertilizer label
pub const TARGET_COLUMN: &str = "Fertilizer Name";

/// Known spelling variants in published copies of the dataset
const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("Temparature", "Temperature"),
    ("Soil_Type", "Soil Type"),
    ("Crop_Type", "Crop Type"),
    ("Fertilizer_Name", "Fertilizer Name"),
];

/// Canonical name for a raw CSV header (trimmed, aliases resolved)
pub fn canonical_column_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    COLUMN_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(trimmed)
}

/// One complete labelled row
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRecord {
    pub observation: Observation,
    pub fertilizer: String,
}

/// Validated historical dataset
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Load and validate the dataset CSV
    pub fn load(path: &Path) -> Result<Self> {
        // Every column as text; numeric coercion happens per value, so a
        // stray entry anywhere in the file only drops that value
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.into()))
            .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
            .finish()
            .with_context(|| format!("Failed to load dataset CSV: {:?}", path))?;

        Self::from_frame(frame)
    }

    /// Normalize column names and validate an already-loaded frame
    pub fn from_frame(mut frame: DataFrame) -> Result<Self> {
        let names: Vec<String> = frame
            .get_column_names()
            .into_iter()
            .map(|name| canonical_column_name(name.as_str()).to_string())
            .collect();
        frame
            .set_column_names(names.iter().map(String::as_str))
            .with_context(|| "Failed to normalize column names")?;

        let dataset = Self { frame };
        dataset.require_columns(Feature::ALL.iter().map(|f| f.column_name()))?;

        for feature in NumericFeature::ALL {
            if dataset.numeric_values(feature)?.is_empty() {
                return Err(DataQualityError::NoValidValues {
                    column: feature.column_name().to_string(),
                }
                .into());
            }
        }
        for feature in [Feature::SoilType, Feature::CropType] {
            if dataset.category_values(feature.column_name())?.is_empty() {
                return Err(DataQualityError::NoValidValues {
                    column: feature.column_name().to_string(),
                }
                .into());
            }
        }

        Ok(dataset)
    }

    fn require_columns<'a>(&self, required: impl Iterator<Item = &'a str>) -> Result<(), DataQualityError> {
        let actual = self.column_names();
        let missing: Vec<String> = required
            .filter(|name| !actual.iter().any(|a| a == name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataQualityError::MissingColumns { missing, actual })
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Column coerced to f64; unparseable or non-finite entries become `None`
    fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self
            .frame
            .column(name)
            .with_context(|| format!("Column '{}' not found", name))?;

        let values: Vec<Option<f64>> = match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .map(|value| value.and_then(|text| text.trim().parse::<f64>().ok()))
                .collect(),
            _ => column
                .cast(&DataType::Float64)
                .with_context(|| format!("Column '{}' cannot be read as numbers", name))?
                .f64()?
                .into_iter()
                .collect(),
        };

        Ok(values
            .into_iter()
            .map(|value| value.filter(|v| v.is_finite()))
            .collect())
    }

    /// Column read as text; nulls and blank entries become `None`
    fn category_column(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self
            .frame
            .column(name)
            .with_context(|| format!("Column '{}' not found", name))?
            .cast(&DataType::String)?;

        Ok(column
            .str()?
            .into_iter()
            .map(|value| value.filter(|text| !text.trim().is_empty()).map(str::to_string))
            .collect())
    }

    /// Valid values of one numeric feature (missing/non-numeric dropped)
    pub fn numeric_values(&self, feature: NumericFeature) -> Result<Vec<f64>> {
        Ok(self.numeric_column(feature.column_name())?.into_iter().flatten().collect())
    }

    /// Non-null values of a categorical column
    pub fn category_values(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.category_column(name)?.into_iter().flatten().collect())
    }

    /// Fit the soil / crop / fertilizer codecs on every observed name
    pub fn fit_codecs(&self) -> Result<CodecSet> {
        self.require_columns([TARGET_COLUMN].into_iter())?;

        Ok(CodecSet {
            soil: CategoryCodec::fit(CategoryDomain::Soil, self.category_values(Feature::SoilType.column_name())?),
            crop: CategoryCodec::fit(CategoryDomain::Crop, self.category_values(Feature::CropType.column_name())?),
            fertilizer: CategoryCodec::fit(CategoryDomain::Fertilizer, self.category_values(TARGET_COLUMN)?),
        })
    }

    /// Rows where all eight features and the target are valid
    pub fn training_records(&self) -> Result<Vec<TrainingRecord>> {
        self.require_columns([TARGET_COLUMN].into_iter())?;

        let temperature = self.numeric_column(Feature::Temperature.column_name())?;
        let humidity = self.numeric_column(Feature::Humidity.column_name())?;
        let moisture = self.numeric_column(Feature::Moisture.column_name())?;
        let soil = self.category_column(Feature::SoilType.column_name())?;
        let crop = self.category_column(Feature::CropType.column_name())?;
        let nitrogen = self.numeric_column(Feature::Nitrogen.column_name())?;
        let potassium = self.numeric_column(Feature::Potassium.column_name())?;
        let phosphorous = self.numeric_column(Feature::Phosphorous.column_name())?;
        let target = self.category_column(TARGET_COLUMN)?;

        let mut records = Vec::with_capacity(self.height());
        for i in 0..self.height() {
            let row = (
                temperature[i],
                humidity[i],
                moisture[i],
                soil[i].as_ref(),
                crop[i].as_ref(),
                nitrogen[i],
                potassium[i],
                phosphorous[i],
                target[i].as_ref(),
            );
            if let (Some(t), Some(h), Some(m), Some(s), Some(c), Some(n), Some(k), Some(p), Some(f)) = row {
                records.push(TrainingRecord {
                    observation: Observation {
                        temperature: t,
                        humidity: h,
                        moisture: m,
                        soil_type: s.clone(),
                        crop_type: c.clone(),
                        nitrogen: n,
                        potassium: k,
                        phosphorous: p,
                    },
                    fertilizer: f.clone(),
                });
            }
        }

        if records.is_empty() {
            return Err(DataQualityError::NoCompleteRows.into());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df! {
            "Temparature" => &[26.0, 29.0, 34.0, 32.0],
            "Humidity " => &[52.0, 52.0, 65.0, 62.0],
            "Moisture" => &[38.0, 45.0, 62.0, 34.0],
            "Soil Type" => &["Sandy", "Loamy", "Black", "Red"],
            "Crop Type" => &["Maize", "Sugarcane", "Cotton", "Tobacco"],
            "Nitrogen" => &[37.0, 12.0, 7.0, 22.0],
            "Potassium" => &[0.0, 0.0, 9.0, 0.0],
            "Phosphorous" => &[0.0, 36.0, 30.0, 20.0],
            "Fertilizer Name" => &["Urea", "DAP", "14-35-14", "28-28"]
        }
        .unwrap()
    }

    #[test]
    fn test_canonical_column_names() {
        assert_eq!(canonical_column_name("Temparature"), "Temperature");
        assert_eq!(canonical_column_name("Humidity "), "Humidity");
        assert_eq!(canonical_column_name("  Soil_Type "), "Soil Type");
        assert_eq!(canonical_column_name("Fertilizer_Name"), "Fertilizer Name");
        assert_eq!(canonical_column_name("Nitrogen"), "Nitrogen");
    }

    #[test]
    fn test_from_frame_normalizes_headers() {
        let dataset = Dataset::from_frame(sample_frame()).unwrap();
        let names = dataset.column_names();
        assert!(names.contains(&"Temperature".to_string()));
        assert!(names.contains(&"Humidity".to_string()));
        assert_eq!(dataset.height(), 4);
    }

    #[test]
    fn test_missing_column_rejected() {
        let frame = sample_frame().drop("Moisture").unwrap();
        let err = Dataset::from_frame(frame).err().unwrap();
        let quality = err.downcast_ref::<DataQualityError>().unwrap();
        match quality {
            DataQualityError::MissingColumns { missing, .. } => {
                assert_eq!(missing, &vec!["Moisture".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_entries_dropped() {
        let frame = df! {
            "Temperature" => &["26", "hot", "34"],
            "Humidity" => &[52.0, 52.0, 65.0],
            "Moisture" => &[38.0, 45.0, 62.0],
            "Soil Type" => &["Sandy", "Loamy", "Black"],
            "Crop Type" => &["Maize", "Sugarcane", "Cotton"],
            "Nitrogen" => &[Some(37.0), None, Some(7.0)],
            "Potassium" => &[0.0, 0.0, 9.0],
            "Phosphorous" => &[0.0, 36.0, 30.0],
            "Fertilizer Name" => &["Urea", "DAP", "14-35-14"]
        }
        .unwrap();

        let dataset = Dataset::from_frame(frame).unwrap();
        assert_eq!(dataset.numeric_values(NumericFeature::Temperature).unwrap(), vec![26.0, 34.0]);
        assert_eq!(dataset.numeric_values(NumericFeature::Nitrogen).unwrap(), vec![37.0, 7.0]);

        // Row 2 has a bad temperature and a missing nitrogen value
        let records = dataset.training_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fertilizer, "14-35-14");
    }

    #[test]
    fn test_all_invalid_column_rejected() {
        let frame = df! {
            "Temperature" => &["n/a", "n/a"],
            "Humidity" => &[52.0, 52.0],
            "Moisture" => &[38.0, 45.0],
            "Soil Type" => &["Sandy", "Loamy"],
            "Crop Type" => &["Maize", "Sugarcane"],
            "Nitrogen" => &[37.0, 12.0],
            "Potassium" => &[0.0, 0.0],
            "Phosphorous" => &[0.0, 36.0]
        }
        .unwrap();

        let err = Dataset::from_frame(frame).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<DataQualityError>(),
            Some(DataQualityError::NoValidValues { column }) if column == "Temperature"
        ));
    }

    /// CSV with more rows than a schema-inference window, stray entries near the end
    fn write_long_csv(name: &str) -> std::path::PathBuf {
        let mut csv = String::from("Temparature,Humidity ,Moisture,Soil Type,Crop Type,Nitrogen,Potassium,Phosphorous,Fertilizer Name\n");
        for row in 0..150 {
            let temperature = if row == 120 { "26.5".to_string() } else { (20 + row % 15).to_string() };
            let humidity = if row == 140 { "n/a".to_string() } else { (50 + row % 10).to_string() };
            csv.push_str(&format!(
                "{},{},{},Loamy,Wheat,{},0,{},{}\n",
                temperature,
                humidity,
                30 + row % 20,
                row % 40,
                row % 30,
                if row % 2 == 0 { "Urea" } else { "DAP" }
            ));
        }

        let dir = std::env::temp_dir().join(format!("fertilizer_data_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("long.csv");
        std::fs::write(&path, csv).unwrap();
        path
    }

    #[test]
    fn test_late_stray_values_only_drop_themselves() {
        let path = write_long_csv("late_values");
        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.height(), 150);

        let humidity = dataset.numeric_values(NumericFeature::Humidity).unwrap();
        assert_eq!(humidity.len(), 149);

        let temperature = dataset.numeric_values(NumericFeature::Temperature).unwrap();
        assert_eq!(temperature.len(), 150);
        assert_eq!(temperature[120], 26.5);

        // Only the "n/a" row is incomplete
        assert_eq!(dataset.training_records().unwrap().len(), 149);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_blank_category_is_missing() {
        let frame = df! {
            "Temperature" => &[26.0, 29.0],
            "Humidity" => &[52.0, 52.0],
            "Moisture" => &[38.0, 45.0],
            "Soil Type" => &["Sandy", "  "],
            "Crop Type" => &["Maize", "Wheat"],
            "Nitrogen" => &[37.0, 12.0],
            "Potassium" => &[0.0, 0.0],
            "Phosphorous" => &[0.0, 36.0],
            "Fertilizer Name" => &["Urea", "DAP"]
        }
        .unwrap();

        let dataset = Dataset::from_frame(frame).unwrap();
        assert_eq!(dataset.fit_codecs().unwrap().soil.classes(), &["Sandy"]);
        assert_eq!(dataset.training_records().unwrap().len(), 1);
    }

    #[test]
    fn test_fit_codecs_sorted() {
        let dataset = Dataset::from_frame(sample_frame()).unwrap();
        let codecs = dataset.fit_codecs().unwrap();
        assert_eq!(codecs.soil.classes(), &["Black", "Loamy", "Red", "Sandy"]);
        assert_eq!(codecs.fertilizer.encode("14-35-14").unwrap(), 0);
        assert_eq!(codecs.fertilizer.encode("Urea").unwrap(), 3);
    }

    #[test]
    fn test_training_requires_target() {
        let frame = sample_frame().drop("Fertilizer Name").unwrap();
        let dataset = Dataset::from_frame(frame).unwrap();
        assert!(dataset.training_records().is_err());
    }
}
