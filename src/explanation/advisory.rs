//! Advisory Notes Lookup Table
//!
//! Fixed text attached to each explanation section, keyed by feature. The
//! notes are agronomic rules of thumb about which fertilizers commonly go
//! with each input; they are not computed from the dataset or the model.
//!
//! The default table is embedded below. A replacement can be loaded from a
//! JSON object mapping feature names to text, e.g.
//! `{"Temperature": "...", "Soil Type": "...", ...}`; every feature must be
//! present.

use crate::features::Feature;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// A single advisory entry
#[derive(Debug, Clone)]
pub struct AdvisoryEntry {
    pub feature: Feature,
    pub note: &'static str,
}

// ============================================================================
// EMBEDDED DEFAULT NOTES
// ============================================================================

static DEFAULT_ADVISORIES: &[AdvisoryEntry] = &[
    AdvisoryEntry { feature: Feature::Temperature, note: "Common fertilizers in this temperature range: Urea, DAP, 28-28." },
    AdvisoryEntry { feature: Feature::Humidity, note: "Common fertilizers in this humidity range: Urea, 14-35-14." },
    AdvisoryEntry { feature: Feature::Moisture, note: "Common fertilizers in this moisture range: Urea, DAP." },
    AdvisoryEntry { feature: Feature::SoilType, note: "soil texture and retention affect fertilizer choice; commonly recommended: Urea, DAP." },
    AdvisoryEntry { feature: Feature::CropType, note: "crop nutrient needs often favor nitrogen-rich fertilizers like Urea." },
    AdvisoryEntry { feature: Feature::Nitrogen, note: "Nitrogen-rich fertilizers such as Urea match medium/high nitrogen needs." },
    AdvisoryEntry { feature: Feature::Potassium, note: "Potassium requirement low/medium → balanced blends or Urea may be suitable depending on crop." },
    AdvisoryEntry { feature: Feature::Phosphorous, note: "Phosphorous requirement low/medium → DAP or blends may be considered if P is low." },
];

/// Feature → advisory text
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryTable {
    notes: FxHashMap<Feature, String>,
}

impl Default for AdvisoryTable {
    fn default() -> Self {
        Self {
            notes: DEFAULT_ADVISORIES
                .iter()
                .map(|entry| (entry.feature, entry.note.to_string()))
                .collect(),
        }
    }
}

impl AdvisoryTable {
    /// Load a table from JSON keyed by column name
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read advisory table: {:?}", path))?;
        Self::from_json(&contents).with_context(|| format!("Invalid advisory table: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, String> =
            serde_json::from_str(json).with_context(|| "Failed to parse advisory JSON")?;

        let mut notes = FxHashMap::default();
        for (name, note) in raw {
            let feature = Feature::ALL
                .into_iter()
                .find(|f| f.column_name() == name.trim())
                .ok_or_else(|| anyhow::anyhow!("Unknown feature in advisory table: '{}'", name))?;
            notes.insert(feature, note);
        }

        let missing: Vec<&str> = Feature::ALL
            .iter()
            .filter(|f| !notes.contains_key(*f))
            .map(|f| f.column_name())
            .collect();
        if !missing.is_empty() {
            anyhow::bail!("Advisory table is missing features: {:?}", missing);
        }

        Ok(Self { notes })
    }

    /// Advisory note for a feature
    pub fn note(&self, feature: Feature) -> &str {
        // Both constructors guarantee every feature is present
        self.notes.get(&feature).map(String::as_str).unwrap_or_default()
    }
}
