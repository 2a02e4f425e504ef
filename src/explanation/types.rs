use crate::explanation::buckets::Bucket;
use crate::features::Feature;
use serde::{Deserialize, Serialize};

/// Complete rationale for one recommendation
///
/// Always nine sections: the eight inputs in vector order, then the
/// conclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub sections: Vec<ExplanationSection>,
}

impl Explanation {
    pub const SECTION_COUNT: usize = 9;

    /// The recommended fertilizer named by the conclusion
    pub fn fertilizer(&self) -> Option<&str> {
        self.sections.iter().find_map(|section| match &section.detail {
            SectionDetail::Conclusion { fertilizer } => Some(fertilizer.as_str()),
            _ => None,
        })
    }
}

/// One numbered section of the rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationSection {
    /// 1-based position
    pub number: usize,
    pub title: String,       // "Temperature", "Final Conclusion"
    pub detail: SectionDetail,
    pub advisory: Option<String>,
}

/// What a section states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionDetail {
    /// Raw value placed into a quartile bucket
    Numeric {
        feature: Feature,
        value: f64,
        unit: String,       // "°C", "%", ""
        bucket: Bucket,
        quartiles: [f64; 3],
    },
    /// Decoded category name; categories have no bucket
    Categorical {
        feature: Feature,
        category: String,
    },
    Conclusion {
        fertilizer: String,
    },
}
