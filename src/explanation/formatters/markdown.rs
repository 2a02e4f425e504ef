use crate::explanation::types::{Explanation, ExplanationSection, SectionDetail};

/// Markdown formatter for explanations
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format explanation as markdown
    pub fn format(explanation: &Explanation) -> String {
        let mut md = String::with_capacity(2048);

        md.push_str("### 🔍 Why this fertilizer was recommended\n\n");

        for section in &explanation.sections {
            Self::format_section(&mut md, section);
        }

        md
    }

    fn format_section(md: &mut String, section: &ExplanationSection) {
        match &section.detail {
            SectionDetail::Numeric {
                value,
                unit,
                bucket,
                quartiles,
                ..
            } => {
                md.push_str(&format!(
                    "**{}. {} = {}{}** → {} range (quartiles: {:.1}, {:.1}, {:.1}).\n\n",
                    section.number,
                    section.title,
                    display_value(*value),
                    unit,
                    bucket,
                    quartiles[0],
                    quartiles[1],
                    quartiles[2]
                ));
                if let Some(advisory) = &section.advisory {
                    md.push_str(&format!("{}\n\n", advisory));
                }
            }
            SectionDetail::Categorical { category, .. } => {
                // Categorical notes read as a continuation of the headline
                md.push_str(&format!("**{}. {} = {}**", section.number, section.title, category));
                if let Some(advisory) = &section.advisory {
                    md.push_str(&format!(" → {}", advisory));
                }
                md.push_str("\n\n");
            }
            SectionDetail::Conclusion { fertilizer } => {
                md.push_str(&format!("### 🎯 {}\n", section.title));
                md.push_str(&format!(
                    "Based on all conditions above, the recommended fertilizer is **{}**.\n",
                    fertilizer
                ));
            }
        }
    }
}

/// Raw input as entered: whole numbers keep one decimal ("26.0")
pub(crate) fn display_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
