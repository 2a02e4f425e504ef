pub mod types;
pub mod buckets;
pub mod advisory;
pub mod generator;
pub mod formatters;

pub use types::{Explanation, ExplanationSection, SectionDetail};
pub use buckets::Bucket;
pub use advisory::AdvisoryTable;
pub use generator::ExplanationGenerator;
pub use formatters::{JsonFormatter, MarkdownFormatter};
