//! Category Codecs
//!
//! Bijective mapping between category names and integer codes for soil
//! types, crop types and fertilizer names. Codes follow sorted lexical
//! order, so refitting on the same set of names always yields the same
//! assignment regardless of row order in the source data.
//!
//! Codes are baked into the trained forest: a codec must always be loaded
//! from the same training run as the model (see `artifacts`).

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which categorical domain a codec covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryDomain {
    Soil,
    Crop,
    Fertilizer,
}

impl CategoryDomain {
    /// Stable tag used in the codec fingerprint
    fn tag(self) -> &'static str {
        match self {
            CategoryDomain::Soil => "soil",
            CategoryDomain::Crop => "crop",
            CategoryDomain::Fertilizer => "fertilizer",
        }
    }
}

impl fmt::Display for CategoryDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CategoryDomain::Soil => "soil type",
            CategoryDomain::Crop => "crop type",
            CategoryDomain::Fertilizer => "fertilizer",
        })
    }
}

/// Name ↔ code mapping for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CodecRepr")]
pub struct CategoryCodec {
    domain: CategoryDomain,
    /// Distinct names, sorted; a name's code is its index
    classes: Vec<String>,
}

/// Unchecked on-disk shape of [`CategoryCodec`]
#[derive(Deserialize)]
struct CodecRepr {
    domain: CategoryDomain,
    classes: Vec<String>,
}

impl TryFrom<CodecRepr> for CategoryCodec {
    type Error = CodecError;

    fn try_from(repr: CodecRepr) -> Result<Self, Self::Error> {
        if let Some(pair) = repr.classes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(CodecError::UnsortedClasses {
                domain: repr.domain,
                previous: pair[0].clone(),
                next: pair[1].clone(),
            });
        }
        Ok(Self {
            domain: repr.domain,
            classes: repr.classes,
        })
    }
}

impl CategoryCodec {
    /// Fit a codec on observed category names (duplicates collapse)
    pub fn fit<I, S>(domain: CategoryDomain, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = categories
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();
        Self { domain, classes }
    }

    pub fn encode(&self, name: &str) -> Result<usize, CodecError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(name))
            .map_err(|_| CodecError::UnknownCategory {
                domain: self.domain,
                name: name.to_string(),
            })
    }

    pub fn decode(&self, code: usize) -> Result<&str, CodecError> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or(CodecError::InvalidCode {
                domain: self.domain,
                code,
                n_categories: self.classes.len(),
            })
    }

    pub fn domain(&self) -> CategoryDomain {
        self.domain
    }

    /// Category names in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The soil / crop / fertilizer codec triple persisted with a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSet {
    pub soil: CategoryCodec,
    pub crop: CategoryCodec,
    pub fertilizer: CategoryCodec,
}

impl CodecSet {
    /// Deterministic hash of all three class lists.
    ///
    /// Stored in the model file and checked on load to catch a model paired
    /// with encoders from a different training run. FNV-1a over a fixed
    /// byte layout (domain tag, class count, then each class as length +
    /// UTF-8 bytes, lengths as little-endian u64), so the value is the same
    /// on every platform.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = Fnv1a::default();
        for codec in [&self.soil, &self.crop, &self.fertilizer] {
            hash.write_str(codec.domain.tag());
            hash.write_len(codec.classes.len());
            for class in &codec.classes {
                hash.write_str(class);
            }
        }
        hash.0
    }
}

/// 64-bit FNV-1a
struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Fnv1a {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }

    fn write_len(&mut self, len: usize) {
        self.write(&(len as u64).to_le_bytes());
    }

    fn write_str(&mut self, text: &str) {
        self.write_len(text.len());
        self.write(text.as_bytes());
    }
}
