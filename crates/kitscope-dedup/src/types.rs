use std::collections::BTreeMap;
use std::fmt;

use kitscope_core::{EquipmentRecord, RecordId};
use serde::Serialize;

use crate::error::{DedupError, Result};

/// A detected duplicate pair. Borrows both records from the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateFinding<'a> {
    pub canonical: &'a EquipmentRecord,
    pub duplicate: &'a EquipmentRecord,
    /// Match certainty in [0, 100].
    pub confidence: f64,
    pub reason: String,
}

/// Where a duplicate points, and how sure the matcher was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub canonical_id: RecordId,
    pub confidence: f64,
}

/// Duplicate id -> canonical match. Iterates in ascending duplicate id.
pub type DuplicateMap = BTreeMap<RecordId, DuplicateMatch>;

/// Similarity threshold for the fuzzy matcher, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Threshold(u8);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(90);

    pub fn new(value: u32) -> Result<Self> {
        if value > 100 {
            return Err(DedupError::InvalidThreshold(value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// True when `score` meets or exceeds the threshold.
    pub fn accepts(self, score: f64) -> bool {
        score >= f64::from(self.0)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
