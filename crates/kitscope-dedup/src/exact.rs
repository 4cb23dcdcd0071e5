//! Exact duplicate detection on coarse normalized keys, O(n) bucketing.

use std::collections::HashMap;

use kitscope_core::EquipmentRecord;
use tracing::{debug, info, warn};

use crate::normalize::{normalize_manufacturer, normalize_model_exact};
use crate::types::{DuplicateFinding, DuplicateMap, DuplicateMatch};

pub const EXACT_REASON: &str = "exact duplicate (identical normalized manufacturer + model)";
pub const EXACT_CONFIDENCE: f64 = 100.0;

/// Bucket key for exact matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactKey {
    pub equipment_type: String,
    pub manufacturer: String,
    pub model: String,
}

impl ExactKey {
    pub fn for_record(record: &EquipmentRecord) -> Self {
        Self {
            equipment_type: record.equipment_type.clone(),
            manufacturer: normalize_manufacturer(&record.manufacturer),
            model: normalize_model_exact(&record.model),
        }
    }

    /// Both text parts normalized to nothing.
    pub fn is_blank(&self) -> bool {
        self.manufacturer.is_empty() && self.model.is_empty()
    }
}

/// Report every record past the lowest id in each key bucket.
///
/// Findings are ordered by equipment type, then canonical id, then duplicate id.
pub fn find_exact_duplicates(records: &[EquipmentRecord]) -> Vec<DuplicateFinding<'_>> {
    let mut buckets: HashMap<ExactKey, Vec<&EquipmentRecord>> = HashMap::new();
    for record in records {
        buckets
            .entry(ExactKey::for_record(record))
            .or_default()
            .push(record);
    }
    debug!(
        records = records.len(),
        keys = buckets.len(),
        "built exact duplicate index"
    );

    let mut findings = Vec::new();
    let mut groups = 0usize;
    for (key, mut members) in buckets {
        if members.len() < 2 {
            continue;
        }
        groups += 1;

        if key.is_blank() {
            warn!(
                equipment_type = %key.equipment_type,
                records = members.len(),
                "records with blank manufacturer and model collide into one bucket"
            );
        }

        members.sort_by_key(|r| r.id);
        let Some((&canonical, rest)) = members.split_first() else {
            continue;
        };
        for &duplicate in rest {
            findings.push(DuplicateFinding {
                canonical,
                duplicate,
                confidence: EXACT_CONFIDENCE,
                reason: EXACT_REASON.to_string(),
            });
        }
    }

    findings.sort_by(|a, b| {
        a.canonical
            .equipment_type
            .cmp(&b.canonical.equipment_type)
            .then(a.canonical.id.cmp(&b.canonical.id))
            .then(a.duplicate.id.cmp(&b.duplicate.id))
    });

    info!(
        groups,
        duplicates = findings.len(),
        "exact duplicate scan finished"
    );
    findings
}

/// Collapse findings into a duplicate id -> canonical map.
pub fn findings_to_map(findings: &[DuplicateFinding<'_>]) -> DuplicateMap {
    findings
        .iter()
        .map(|f| {
            (
                f.duplicate.id,
                DuplicateMatch {
                    canonical_id: f.canonical.id,
                    confidence: f.confidence,
                },
            )
        })
        .collect()
}
