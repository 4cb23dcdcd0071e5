//! Review artifacts: per-record actions, manufacturer rewrites, summaries.
//!
//! Nothing here touches the source records. Every output only recommends.

use std::collections::HashMap;
use std::fmt;

use kitscope_core::{EquipmentRecord, RecordId};
use serde::Serialize;

use crate::normalize::{manufacturer_needs_update, normalize_manufacturer};
use crate::types::{DuplicateFinding, DuplicateMap};

pub const UPDATE_REASON: &str = "manufacturer name normalization";
pub const KEEP_REASON: &str = "no changes needed";

/// How many equipment types the summary breaks duplicates down by.
const SUMMARY_TYPE_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Delete,
    Update,
    Keep,
}

impl Action {
    /// Sort rank: deletes first, keeps last.
    pub fn priority(self) -> u8 {
        match self {
            Self::Delete => 0,
            Self::Update => 1,
            Self::Keep => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::Keep => "KEEP",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record a DELETE points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRef {
    pub id: RecordId,
    pub uuid: String,
    pub manufacturer: String,
    pub model: String,
}

impl From<&EquipmentRecord> for CanonicalRef {
    fn from(record: &EquipmentRecord) -> Self {
        Self {
            id: record.id,
            uuid: record.uuid.clone(),
            manufacturer: record.manufacturer.clone(),
            model: record.model.clone(),
        }
    }
}

/// One proposed action for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedChange {
    pub action: Action,
    pub confidence: f64,
    pub id: RecordId,
    pub uuid: String,
    pub equipment_type: String,
    pub current_manufacturer: String,
    pub current_model: String,
    pub new_manufacturer: Option<String>,
    pub new_model: Option<String>,
    pub duplicate_of: Option<CanonicalRef>,
    pub reason: String,
}

/// Classify every record as DELETE, UPDATE or KEEP.
///
/// DELETE wins over UPDATE. The result is stably sorted by action priority,
/// then by ascending confidence so the riskiest deletes surface first.
pub fn classify_records(
    records: &[EquipmentRecord],
    duplicates: &DuplicateMap,
) -> Vec<SuggestedChange> {
    let by_id: HashMap<RecordId, &EquipmentRecord> = records.iter().map(|r| (r.id, r)).collect();

    let mut changes: Vec<SuggestedChange> = records
        .iter()
        .map(|record| {
            let base = |action, confidence, reason: String| SuggestedChange {
                action,
                confidence,
                id: record.id,
                uuid: record.uuid.clone(),
                equipment_type: record.equipment_type.clone(),
                current_manufacturer: record.manufacturer.clone(),
                current_model: record.model.clone(),
                new_manufacturer: None,
                new_model: None,
                duplicate_of: None,
                reason,
            };

            if let Some(m) = duplicates.get(&record.id) {
                let mut change = base(
                    Action::Delete,
                    m.confidence,
                    format!(
                        "duplicate of ID {} ({:.1}% match)",
                        m.canonical_id, m.confidence
                    ),
                );
                change.duplicate_of = by_id.get(&m.canonical_id).map(|c| CanonicalRef::from(*c));
                change
            } else if manufacturer_needs_update(&record.manufacturer) {
                let mut change = base(Action::Update, 100.0, UPDATE_REASON.to_string());
                change.new_manufacturer = Some(normalize_manufacturer(&record.manufacturer));
                change.new_model = Some(record.model.clone());
                change
            } else {
                base(Action::Keep, 100.0, KEEP_REASON.to_string())
            }
        })
        .collect();

    changes.sort_by(|a, b| {
        a.action
            .priority()
            .cmp(&b.action.priority())
            .then(a.confidence.total_cmp(&b.confidence))
    });
    changes
}

/// One distinct raw -> canonical manufacturer rewrite and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerChange {
    pub original_value: String,
    pub normalized_value: String,
    pub record_count: usize,
}

/// Aggregate manufacturer rewrites by distinct raw value.
///
/// Sorted by count descending; equal counts keep first-seen order.
pub fn manufacturer_changes(records: &[EquipmentRecord]) -> Vec<ManufacturerChange> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut changes: Vec<ManufacturerChange> = Vec::new();

    for record in records {
        if !manufacturer_needs_update(&record.manufacturer) {
            continue;
        }
        match positions.get(record.manufacturer.as_str()) {
            Some(&pos) => changes[pos].record_count += 1,
            None => {
                positions.insert(record.manufacturer.as_str(), changes.len());
                changes.push(ManufacturerChange {
                    original_value: record.manufacturer.clone(),
                    normalized_value: normalize_manufacturer(&record.manufacturer),
                    record_count: 1,
                });
            }
        }
    }

    changes.sort_by(|a, b| b.record_count.cmp(&a.record_count));
    changes
}

/// Per-record manufacturer rewrite, independent of duplicate status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManufacturerUpdate {
    pub id: RecordId,
    pub uuid: String,
    pub equipment_type: String,
    pub current_manufacturer: String,
    pub new_manufacturer: String,
    pub model: String,
}

pub fn manufacturer_updates(records: &[EquipmentRecord]) -> Vec<ManufacturerUpdate> {
    records
        .iter()
        .filter(|r| manufacturer_needs_update(&r.manufacturer))
        .map(|r| ManufacturerUpdate {
            id: r.id,
            uuid: r.uuid.clone(),
            equipment_type: r.equipment_type.clone(),
            current_manufacturer: r.manufacturer.clone(),
            new_manufacturer: normalize_manufacturer(&r.manufacturer),
            model: r.model.clone(),
        })
        .collect()
}

// ─── Flat rows ─────────────────────────────────────────────

/// CSV shape of a [`SuggestedChange`]. Confidence has one decimal place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedChangeRow {
    pub action: Action,
    pub confidence: String,
    pub id: RecordId,
    pub uuid: String,
    pub equipment_type: String,
    pub current_manufacturer: String,
    pub current_model: String,
    pub new_manufacturer: String,
    pub new_model: String,
    pub duplicate_of_id: Option<RecordId>,
    pub canonical_uuid: String,
    pub canonical_manufacturer: String,
    pub canonical_model: String,
    pub reason: String,
}

impl From<&SuggestedChange> for SuggestedChangeRow {
    fn from(change: &SuggestedChange) -> Self {
        let canonical = change.duplicate_of.as_ref();
        Self {
            action: change.action,
            confidence: format_confidence(change.confidence),
            id: change.id,
            uuid: change.uuid.clone(),
            equipment_type: change.equipment_type.clone(),
            current_manufacturer: change.current_manufacturer.clone(),
            current_model: change.current_model.clone(),
            new_manufacturer: change.new_manufacturer.clone().unwrap_or_default(),
            new_model: change.new_model.clone().unwrap_or_default(),
            duplicate_of_id: canonical.map(|c| c.id),
            canonical_uuid: canonical.map(|c| c.uuid.clone()).unwrap_or_default(),
            canonical_manufacturer: canonical
                .map(|c| c.manufacturer.clone())
                .unwrap_or_default(),
            canonical_model: canonical.map(|c| c.model.clone()).unwrap_or_default(),
            reason: change.reason.clone(),
        }
    }
}

/// One duplicate pair laid out side by side for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReviewRow {
    pub action: Action,
    pub confidence: String,
    pub reason: String,
    pub duplicate_id: RecordId,
    pub duplicate_uuid: String,
    pub duplicate_manufacturer: String,
    pub duplicate_model: String,
    pub canonical_id: RecordId,
    pub canonical_uuid: String,
    pub canonical_manufacturer: String,
    pub canonical_model: String,
    pub equipment_type: String,
}

impl From<&DuplicateFinding<'_>> for DuplicateReviewRow {
    fn from(finding: &DuplicateFinding<'_>) -> Self {
        let (dup, canon) = (finding.duplicate, finding.canonical);
        Self {
            action: Action::Delete,
            confidence: format_confidence(finding.confidence),
            reason: finding.reason.clone(),
            duplicate_id: dup.id,
            duplicate_uuid: dup.uuid.clone(),
            duplicate_manufacturer: dup.manufacturer.clone(),
            duplicate_model: dup.model.clone(),
            canonical_id: canon.id,
            canonical_uuid: canon.uuid.clone(),
            canonical_manufacturer: canon.manufacturer.clone(),
            canonical_model: canon.model.clone(),
            equipment_type: canon.equipment_type.clone(),
        }
    }
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.1}")
}

// ─── Summary ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub equipment_type: String,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total_records: usize,
    pub deletes: usize,
    pub updates: usize,
    pub keeps: usize,
    pub unique_after_dedup: usize,
    pub manufacturer_variations: usize,
    pub records_needing_update: usize,
    /// Largest first, at most fifteen entries.
    pub duplicates_by_type: Vec<TypeCount>,
}

impl ReportSummary {
    pub fn build(
        changes: &[SuggestedChange],
        mfr_changes: &[ManufacturerChange],
        mfr_updates: &[ManufacturerUpdate],
    ) -> Self {
        let mut summary = Self {
            total_records: changes.len(),
            manufacturer_variations: mfr_changes.len(),
            records_needing_update: mfr_updates.len(),
            ..Self::default()
        };

        let mut by_type: HashMap<&str, usize> = HashMap::new();
        for change in changes {
            match change.action {
                Action::Delete => {
                    summary.deletes += 1;
                    *by_type.entry(change.equipment_type.as_str()).or_default() += 1;
                }
                Action::Update => summary.updates += 1,
                Action::Keep => summary.keeps += 1,
            }
        }
        summary.unique_after_dedup = summary.total_records - summary.deletes;

        let mut counts: Vec<TypeCount> = by_type
            .into_iter()
            .map(|(equipment_type, duplicates)| TypeCount {
                equipment_type: equipment_type.to_string(),
                duplicates,
            })
            .collect();
        counts.sort_by(|a, b| {
            b.duplicates
                .cmp(&a.duplicates)
                .then_with(|| a.equipment_type.cmp(&b.equipment_type))
        });
        counts.truncate(SUMMARY_TYPE_LIMIT);
        summary.duplicates_by_type = counts;

        summary
    }

    /// Share of records flagged for deletion, in percent.
    pub fn duplicate_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        self.deletes as f64 * 100.0 / self.total_records as f64
    }
}
