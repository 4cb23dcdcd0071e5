//! Greedy pairwise fuzzy matching within equipment-type partitions.
//!
//! Single pass, lowest id first. A record claimed as a duplicate is never
//! compared again, neither as a canonical nor as a candidate, so results
//! depend on id order and are not a connected-components clustering.

use std::collections::{BTreeMap, HashMap};

use kitscope_core::{EquipmentRecord, RecordId};
use tracing::{debug, info, warn};

use crate::normalize::{normalize_manufacturer, normalize_model_fuzzy};
use crate::similarity::token_sort_ratio;
use crate::types::{DuplicateFinding, DuplicateMap, DuplicateMatch, Threshold};

const BLANK_KEY: &str = "|";

/// `MANUFACTURER|MODEL` key fed to the similarity measure.
pub fn comparison_key(record: &EquipmentRecord) -> String {
    format!(
        "{}|{}",
        normalize_manufacturer(&record.manufacturer),
        normalize_model_fuzzy(&record.model)
    )
}

/// Map each duplicate id to its canonical id and similarity score.
pub fn find_duplicates(records: &[EquipmentRecord], threshold: Threshold) -> DuplicateMap {
    let mut partitions: BTreeMap<&str, Vec<&EquipmentRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry(record.equipment_type.as_str())
            .or_default()
            .push(record);
    }

    let mut duplicates = DuplicateMap::new();
    for (equipment_type, mut members) in partitions {
        members.sort_by_key(|r| r.id);
        let found = match_partition(equipment_type, &members, threshold, &mut duplicates);
        debug!(
            equipment_type,
            records = members.len(),
            duplicates = found,
            "fuzzy partition scanned"
        );
    }

    info!(
        records = records.len(),
        duplicates = duplicates.len(),
        %threshold,
        "fuzzy duplicate scan finished"
    );
    duplicates
}

fn match_partition(
    equipment_type: &str,
    members: &[&EquipmentRecord],
    threshold: Threshold,
    out: &mut DuplicateMap,
) -> usize {
    let keys: Vec<String> = members.iter().map(|r| comparison_key(r)).collect();

    let blank = keys.iter().filter(|k| k.as_str() == BLANK_KEY).count();
    if blank > 1 {
        warn!(
            equipment_type,
            records = blank,
            "records with blank manufacturer and model will match each other"
        );
    }

    let mut claimed = vec![false; members.len()];
    let mut found = 0usize;

    for i in 0..members.len() {
        if claimed[i] {
            continue;
        }
        for j in (i + 1)..members.len() {
            if claimed[j] {
                continue;
            }
            let score = token_sort_ratio(&keys[i], &keys[j]);
            if threshold.accepts(score) {
                claimed[j] = true;
                out.insert(
                    members[j].id,
                    DuplicateMatch {
                        canonical_id: members[i].id,
                        confidence: score,
                    },
                );
                found += 1;
            }
        }
    }

    found
}

/// Resolve a duplicate map back into borrowed findings for review output,
/// ordered like the exact matcher's findings.
pub fn findings_from_map<'a>(
    records: &'a [EquipmentRecord],
    duplicates: &DuplicateMap,
) -> Vec<DuplicateFinding<'a>> {
    let by_id: HashMap<RecordId, &EquipmentRecord> = records.iter().map(|r| (r.id, r)).collect();

    let mut findings: Vec<DuplicateFinding<'a>> = duplicates
        .iter()
        .filter_map(|(duplicate_id, m)| {
            let duplicate = *by_id.get(duplicate_id)?;
            let canonical = *by_id.get(&m.canonical_id)?;
            Some(DuplicateFinding {
                canonical,
                duplicate,
                confidence: m.confidence,
                reason: format!("fuzzy match ({:.1}% token-sort similarity)", m.confidence),
            })
        })
        .collect();

    findings.sort_by(|a, b| {
        a.canonical
            .equipment_type
            .cmp(&b.canonical.equipment_type)
            .then(a.canonical.id.cmp(&b.canonical.id))
            .then(a.duplicate.id.cmp(&b.duplicate.id))
    });
    findings
}
