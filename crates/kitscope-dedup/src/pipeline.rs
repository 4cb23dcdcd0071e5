//! One batch pass: match, classify, aggregate.

use kitscope_core::{EquipmentRecord, MatchStrategy, MatchingConfig};
use serde::Serialize;
use tracing::info;

use crate::error::{DedupError, Result};
use crate::exact::{find_exact_duplicates, findings_to_map};
use crate::fuzzy::{find_duplicates, findings_from_map};
use crate::report::{
    DuplicateReviewRow, ManufacturerChange, ManufacturerUpdate, ReportSummary, SuggestedChange,
    classify_records, manufacturer_changes, manufacturer_updates,
};
use crate::types::Threshold;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSettings {
    pub strategy: MatchStrategy,
    /// Only consulted by the fuzzy strategy.
    pub threshold: Threshold,
}

impl MatchSettings {
    pub fn exact() -> Self {
        Self {
            strategy: MatchStrategy::Exact,
            threshold: Threshold::default(),
        }
    }

    pub fn fuzzy(threshold: Threshold) -> Self {
        Self {
            strategy: MatchStrategy::Fuzzy,
            threshold,
        }
    }
}

impl TryFrom<&MatchingConfig> for MatchSettings {
    type Error = DedupError;

    fn try_from(config: &MatchingConfig) -> Result<Self> {
        Ok(Self {
            strategy: config.strategy,
            threshold: Threshold::new(u32::from(config.threshold))?,
        })
    }
}

/// Everything a reviewer needs before touching the production catalog.
#[derive(Debug, Clone, Serialize)]
pub struct DedupReport {
    pub settings: MatchSettings,
    pub changes: Vec<SuggestedChange>,
    /// Side-by-side duplicate pairs, ordered by type then canonical id.
    pub review: Vec<DuplicateReviewRow>,
    pub manufacturer_changes: Vec<ManufacturerChange>,
    pub manufacturer_updates: Vec<ManufacturerUpdate>,
    pub summary: ReportSummary,
}

/// Run the configured matcher and build the review report.
///
/// Pure over its inputs; safe to call concurrently on independent catalogs.
pub fn run(records: &[EquipmentRecord], settings: MatchSettings) -> DedupReport {
    info!(
        records = records.len(),
        strategy = %settings.strategy,
        threshold = %settings.threshold,
        "starting duplicate scan"
    );

    let (duplicates, review) = match settings.strategy {
        MatchStrategy::Exact => {
            let findings = find_exact_duplicates(records);
            let review = findings.iter().map(DuplicateReviewRow::from).collect();
            (findings_to_map(&findings), review)
        }
        MatchStrategy::Fuzzy => {
            let duplicates = find_duplicates(records, settings.threshold);
            let review = findings_from_map(records, &duplicates)
                .iter()
                .map(DuplicateReviewRow::from)
                .collect();
            (duplicates, review)
        }
    };

    let changes = classify_records(records, &duplicates);
    let manufacturer_changes = manufacturer_changes(records);
    let manufacturer_updates = manufacturer_updates(records);
    let summary = ReportSummary::build(&changes, &manufacturer_changes, &manufacturer_updates);

    info!(
        deletes = summary.deletes,
        updates = summary.updates,
        keeps = summary.keeps,
        variations = summary.manufacturer_variations,
        "duplicate scan complete"
    );

    DedupReport {
        settings,
        changes,
        review,
        manufacturer_changes,
        manufacturer_updates,
        summary,
    }
}
