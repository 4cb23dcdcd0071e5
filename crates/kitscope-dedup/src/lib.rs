//! kitscope-dedup: manufacturer/model normalization and duplicate detection
//! for equipment catalogs.
//!
//! Pure batch computation: records in, review artifacts out.

pub mod error;
pub mod exact;
pub mod fuzzy;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod similarity;
pub mod types;

pub use error::{DedupError, Result};
pub use exact::{ExactKey, find_exact_duplicates, findings_to_map};
pub use fuzzy::{comparison_key, find_duplicates, findings_from_map};
pub use normalize::{
    canonical_manufacturers, manufacturer_needs_update, normalize_manufacturer, normalize_model_exact,
    normalize_model_fuzzy,
};
pub use pipeline::{DedupReport, MatchSettings, run};
pub use report::{
    Action, DuplicateReviewRow, ManufacturerChange, ManufacturerUpdate, ReportSummary,
    SuggestedChange, SuggestedChangeRow,
};
pub use types::{DuplicateFinding, DuplicateMap, DuplicateMatch, Threshold};
