use serde::{Deserialize, Serialize};

use crate::error::{KitscopeError, Result};

/// Numeric record id. Lower ids take precedence when choosing a canonical record.
pub type RecordId = u64;

/// One equipment row as it arrives from tabular input, before validation.
///
/// Every column except `id` may be missing or blank; blanks become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl RawRecord {
    pub fn new(id: &str, equipment_type: &str, manufacturer: &str, model: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            uuid: None,
            equipment_type: Some(equipment_type.to_string()),
            manufacturer: Some(manufacturer.to_string()),
            model: Some(model.to_string()),
        }
    }

    /// Validate the row. `row` is the 1-based data row number used in errors.
    pub fn into_record(self, row: usize) -> Result<EquipmentRecord> {
        let raw_id = self.id.unwrap_or_default();
        let id = parse_record_id(&raw_id).ok_or(KitscopeError::InvalidRecordId {
            row,
            value: raw_id.clone(),
        })?;

        Ok(EquipmentRecord {
            id,
            uuid: self.uuid.unwrap_or_default(),
            equipment_type: self.equipment_type.unwrap_or_default(),
            manufacturer: self.manufacturer.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
        })
    }
}

fn parse_record_id(raw: &str) -> Option<RecordId> {
    match raw.trim().parse::<RecordId>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(id),
    }
}

/// A validated, immutable equipment record.
///
/// The matchers only ever borrow records; they never rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: RecordId,
    /// Opaque external identifier. Carried through to reports, never compared.
    pub uuid: String,
    pub equipment_type: String,
    pub manufacturer: String,
    pub model: String,
}

impl EquipmentRecord {
    pub fn new(
        id: RecordId,
        equipment_type: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id,
            uuid: String::new(),
            equipment_type: equipment_type.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }
}
