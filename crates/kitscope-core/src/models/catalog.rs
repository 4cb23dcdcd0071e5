use std::collections::HashSet;

use tracing::debug;

use super::record::{EquipmentRecord, RawRecord, RecordId};
use crate::error::{KitscopeError, Result};

/// A validated batch snapshot of equipment records, in input order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EquipmentRecord>,
}

impl Catalog {
    /// Build a catalog from typed records, rejecting repeated ids.
    pub fn new(records: Vec<EquipmentRecord>) -> Result<Self> {
        let mut seen: HashSet<RecordId> = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(KitscopeError::DuplicateRecordId(record.id));
            }
        }
        Ok(Self { records })
    }

    /// Validate raw rows. Fails on the first row whose id cannot be parsed.
    pub fn from_raw(rows: impl IntoIterator<Item = RawRecord>) -> Result<Self> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| raw.into_record(idx + 1))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = records.len(), "validated raw records");
        Self::new(records)
    }

    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
