pub mod catalog;
pub mod record;

pub use catalog::Catalog;
pub use record::{EquipmentRecord, RawRecord, RecordId};
