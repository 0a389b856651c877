//! Record persistence seam

use crate::ProcurementRecord;
use licita_domain::RecordId;
use std::collections::HashMap;
use std::convert::Infallible;

/// Storage for saved procurement records
///
/// Only [`crate::RecordValidator::commit`] writes through this trait; import
/// and ledger operations never touch storage.
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Persist a record that already carries its id, replacing any previous version
    fn save(&mut self, record: &ProcurementRecord) -> Result<RecordId, Self::Error>;

    /// Load a record by id
    fn load(&self, id: RecordId) -> Result<Option<ProcurementRecord>, Self::Error>;
}

/// Store keeping records in a map; used by tests and dry runs
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: HashMap<RecordId, ProcurementRecord>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been saved
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for InMemoryRecordStore {
    type Error = Infallible;

    fn save(&mut self, record: &ProcurementRecord) -> Result<RecordId, Self::Error> {
        // commit() assigns ids before saving; a bare record gets the nil id
        let id = record.id().unwrap_or(RecordId::from_value(0));
        self.records.insert(id, record.clone());
        Ok(id)
    }

    fn load(&self, id: RecordId) -> Result<Option<ProcurementRecord>, Self::Error> {
        Ok(self.records.get(&id).cloned())
    }
}
