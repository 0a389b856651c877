//! Record store writing one JSON file per record.

use crate::error::{CliError, Result};
use licita_domain::RecordId;
use licita_ledger::{ProcurementRecord, RecordStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores each record as `<dir>/<id>.json`
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Store rooted at `dir` (created on first save)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the record with this id
    pub fn record_path(&self, id: RecordId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl RecordStore for JsonDirStore {
    type Error = CliError;

    fn save(&mut self, record: &ProcurementRecord) -> Result<RecordId> {
        let id = record
            .id()
            .ok_or_else(|| CliError::InvalidInput("record has no id; save it through the validator".to_string()))?;

        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(id);
        let tmp = path.with_extension("json.tmp");

        // Replace in one rename so readers never see a partial file
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), "Record written");
        Ok(id)
    }

    fn load(&self, id: RecordId) -> Result<Option<ProcurementRecord>> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_domain::{ItemId, LineItem, RecordHeader, SequentialIdGenerator, SupplierId};
    use licita_ledger::{LedgerError, RecordValidator};
    use tempfile::TempDir;

    fn draft(ids: &SequentialIdGenerator) -> ProcurementRecord {
        ProcurementRecord::new()
            .with_header(RecordHeader {
                process_number: "068/2023".to_string(),
                ..RecordHeader::default()
            })
            .with_supplier(Some(SupplierId::new("s-1")))
            .with_item_added(LineItem::new(ItemId::generate(ids), 4.0, 250.0))
            .with_share_added("Saúde", 25.0, ids)
            .unwrap()
    }

    #[test]
    fn test_commit_writes_and_loads() {
        let dir = TempDir::new().unwrap();
        let ids = SequentialIdGenerator::new();
        let mut store = JsonDirStore::new(dir.path().join("records"));

        let saved = RecordValidator::default_config()
            .commit(&draft(&ids), &mut store, &ids)
            .unwrap();
        let id = saved.id().unwrap();

        assert!(store.record_path(id).exists());
        let loaded = store.load(id).unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.total_value(), 1000.0);
        assert_eq!(loaded.shares()[0].allocated_value(), 250.0);
    }

    #[test]
    fn test_resave_replaces_file() {
        let dir = TempDir::new().unwrap();
        let ids = SequentialIdGenerator::new();
        let mut store = JsonDirStore::new(dir.path());
        let validator = RecordValidator::default_config();

        let first = validator.commit(&draft(&ids), &mut store, &ids).unwrap();
        let edited = first.with_header(RecordHeader {
            process_number: "069/2023".to_string(),
            ..first.header().clone()
        });
        let second = validator.commit(&edited, &mut store, &ids).unwrap();

        assert_eq!(first.id(), second.id());
        let files = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1);
        let loaded = store.load(second.id().unwrap()).unwrap().unwrap();
        assert_eq!(loaded.header().process_number, "069/2023");
    }

    #[test]
    fn test_rejected_record_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let ids = SequentialIdGenerator::new();
        let mut store = JsonDirStore::new(dir.path().join("records"));

        let result = RecordValidator::default_config().commit(&ProcurementRecord::new(), &mut store, &ids);
        assert!(matches!(result, Err(LedgerError::ValidationFailure(_))));
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_load_missing_record() {
        let dir = TempDir::new().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(store.load(RecordId::from_value(42)).unwrap().is_none());
    }

    #[test]
    fn test_bare_record_is_refused() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonDirStore::new(dir.path());
        assert!(matches!(
            store.save(&ProcurementRecord::new()),
            Err(CliError::InvalidInput(_))
        ));
    }
}
