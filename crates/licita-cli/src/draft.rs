//! Draft records kept as JSON files between commands.

use crate::error::{CliError, Result};
use licita_ledger::ProcurementRecord;
use std::fs;
use std::path::Path;

/// Load a draft that must exist
pub fn load_draft(path: &Path) -> Result<ProcurementRecord> {
    if !path.exists() {
        return Err(CliError::InvalidInput(format!(
            "draft {} does not exist; create it with `licita import`",
            path.display()
        )));
    }
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load a draft, or start an empty one if the file does not exist
pub fn load_or_new(path: &Path) -> Result<ProcurementRecord> {
    if path.exists() {
        load_draft(path)
    } else {
        Ok(ProcurementRecord::new())
    }
}

/// Write a draft, creating parent directories
pub fn save_draft(path: &Path, record: &ProcurementRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(record)?)?;
    Ok(())
}

/// The draft path given to a command
pub fn require_draft(draft: Option<&Path>) -> Result<&Path> {
    draft.ok_or_else(|| CliError::InvalidInput("--draft is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_domain::SequentialIdGenerator;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_keeps_shares() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drafts").join("d.json");
        let ids = SequentialIdGenerator::new();

        let record = ProcurementRecord::new()
            .with_manual_item(&ids)
            .with_share_added("Educação", 40.0, &ids)
            .unwrap();
        save_draft(&path, &record).unwrap();

        let loaded = load_draft(&path).unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.reserved_percentage(), 60.0);
    }

    #[test]
    fn test_draft_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        let ids = SequentialIdGenerator::new();

        save_draft(&path, &ProcurementRecord::new().with_manual_item(&ids)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"distributions\""));
        assert!(text.contains("\"totalValue\""));
        assert!(text.contains("\"processNumber\""));
    }

    #[test]
    fn test_missing_draft() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(load_draft(&path), Err(CliError::InvalidInput(_))));
        assert_eq!(load_or_new(&path).unwrap(), ProcurementRecord::new());
    }

    #[test]
    fn test_corrupt_draft_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.json");
        fs::write(
            &path,
            r#"{"distributions": [
                {"id": "00000000-0000-0000-0000-000000000001", "consumer": "A", "percentage": 70, "allocatedValue": 0},
                {"id": "00000000-0000-0000-0000-000000000002", "consumer": "B", "percentage": 40, "allocatedValue": 0}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(load_draft(&path), Err(CliError::Serialization(_))));
    }

    #[test]
    fn test_require_draft() {
        assert!(require_draft(None).is_err());
        assert_eq!(require_draft(Some(Path::new("d.json"))).unwrap(), Path::new("d.json"));
    }
}
