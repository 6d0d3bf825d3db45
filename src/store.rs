// 🗃️ Record Store - the full record list, loaded once
// Cloning a store shares the same records; nothing mutates them after load.

use crate::record::{Record, Severity, Status};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Wire shape of the data endpoint: `{ "records": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPayload {
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[Record]>,
}

impl Default for RecordStore {
    fn default() -> Self {
        RecordStore::new(Vec::new())
    }
}

/// Counts shown in the dashboard header and summary page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub inactive: usize,
    pub with_critical: usize,
    pub with_warning: usize,
    pub clean: usize,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        RecordStore {
            records: records.into(),
        }
    }

    pub fn from_payload(payload: DataPayload) -> Self {
        Self::new(payload.records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn to_payload(&self) -> DataPayload {
        DataPayload {
            records: self.records.to_vec(),
        }
    }

    pub fn summary(&self) -> StoreSummary {
        let mut summary = StoreSummary {
            total: self.records.len(),
            ..StoreSummary::default()
        };

        for record in self.records.iter() {
            match record.status {
                Status::Active => summary.active += 1,
                Status::Pending => summary.pending += 1,
                Status::Inactive => summary.inactive += 1,
            }
            if record.has_severity(Severity::Critical) {
                summary.with_critical += 1;
            }
            if record.has_severity(Severity::Warning) {
                summary.with_warning += 1;
            }
            if !record.has_issues() {
                summary.clean += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;

    #[test]
    fn test_builtin_dataset_summary() {
        let store = dataset::builtin().unwrap();
        let summary = store.summary();

        assert_eq!(summary.total, 12);
        assert_eq!(summary.active, 5);
        assert_eq!(summary.pending, 4);
        assert_eq!(summary.inactive, 3);
        assert_eq!(summary.with_critical, 5);
        assert_eq!(summary.with_warning, 6);
        assert_eq!(summary.clean, 5);
    }

    #[test]
    fn test_get_by_id() {
        let store = dataset::builtin().unwrap();

        assert_eq!(store.get("8").map(|r| r.name.as_str()), Some("Olga Petrova"));
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_clone_shares_records() {
        let store = dataset::builtin().unwrap();
        let copy = store.clone();

        assert!(std::ptr::eq(store.records(), copy.records()));
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::default();
        assert!(store.is_empty());
        assert_eq!(store.summary(), StoreSummary::default());
    }
}
