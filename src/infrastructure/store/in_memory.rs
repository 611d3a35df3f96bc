use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::ChatLogStore, ChatRecord, DomainError, Result, TargetKind};

/// Keeps appended records in process memory. Backs the service and route
/// tests in place of Google Drive.
pub struct InMemoryChatLogStore {
    records: RwLock<Vec<ChatRecord>>,
}

impl InMemoryChatLogStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<ChatRecord> {
        self.records
            .read()
            .map(|r| r.to_vec())
            .unwrap_or_default()
    }

    /// The log as it would read in a flat file.
    pub fn content(&self) -> String {
        self.records().iter().map(ChatRecord::render).collect()
    }
}

impl Default for InMemoryChatLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatLogStore for InMemoryChatLogStore {
    async fn append_record(&self, record: &ChatRecord) -> Result<()> {
        let mut store = self
            .records
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        store.push(record.clone());
        Ok(())
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::FlatFile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatLog;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_records_append_in_order() {
        let store = InMemoryChatLogStore::new();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

        store
            .append_record(&ChatLog::new("first", "1").at(ts))
            .await
            .unwrap();
        store
            .append_record(&ChatLog::new("second", "2").at(ts))
            .await
            .unwrap();

        let content = store.content();
        let first = content.find("Question: first").unwrap();
        let second = content.find("Question: second").unwrap();
        assert!(first < second);
        assert_eq!(store.records().len(), 2);
    }
}
