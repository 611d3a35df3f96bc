use std::sync::Arc;
use tracing::instrument;

use crate::domain::{ports::ChatLogStore, ChatLog, ChatRecord, Result, TargetKind};

pub struct ChatLogService {
    store: Arc<dyn ChatLogStore>,
}

impl ChatLogService {
    pub fn new(store: Arc<dyn ChatLogStore>) -> Self {
        Self { store }
    }

    pub fn target_kind(&self) -> TargetKind {
        self.store.target_kind()
    }

    /// Stamps and appends one exchange. Any storage failure is logged and
    /// reported as `false`; nothing is retried.
    #[instrument(skip_all, fields(target_kind = %self.store.target_kind()))]
    pub async fn append(&self, question: &str, answer: &str) -> bool {
        let record = ChatLog::new(question, answer).now();
        match self.append_record(&record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to append chat log");
                false
            }
        }
    }

    pub async fn append_record(&self, record: &ChatRecord) -> Result<()> {
        self.store.append_record(record).await?;
        tracing::info!(timestamp = %record.timestamp, "Chat log appended");
        Ok(())
    }
}
