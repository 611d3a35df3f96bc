use async_trait::async_trait;

use crate::domain::{ChatRecord, Result, TargetKind};

/// Destination that rendered chat records are appended to.
#[async_trait]
pub trait ChatLogStore: Send + Sync {
    async fn append_record(&self, record: &ChatRecord) -> Result<()>;
    fn target_kind(&self) -> TargetKind;
}
