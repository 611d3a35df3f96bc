mod chat_log;
mod target;

pub use chat_log::{ChatLog, ChatRecord, RECORD_SEPARATOR, TIMESTAMP_FORMAT};
pub use target::{select_target, ChatTarget, RemoteFile, TargetKind};
