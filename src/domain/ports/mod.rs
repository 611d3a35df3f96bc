mod chat_log_store;

pub use chat_log_store::ChatLogStore;
