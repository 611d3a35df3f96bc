use std::sync::Arc;

use crate::application::ChatLogService;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// `None` when the storage client could not be set up at startup.
    pub chat_log: Option<Arc<ChatLogService>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            chat_log: None,
            config: Arc::new(config),
        }
    }

    pub fn with_chat_log_service(mut self, service: Arc<ChatLogService>) -> Self {
        self.chat_log = Some(service);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.chat_log.is_some()
    }
}
