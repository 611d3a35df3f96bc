pub mod config;
pub mod google;
pub mod store;

pub use config::{AppConfig, CorsConfig, DriveConfig, ServerConfig};
pub use google::GoogleDriveStore;
pub use store::InMemoryChatLogStore;
