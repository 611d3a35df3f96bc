use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub drive: DriveConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Where the chat log lives and how to reach the Google APIs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub credentials_path: PathBuf,
    pub folder_id: String,
    pub file_name: String,
    pub drive_api_base: String,
    pub upload_api_base: String,
    pub docs_api_base: String,
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credentials.json"),
            folder_id: "YOUR_FOLDER_ID_HERE".to_string(),
            file_name: "chat_history".to_string(),
            drive_api_base: "https://www.googleapis.com/drive/v3".to_string(),
            upload_api_base: "https://www.googleapis.com/upload/drive/v3".to_string(),
            docs_api_base: "https://docs.googleapis.com/v1".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Reads `path` when it exists, otherwise returns the built-in defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::internal(format!("read {}: {e}", path.display())))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| DomainError::validation(format!("config: {e}")))
    }

    /// `SERVER_HOST` / `SERVER_PORT` take precedence over the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            self.server.port = port;
        }
        self
    }
}
