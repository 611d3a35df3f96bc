use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::{drive, DocsClient, DriveClient, ServiceAccountKey, TokenProvider};
use crate::domain::{
    ports::ChatLogStore, select_target, ChatRecord, ChatTarget, DomainError, RemoteFile,
    Result, TargetKind,
};
use crate::infrastructure::config::DriveConfig;

const FLAT_FILE_MIME: &str = "text/plain";

/// Chat log store backed by a single file discovered in a Drive folder.
///
/// The target is resolved once in [`GoogleDriveStore::connect`] and never
/// re-discovered; renaming or deleting it remotely makes every later append
/// fail. Appends are not serialized: concurrent writers can lose updates on
/// flat files and race on the insertion index in Google Docs.
pub struct GoogleDriveStore {
    drive: DriveClient,
    docs: DocsClient,
    target: ChatTarget,
}

impl GoogleDriveStore {
    /// Authenticates and discovers the target file.
    pub async fn connect(config: &DriveConfig) -> Result<Self> {
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| DomainError::internal(format!("http client: {e}")))?;

        let tokens = Arc::new(TokenProvider::new(key, http.clone())?);
        tracing::info!(client_email = %tokens.client_email(), "Service account loaded");

        let drive = DriveClient::new(
            http.clone(),
            &config.drive_api_base,
            &config.upload_api_base,
            tokens.clone(),
        );
        let docs = DocsClient::new(http, &config.docs_api_base, tokens);

        let query = drive::name_in_folder_query(&config.file_name, &config.folder_id);
        let candidates = drive.list_files(&query).await?;
        let target = select_target(candidates).map_err(|_| {
            DomainError::not_found(format!(
                "No file matching '{}' found in folder '{}'. Please create one manually.",
                config.file_name, config.folder_id
            ))
        })?;

        let file = target.file();
        match target.kind() {
            TargetKind::Unknown => tracing::warn!(
                file_id = %file.id,
                name = %file.name,
                mime_type = %file.mime_type,
                "Using file of unrecognized type; appends will treat it as plain text"
            ),
            kind => tracing::info!(file_id = %file.id, name = %file.name, kind = %kind, "Found chat log target"),
        }

        Ok(Self::with_target(drive, docs, target))
    }

    pub fn with_target(drive: DriveClient, docs: DocsClient, target: ChatTarget) -> Self {
        Self {
            drive,
            docs,
            target,
        }
    }

    pub fn target(&self) -> &ChatTarget {
        &self.target
    }

    async fn append_to_document(&self, file: &RemoteFile, text: &str) -> Result<()> {
        let document = self.docs.get_document(&file.id).await?;
        let index = document.append_index();
        self.docs.insert_text(&file.id, index, text).await?;

        tracing::info!(file_id = %file.id, index, "Appended chat log to Google Doc");
        Ok(())
    }

    async fn append_to_flat_file(&self, file: &RemoteFile, text: &str) -> Result<()> {
        let bytes = self.drive.download(&file.id).await?;
        let mut content = String::from_utf8(bytes).map_err(|e| {
            DomainError::validation(format!(
                "file {} ({}) is not UTF-8 text: {e}",
                file.id, file.mime_type
            ))
        })?;
        content.push_str(text);

        self.drive
            .upload(&file.id, content.into_bytes(), FLAT_FILE_MIME)
            .await?;

        tracing::info!(file_id = %file.id, "Appended chat log to text file");
        Ok(())
    }
}

#[async_trait]
impl ChatLogStore for GoogleDriveStore {
    #[instrument(skip_all, fields(file_id = %self.target.id()))]
    async fn append_record(&self, record: &ChatRecord) -> Result<()> {
        let text = record.render();
        match &self.target {
            ChatTarget::Document(file) => self.append_to_document(file, &text).await,
            ChatTarget::FlatFile(file) | ChatTarget::Unknown(file) => {
                self.append_to_flat_file(file, &text).await
            }
        }
    }

    fn target_kind(&self) -> TargetKind {
        self.target.kind()
    }
}
