use serde::Deserialize;
use std::sync::Arc;

use super::{ensure_success, request_error, TokenProvider};
use crate::domain::{RemoteFile, Result};

const LIST_FIELDS: &str = "files(id, name, mimeType)";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<RemoteFile>,
}

/// Escapes a value for use inside a single-quoted Drive query string.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Non-trashed files in `folder_id` whose name contains `name`.
pub fn name_in_folder_query(name: &str, folder_id: &str) -> String {
    format!(
        "name contains '{}' and '{}' in parents and trashed = false",
        escape_query_value(name),
        escape_query_value(folder_id)
    )
}

/// Minimal Drive v3 client: list, download and replace file content.
pub struct DriveClient {
    http: reqwest::Client,
    api_base: String,
    upload_base: String,
    tokens: Arc<TokenProvider>,
}

impl DriveClient {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
        tokens: Arc<TokenProvider>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub async fn list_files(&self, query: &str) -> Result<Vec<RemoteFile>> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(format!("{}/files", self.api_base))
            .bearer_auth(token)
            .query(&[("q", query), ("spaces", "drive"), ("fields", LIST_FIELDS)])
            .send()
            .await
            .map_err(|e| request_error("files.list", e))?;

        let list: FileList = ensure_success(response, "files.list")
            .await?
            .json()
            .await
            .map_err(|e| request_error("files.list", e))?;

        Ok(list.files)
    }

    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| request_error("files.get_media", e))?;

        let bytes = ensure_success(response, "files.get_media")
            .await?
            .bytes()
            .await
            .map_err(|e| request_error("files.get_media", e))?;

        Ok(bytes.to_vec())
    }

    /// Replaces the whole body of `file_id` with `content`.
    pub async fn upload(
        &self,
        file_id: &str,
        content: Vec<u8>,
        mime_type: &str,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .patch(format!("{}/files/{}", self.upload_base, file_id))
            .bearer_auth(token)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(content)
            .send()
            .await
            .map_err(|e| request_error("files.update", e))?;

        ensure_success(response, "files.update").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::google::testing;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DriveClient {
        DriveClient::new(
            reqwest::Client::new(),
            format!("{}/drive/v3/", server.uri()),
            format!("{}/upload/drive/v3", server.uri()),
            testing::token_provider(server),
        )
    }

    #[test]
    fn test_query_shape() {
        assert_eq!(
            name_in_folder_query("chat_history", "abc"),
            "name contains 'chat_history' and 'abc' in parents and trashed = false"
        );
    }

    #[test]
    fn test_query_escapes_quotes() {
        assert_eq!(escape_query_value(r"it's"), r"it\'s");
        assert_eq!(escape_query_value(r"a\b"), r"a\\b");
    }

    #[tokio::test]
    async fn test_list_files_sends_query_and_token() {
        let server = MockServer::start().await;
        testing::mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("q", "name contains 'chat_history' and 'f1' in parents and trashed = false"))
            .and(query_param("spaces", "drive"))
            .and(query_param("fields", "files(id, name, mimeType)"))
            .and(header("authorization", "Bearer ya29.test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "files": [
                    {"id": "1", "name": "chat_history.txt", "mimeType": "text/plain"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = client(&server)
            .list_files(&name_in_folder_query("chat_history", "f1"))
            .await
            .unwrap();

        assert_eq!(files, vec![RemoteFile::new("1", "chat_history.txt", "text/plain")]);
    }

    #[tokio::test]
    async fn test_list_files_without_files_key() {
        let server = MockServer::start().await;
        testing::mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let files = client(&server).list_files("q").await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_download_error_carries_status() {
        let server = MockServer::start().await;
        testing::mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/missing"))
            .and(query_param("alt", "media"))
            .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
            .mount(&server)
            .await;

        let err = client(&server).download("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_upload_replaces_body() {
        let server = MockServer::start().await;
        testing::mount_token_endpoint(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/upload/drive/v3/files/f1"))
            .and(query_param("uploadType", "media"))
            .and(header("content-type", "text/plain"))
            .and(body_string("hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "f1"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .upload("f1", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();
    }
}
