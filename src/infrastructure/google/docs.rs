use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{ensure_success, request_error, TokenProvider};
use crate::domain::Result;

/// The smallest valid insertion index in a document body.
const BODY_START_INDEX: i64 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub end_index: Option<i64>,
}

impl Document {
    /// Index just before the body's trailing newline, where appended text
    /// lands after all existing content.
    pub fn append_index(&self) -> i64 {
        let end = self
            .body
            .content
            .last()
            .and_then(|e| e.end_index)
            .unwrap_or(BODY_START_INDEX);
        (end - 1).max(BODY_START_INDEX)
    }
}

/// Minimal Docs v1 client: read structure and insert text.
pub struct DocsClient {
    http: reqwest::Client,
    api_base: String,
    tokens: Arc<TokenProvider>,
}

impl DocsClient {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        tokens: Arc<TokenProvider>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub async fn get_document(&self, document_id: &str) -> Result<Document> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(format!("{}/documents/{}", self.api_base, document_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| request_error("documents.get", e))?;

        ensure_success(response, "documents.get")
            .await?
            .json()
            .await
            .map_err(|e| request_error("documents.get", e))
    }

    pub async fn insert_text(
        &self,
        document_id: &str,
        index: i64,
        text: &str,
    ) -> Result<()> {
        let token = self.tokens.access_token().await?;
        let body = json!({
            "requests": [{
                "insertText": {
                    "location": { "index": index },
                    "text": text,
                }
            }]
        });

        let response = self
            .http
            .post(format!(
                "{}/documents/{}:batchUpdate",
                self.api_base, document_id
            ))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error("documents.batchUpdate", e))?;

        ensure_success(response, "documents.batchUpdate").await?;
        Ok(())
    }
}
