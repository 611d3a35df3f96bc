use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::state::AppState;
use crate::domain::ChatLog;

pub const NOT_INITIALIZED: &str = "Storage client is not initialized.";
pub const SAVE_FAILED: &str = "Failed to save chat log to Google Drive.";
pub const LOGGED: &str = "Chat logged successfully.";

#[derive(Debug, Serialize)]
pub struct StoreChatResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Appends one question/answer exchange to the chat log.
///
/// The body must be sent as `application/json`; without that content type
/// the request is rejected with 415 rather than parsed.
pub async fn store_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatLog>, JsonRejection>,
) -> Result<Json<StoreChatResponse>, ApiError> {
    let Json(chat_log) = payload?;

    let Some(service) = &state.chat_log else {
        tracing::error!("Chat log requested but storage client is not initialized");
        return Err(ApiError::internal(NOT_INITIALIZED));
    };

    if !service.append(&chat_log.question, &chat_log.answer).await {
        return Err(ApiError::internal(SAVE_FAILED));
    }

    Ok(Json(StoreChatResponse {
        status: "success".to_string(),
        message: LOGGED.to_string(),
    }))
}
