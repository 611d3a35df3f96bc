//! Google Drive and Docs access through a service account.

pub mod auth;
pub mod docs;
pub mod drive;
mod store;

pub use auth::{ServiceAccountKey, TokenProvider, SCOPES};
pub use docs::DocsClient;
pub use drive::DriveClient;
pub use store::GoogleDriveStore;

use crate::domain::{DomainError, Result};

/// Turns a non-2xx Google API response into an error that carries the body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(DomainError::external(format!(
        "{operation} returned {status}: {body}"
    )))
}

pub(crate) fn request_error(operation: &str, err: reqwest::Error) -> DomainError {
    DomainError::external(format!("{operation} failed: {err}"))
}
