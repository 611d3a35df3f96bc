use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{DomainError, Result};

pub const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";
pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// File metadata as listed by Drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

impl RemoteFile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn kind(&self) -> TargetKind {
        TargetKind::from_mime(&self.mime_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Document,
    FlatFile,
    Unknown,
}

impl TargetKind {
    pub fn from_mime(mime_type: &str) -> Self {
        match mime_type {
            GOOGLE_DOC_MIME => Self::Document,
            PLAIN_TEXT_MIME => Self::FlatFile,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::FlatFile => "flat_file",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource chat records are appended to, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    Document(RemoteFile),
    FlatFile(RemoteFile),
    /// Neither a Google Doc nor plain text; appended to as a flat file.
    Unknown(RemoteFile),
}

impl ChatTarget {
    pub fn file(&self) -> &RemoteFile {
        match self {
            Self::Document(file) | Self::FlatFile(file) | Self::Unknown(file) => file,
        }
    }

    pub fn id(&self) -> &str {
        &self.file().id
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Document(_) => TargetKind::Document,
            Self::FlatFile(_) => TargetKind::FlatFile,
            Self::Unknown(_) => TargetKind::Unknown,
        }
    }
}

/// Picks the append target from discovery candidates.
///
/// Priority is by type, not listing order: the first Google Doc, else the
/// first plain-text file, else the first candidate as `Unknown`.
pub fn select_target(mut candidates: Vec<RemoteFile>) -> Result<ChatTarget> {
    for kind in [TargetKind::Document, TargetKind::FlatFile] {
        if let Some(pos) = candidates.iter().position(|f| f.kind() == kind) {
            let file = candidates.swap_remove(pos);
            return Ok(match kind {
                TargetKind::Document => ChatTarget::Document(file),
                _ => ChatTarget::FlatFile(file),
            });
        }
    }

    candidates
        .into_iter()
        .next()
        .map(ChatTarget::Unknown)
        .ok_or_else(|| DomainError::not_found("no file matching the configured name in folder"))
}
