//! Appends question/answer exchanges to a chat log kept in Google Drive.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
