//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than on the Google
//! clients, so the HTTP layer can run against any `ChatLogStore`.

pub mod services;

pub use services::ChatLogService;
