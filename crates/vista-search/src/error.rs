//! Search error types
//!
//! None of these reach the user: the session logs them and degrades to
//! "no suggestions" or a fallback navigation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Malformed suggestion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Navigation unavailable: {0}")]
    Navigation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] vista_storage::StorageError),
}
