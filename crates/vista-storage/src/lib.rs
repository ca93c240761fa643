//! Vista Storage Layer
//!
//! SQLite-backed key-value settings for the new tab page. The search
//! subsystem only ever sees the `SettingsStore` trait.

mod database;
mod error;
mod migrations;
mod settings;

pub use database::Database;
pub use error::StorageError;
pub use settings::{MemoryStore, SettingsStore};

pub type Result<T> = std::result::Result<T, StorageError>;
