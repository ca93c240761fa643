//! Vista Core
//!
//! Application wiring for the new tab page: configuration, logging and
//! the container that ties the settings store to the search box.

mod config;
mod error;
mod newtab;

pub use config::Config;
pub use error::CoreError;
pub use newtab::{HostCapabilities, NewTab};

// Re-export the search box and storage surface
pub use vista_search::{
    highlight, CandidateList, Key, KeyOutcome, KeyPress, LocationAssign, Navigation,
    NavigationKind, NavigationRoute, PrefixRemap, Provider, ProviderRegistry, SchemeRemap,
    SearchError, SearchSession, SuggestionView, TabNavigator,
};
pub use vista_storage::{Database, MemoryStore, SettingsStore, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
