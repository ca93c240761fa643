//! New tab configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use vista_search::{Provider, ProviderRegistry, SearchSettings};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Provider key used until the user picks one
    pub default_provider: String,
    /// Quiet period after typing before suggestions are fetched
    pub debounce_ms: u64,
    /// Delay between the box losing focus and the list closing
    pub blur_grace_ms: u64,
    /// Timeout for a single suggestion request
    pub suggest_timeout_secs: u64,
    /// User agent sent to suggestion endpoints
    pub user_agent: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("vista.db"),
            default_provider: ProviderRegistry::builtin().default_provider().key().to_string(),
            debounce_ms: 120,
            blur_grace_ms: 120,
            suggest_timeout_secs: 5,
            user_agent: format!("vista/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Vista"))
            .unwrap_or_else(|| PathBuf::from(".vista"))
    }

    /// Read a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the default config
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if ProviderRegistry::builtin().get(&self.default_provider).is_none() {
            return Err(CoreError::Config(format!(
                "unknown default_provider: {}",
                self.default_provider
            )));
        }
        if self.suggest_timeout_secs == 0 {
            return Err(CoreError::Config(
                "suggest_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CoreError::Config("user_agent must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn suggest_timeout(&self) -> Duration {
        Duration::from_secs(self.suggest_timeout_secs)
    }

    /// The configured fallback provider; unknown keys resolve to the
    /// registry default
    pub fn default_provider(&self) -> Provider {
        ProviderRegistry::builtin().lookup(Some(&self.default_provider))
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            blur_grace: Duration::from_millis(self.blur_grace_ms),
            default_provider: self.default_provider(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directory lookup
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
