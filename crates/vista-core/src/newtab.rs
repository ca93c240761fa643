//! New tab page container
//!
//! Owns the settings database and the search session. Clock, weather,
//! background and bookmark widgets are rendered by the host and never
//! touch this state.

use std::sync::Arc;

use vista_search::{
    HttpTransport, IdentityRemap, InputClassifier, LocationAssign, NavigationDispatcher,
    SchemeRemap, SearchSession, SuggestTransport, SuggestionFetcher, TabNavigator,
};
use vista_storage::Database;

use crate::config::Config;
use crate::Result;

/// What the embedding browser page provides
#[derive(Clone)]
pub struct HostCapabilities {
    pub location: Arc<dyn LocationAssign>,
    pub tabs: Option<Arc<dyn TabNavigator>>,
    pub remap: Arc<dyn SchemeRemap>,
}

impl HostCapabilities {
    pub fn new(location: Arc<dyn LocationAssign>) -> Self {
        Self {
            location,
            tabs: None,
            remap: Arc::new(IdentityRemap),
        }
    }

    pub fn with_tabs(mut self, tabs: Arc<dyn TabNavigator>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn with_remap(mut self, remap: Arc<dyn SchemeRemap>) -> Self {
        self.remap = remap;
        self
    }
}

pub struct NewTab {
    config: Config,
    db: Database,
    search: SearchSession,
}

impl NewTab {
    /// Open the settings database and wire up the search box
    pub fn open(config: Config, host: HostCapabilities) -> Result<Self> {
        config.validate()?;

        let db = Database::open(&config.database_path)?;
        let transport = HttpTransport::new(config.suggest_timeout(), &config.user_agent)?;

        Ok(Self::with_parts(config, db, Arc::new(transport), host))
    }

    pub fn with_parts(
        config: Config,
        db: Database,
        transport: Arc<dyn SuggestTransport>,
        host: HostCapabilities,
    ) -> Self {
        let mut dispatcher = NavigationDispatcher::new(host.location)
            .with_classifier(InputClassifier::with_remap(host.remap));
        if let Some(tabs) = host.tabs {
            dispatcher = dispatcher.with_tabs(tabs);
        }

        let search = SearchSession::new(
            SuggestionFetcher::new(transport),
            dispatcher,
            Arc::new(db.clone()),
            config.search_settings(),
        );

        tracing::info!(
            database = %config.database_path.display(),
            provider = %search.provider(),
            "New tab initialized"
        );

        Self { config, db, search }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }
}
