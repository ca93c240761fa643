//! Navigation dispatch
//!
//! Turns committed search box text into exactly one navigation of the
//! current view: either the classified address or the provider's search
//! page for the phrase.

use serde::Serialize;
use std::sync::Arc;

use crate::input::{InputClassifier, InputResolution};
use crate::provider::Provider;
use crate::Result;

/// Host capability that can load a URL into the current tab
pub trait TabNavigator: Send + Sync {
    fn navigate_current_view(&self, url: &str) -> Result<()>;
}

/// Direct location change of the page itself, always available
pub trait LocationAssign: Send + Sync {
    fn assign(&self, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    Address,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationRoute {
    Tab,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub url: String,
    pub kind: NavigationKind,
    pub route: NavigationRoute,
}

#[derive(Clone)]
pub struct NavigationDispatcher {
    classifier: InputClassifier,
    tabs: Option<Arc<dyn TabNavigator>>,
    location: Arc<dyn LocationAssign>,
}

impl NavigationDispatcher {
    pub fn new(location: Arc<dyn LocationAssign>) -> Self {
        Self {
            classifier: InputClassifier::new(),
            tabs: None,
            location,
        }
    }

    pub fn with_tabs(mut self, tabs: Arc<dyn TabNavigator>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn with_classifier(mut self, classifier: InputClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &InputClassifier {
        &self.classifier
    }

    /// Where `text` would lead, without navigating
    pub fn target(&self, text: &str, provider: Provider) -> Option<(String, NavigationKind)> {
        match self.classifier.classify(text) {
            InputResolution::Empty => None,
            InputResolution::Navigate(url) => Some((url, NavigationKind::Address)),
            InputResolution::Search(query) => {
                Some((provider.search_url(&query), NavigationKind::Search))
            }
        }
    }

    /// Navigate the current view; `None` when `text` is blank.
    pub fn dispatch(&self, text: &str, provider: Provider) -> Option<Navigation> {
        let (url, kind) = self.target(text, provider)?;

        let route = match &self.tabs {
            Some(tabs) => match tabs.navigate_current_view(&url) {
                Ok(()) => NavigationRoute::Tab,
                Err(e) => {
                    tracing::debug!(error = %e, "Tab navigation failed, assigning location");
                    self.location.assign(&url);
                    NavigationRoute::Location
                }
            },
            None => {
                self.location.assign(&url);
                NavigationRoute::Location
            }
        };

        tracing::info!(url = %url, kind = ?kind, route = ?route, "Navigating");

        Some(Navigation { url, kind, route })
    }
}

impl std::fmt::Debug for NavigationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationDispatcher")
            .field("has_tabs", &self.tabs.is_some())
            .finish_non_exhaustive()
    }
}
