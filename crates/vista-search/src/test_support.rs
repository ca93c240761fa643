//! Test doubles shared by the unit tests

use futures_util::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{LocationAssign, TabNavigator};
use crate::error::SearchError;
use crate::fetch::{SuggestTransport, TransportResponse};
use crate::Result;

/// Canned responses keyed by URL, with optional simulated latency.
/// Unscripted URLs fail like an unreachable host.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, (Duration, TransportResponse)>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: TransportResponse) {
        self.respond_after(url, Duration::ZERO, response);
    }

    pub fn respond_after(&self, url: &str, latency: Duration, response: TransportResponse) {
        self.responses
            .lock()
            .insert(url.to_string(), (latency, response));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl SuggestTransport for ScriptedTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse>> {
        async move {
            self.requests.lock().push(url.to_string());
            let scripted = self.responses.lock().get(url).cloned();

            match scripted {
                Some((latency, response)) => {
                    if !latency.is_zero() {
                        tokio::time::sleep(latency).await;
                    }
                    Ok(response)
                }
                None => Err(SearchError::Transport(format!("unreachable: {}", url))),
            }
        }
        .boxed()
    }
}

/// Records direct location assignments
#[derive(Default, Clone)]
pub struct RecordingLocation {
    urls: Arc<Mutex<Vec<String>>>,
}

impl RecordingLocation {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

impl LocationAssign for RecordingLocation {
    fn assign(&self, url: &str) {
        self.urls.lock().push(url.to_string());
    }
}

/// Tab capability that either records or refuses every navigation
#[derive(Default, Clone)]
pub struct RecordingTabs {
    urls: Arc<Mutex<Vec<String>>>,
    unavailable: bool,
}

impl RecordingTabs {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

impl TabNavigator for RecordingTabs {
    fn navigate_current_view(&self, url: &str) -> Result<()> {
        if self.unavailable {
            return Err(SearchError::Navigation("no current tab".to_string()));
        }
        self.urls.lock().push(url.to_string());
        Ok(())
    }
}
