//! Search session driver
//!
//! Binds a `SearchBox` to real time and the network: keystrokes are
//! debounced into refreshes, refreshes spawn fetches, and fetch results
//! are applied only if no newer refresh was dispatched in the meantime.
//! In-flight fetches are never cancelled; stale ones simply land nowhere.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use vista_storage::SettingsStore;

use crate::debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
use crate::dispatch::{Navigation, NavigationDispatcher};
use crate::fetch::SuggestionFetcher;
use crate::provider::{Provider, ProviderRegistry};
use crate::search_box::{FetchTicket, Key, KeyOutcome, KeyPress, Refresh, SearchBox, SuggestionView};
use crate::Result;

/// Settings key holding the selected provider
pub const SEARCH_ENGINE_KEY: &str = "searchEngine";

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Quiet interval before typing triggers a fetch
    pub debounce: Duration,
    /// Delay between losing focus and hiding the list
    pub blur_grace: Duration,
    /// Provider used when no valid choice has been persisted
    pub default_provider: Provider,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_QUIET_PERIOD,
            blur_grace: Duration::from_millis(120),
            default_provider: ProviderRegistry::builtin().default_provider(),
        }
    }
}

/// Read the persisted provider key, falling back to `fallback` when it is
/// missing or unknown
pub fn restore_provider(
    store: &dyn SettingsStore,
    registry: &ProviderRegistry,
    fallback: Provider,
) -> Result<Provider> {
    let key = store.get(SEARCH_ENGINE_KEY)?;
    Ok(key
        .as_deref()
        .and_then(|key| registry.get(key))
        .unwrap_or(fallback))
}

struct Inner {
    search_box: Mutex<SearchBox>,
    fetcher: SuggestionFetcher,
    dispatcher: NavigationDispatcher,
    registry: ProviderRegistry,
    fallback: Provider,
    store: Arc<dyn SettingsStore>,
    input_timer: Mutex<Debouncer>,
    blur_timer: Mutex<Debouncer>,
    view: watch::Sender<SuggestionView>,
}

/// Cheaply cloneable handle; all clones drive the same search box.
///
/// Event methods spawn tasks and must be called from within a Tokio
/// runtime.
#[derive(Clone)]
pub struct SearchSession {
    inner: Arc<Inner>,
}

impl SearchSession {
    pub fn new(
        fetcher: SuggestionFetcher,
        dispatcher: NavigationDispatcher,
        store: Arc<dyn SettingsStore>,
        settings: SearchSettings,
    ) -> Self {
        let registry = ProviderRegistry::builtin();
        let fallback = settings.default_provider;
        let provider = restore_provider(store.as_ref(), &registry, fallback).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read search provider, using default");
            fallback
        });

        tracing::info!(provider = %provider, "Search session ready");

        let search_box = SearchBox::new(provider);
        let (view, _) = watch::channel(search_box.view());

        Self {
            inner: Arc::new(Inner {
                search_box: Mutex::new(search_box),
                fetcher,
                dispatcher,
                registry,
                fallback,
                store,
                input_timer: Mutex::new(Debouncer::new(settings.debounce)),
                blur_timer: Mutex::new(Debouncer::new(settings.blur_grace)),
                view,
            }),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.inner.registry
    }

    pub fn provider(&self) -> Provider {
        self.inner.search_box.lock().provider()
    }

    pub fn text(&self) -> String {
        self.inner.search_box.lock().text().to_string()
    }

    pub fn snapshot(&self) -> SuggestionView {
        self.inner.search_box.lock().view()
    }

    /// Receive a fresh view after every state change
    pub fn subscribe(&self) -> watch::Receiver<SuggestionView> {
        self.inner.view.subscribe()
    }

    /// The field text changed; fetch once typing pauses
    pub fn input(&self, text: impl Into<String>) {
        self.inner.search_box.lock().set_text(text);
        self.publish();

        let this = self.clone();
        self.inner.input_timer.lock().schedule(move || this.refresh());
    }

    /// Refresh suggestions for the current text immediately
    pub fn refresh(&self) {
        let refresh = self.inner.search_box.lock().begin_refresh();
        match refresh {
            Refresh::Cleared => self.publish(),
            Refresh::Fetch(ticket) => self.spawn_fetch(ticket),
        }
    }

    pub fn key_down(&self, press: impl Into<KeyPress>) -> KeyOutcome {
        let press = press.into();
        if press.key == Key::Escape {
            self.inner.input_timer.lock().cancel();
        }

        let outcome = self.inner.search_box.lock().key_down(press);
        self.publish();
        outcome
    }

    /// Release of a key; an armed Enter navigates
    pub fn key_up(&self, key: Key) -> Option<Navigation> {
        let commit = {
            let mut search_box = self.inner.search_box.lock();
            search_box
                .key_up(key)
                .map(|text| (text, search_box.provider()))
        };
        self.publish();

        let (text, provider) = commit?;
        self.inner.dispatcher.dispatch(&text, provider)
    }

    pub fn click(&self, index: usize) -> Option<Navigation> {
        let commit = {
            let mut search_box = self.inner.search_box.lock();
            search_box
                .click(index)
                .map(|text| (text, search_box.provider()))
        };
        self.publish();

        let (text, provider) = commit?;
        self.inner.dispatcher.dispatch(&text, provider)
    }

    pub fn focus(&self) {
        let ticket = self.inner.search_box.lock().focus();
        if let Some(ticket) = ticket {
            self.spawn_fetch(ticket);
        }
    }

    /// Hide the list after the grace period, letting a click land first
    pub fn blur(&self) {
        let this = self.clone();
        self.inner.blur_timer.lock().schedule(move || {
            this.inner.search_box.lock().blur_elapsed();
            this.publish();
        });
    }

    /// Switch provider, persist the choice and refetch for the current text
    pub fn select_provider(&self, key: &str) -> Provider {
        let provider = self
            .inner
            .registry
            .get(key)
            .unwrap_or(self.inner.fallback);

        if let Err(e) = self.inner.store.set(SEARCH_ENGINE_KEY, provider.key()) {
            tracing::warn!(error = %e, "Failed to persist search provider");
        }

        let refresh = self.inner.search_box.lock().set_provider(provider);
        tracing::info!(provider = %provider, "Search provider changed");

        self.publish();
        if let Refresh::Fetch(ticket) = refresh {
            self.spawn_fetch(ticket);
        }
        provider
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let this = self.clone();
        tokio::spawn(async move {
            let suggestions = this
                .inner
                .fetcher
                .fetch(&ticket.query, ticket.provider)
                .await;

            let applied = this
                .inner
                .search_box
                .lock()
                .apply_suggestions(&ticket, &suggestions);
            if applied {
                this.publish();
            }
        });
    }

    fn publish(&self) {
        let view = self.inner.search_box.lock().view();
        self.inner.view.send_replace(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{NavigationKind, NavigationRoute};
    use crate::fetch::TransportResponse;
    use crate::test_support::{RecordingLocation, ScriptedTransport};
    use vista_storage::MemoryStore;

    struct Harness {
        session: SearchSession,
        transport: Arc<ScriptedTransport>,
        location: RecordingLocation,
        store: MemoryStore,
    }

    fn harness(store: MemoryStore) -> Harness {
        let transport = Arc::new(ScriptedTransport::new());
        let location = RecordingLocation::default();
        let session = SearchSession::new(
            SuggestionFetcher::new(transport.clone()),
            NavigationDispatcher::new(Arc::new(location.clone())),
            Arc::new(store.clone()),
            SearchSettings::default(),
        );

        Harness {
            session,
            transport,
            location,
            store,
        }
    }

    fn script(transport: &ScriptedTransport, provider: Provider, query: &str, body: &str) {
        transport.respond(&provider.suggest_url(query), TransportResponse::ok(body));
    }

    async fn pause(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_restores_persisted_provider() {
        let h = harness(MemoryStore::with_value(SEARCH_ENGINE_KEY, "bing"));
        assert_eq!(h.session.provider(), Provider::Bing);

        let h = harness(MemoryStore::with_value(SEARCH_ENGINE_KEY, "lycos"));
        assert_eq!(h.session.provider(), Provider::Google);

        let h = harness(MemoryStore::new());
        assert_eq!(h.session.provider(), Provider::Google);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_default_provider() {
        let settings = SearchSettings {
            default_provider: Provider::Bing,
            ..SearchSettings::default()
        };
        let session = |store: MemoryStore| {
            SearchSession::new(
                SuggestionFetcher::new(Arc::new(ScriptedTransport::new())),
                NavigationDispatcher::new(Arc::new(RecordingLocation::default())),
                Arc::new(store),
                settings.clone(),
            )
        };

        assert_eq!(session(MemoryStore::new()).provider(), Provider::Bing);
        assert_eq!(
            session(MemoryStore::with_value(SEARCH_ENGINE_KEY, "lycos")).provider(),
            Provider::Bing
        );
        assert_eq!(
            session(MemoryStore::with_value(SEARCH_ENGINE_KEY, "youtube")).provider(),
            Provider::YouTube
        );
        assert_eq!(
            session(MemoryStore::new()).select_provider("lycos"),
            Provider::Bing
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_fetches_once() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "rust", r#"["rust", ["rust book"]]"#);

        for text in ["r", "ru", "rus", "rust"] {
            h.session.input(text);
            pause(50).await;
        }
        assert!(h.transport.requests().is_empty());

        pause(500).await;
        assert_eq!(h.transport.requests(), vec![Provider::Google.suggest_url("rust")]);

        let view = h.session.snapshot();
        assert_eq!(view.candidates.as_slice(), &["rust", "rust book"]);
        assert!(view.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_is_discarded() {
        let h = harness(MemoryStore::new());
        h.transport.respond_after(
            &Provider::Google.suggest_url("a"),
            Duration::from_millis(400),
            TransportResponse::ok(r#"["a", ["apple"]]"#),
        );
        script(&h.transport, Provider::Google, "ab", r#"["ab", ["abacus"]]"#);

        h.session.input("a");
        pause(150).await;
        h.session.input("ab");
        pause(150).await;
        assert_eq!(
            h.session.snapshot().candidates.as_slice(),
            &["ab", "abacus"]
        );

        // "a" resolves now, after "ab"
        pause(1000).await;
        assert_eq!(h.transport.requests().len(), 2);
        assert_eq!(
            h.session.snapshot().candidates.as_slice(),
            &["ab", "abacus"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_outlasts_slow_response() {
        let h = harness(MemoryStore::new());
        h.transport.respond_after(
            &Provider::Google.suggest_url("al"),
            Duration::from_millis(300),
            TransportResponse::ok(r#"["al", ["alpha"]]"#),
        );

        h.session.input("al");
        pause(200).await;
        assert_eq!(h.transport.requests().len(), 1);

        h.session.key_down(Key::Escape);
        pause(400).await;

        let view = h.session.snapshot();
        assert!(!view.visible);
        assert!(view.candidates.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_cancels_pending_refresh() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha"]]"#);

        h.session.input("al");
        pause(50).await;
        h.session.key_down(Key::Escape);
        pause(400).await;

        assert!(h.transport.requests().is_empty());
        assert!(!h.session.snapshot().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_text_hides_list() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha"]]"#);

        h.session.input("al");
        pause(200).await;
        assert!(h.session.snapshot().visible);

        h.session.input("");
        pause(200).await;
        assert!(h.session.snapshot().candidates.is_empty());
        assert_eq!(h.transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_shows_typed_row_only() {
        let h = harness(MemoryStore::new());

        h.session.input("offline");
        pause(200).await;

        let view = h.session.snapshot();
        assert_eq!(view.candidates.as_slice(), &["offline"]);
        assert!(!view.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_then_enter_navigates_once() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha", "beta"]]"#);

        h.session.input("al");
        pause(200).await;

        assert_eq!(h.session.key_down(Key::ArrowDown), KeyOutcome::Consumed);
        assert_eq!(h.session.key_down(Key::Enter), KeyOutcome::Consumed);
        assert_eq!(h.session.text(), "alpha");
        assert!(h.location.urls().is_empty());

        // Auto-repeat before release
        h.session.key_down(Key::Enter);

        let nav = h.session.key_up(Key::Enter).unwrap();
        assert_eq!(nav.kind, NavigationKind::Search);
        assert_eq!(nav.route, NavigationRoute::Location);
        assert_eq!(nav.url, "https://www.google.com/search?q=alpha");

        assert!(h.session.key_up(Key::Enter).is_none());
        assert_eq!(h.location.urls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_on_address() {
        let h = harness(MemoryStore::new());
        h.session.input("news.site");
        h.session.key_down(Key::Enter);

        let nav = h.session.key_up(Key::Enter).unwrap();
        assert_eq!(nav.kind, NavigationKind::Address);
        assert_eq!(nav.url, "https://news.site");
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_navigates() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha", "beta"]]"#);

        h.session.input("al");
        pause(200).await;

        let nav = h.session.click(2).unwrap();
        assert_eq!(nav.url, "https://www.google.com/search?q=beta");
        assert_eq!(h.session.text(), "beta");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blur_clears_after_grace() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha"]]"#);

        h.session.input("al");
        pause(200).await;

        h.session.blur();
        pause(100).await;
        assert!(h.session.snapshot().visible);

        pause(50).await;
        assert!(!h.session.snapshot().visible);
        assert!(h.session.snapshot().candidates.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_refetches_without_debounce() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha"]]"#);

        h.session.input("al");
        pause(200).await;
        h.session.blur();
        pause(200).await;
        assert!(!h.session.snapshot().visible);

        h.session.focus();
        pause(1).await;
        assert_eq!(h.transport.requests().len(), 2);
        assert!(h.session.snapshot().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_provider_persists_and_refetches() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "rust", r#"["rust", ["rust lang"]]"#);
        script(
            &h.transport,
            Provider::DuckDuckGo,
            "rust",
            r#"[{"phrase": "rustup"}, {"phrase": "rust, cargo, clippy"}]"#,
        );

        h.session.input("rust");
        pause(200).await;

        let provider = h.session.select_provider("duckduckgo");
        assert_eq!(provider, Provider::DuckDuckGo);
        assert_eq!(
            h.store.get(SEARCH_ENGINE_KEY).unwrap(),
            Some("duckduckgo".to_string())
        );

        pause(1).await;
        let view = h.session.snapshot();
        assert_eq!(view.provider, "duckduckgo");
        assert_eq!(
            view.candidates.as_slice(),
            &["rust", "rustup", "cargo", "clippy"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let h = harness(MemoryStore::new());
        script(&h.transport, Provider::Google, "al", r#"["al", ["alpha"]]"#);
        let mut rx = h.session.subscribe();

        h.session.input("al");
        pause(200).await;

        assert!(rx.has_changed().unwrap());
        let view = rx.borrow_and_update().clone();
        assert_eq!(view.candidates.as_slice(), &["al", "alpha"]);
    }
}
