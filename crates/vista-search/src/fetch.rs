//! Suggestion fetching
//!
//! One GET per query against the provider's suggestion endpoint. Failures
//! of any kind collapse to an empty suggestion set.

use futures_util::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::SearchError;
use crate::provider::Provider;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests for suggestion URLs.
pub trait SuggestTransport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse>>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

impl SuggestTransport for HttpTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<TransportResponse>> {
        async move {
            let parsed =
                Url::parse(url).map_err(|e| SearchError::InvalidUrl(format!("{}: {}", url, e)))?;

            let response = self
                .client
                .get(parsed)
                .send()
                .await
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| SearchError::Transport(e.to_string()))?;

            Ok(TransportResponse { status, body })
        }
        .boxed()
    }
}

#[derive(Clone)]
pub struct SuggestionFetcher {
    transport: Arc<dyn SuggestTransport>,
}

impl SuggestionFetcher {
    pub fn new(transport: Arc<dyn SuggestTransport>) -> Self {
        Self { transport }
    }

    /// Fetch suggestions, treating every failure as "no suggestions"
    pub async fn fetch(&self, query: &str, provider: Provider) -> Vec<String> {
        match self.try_fetch(query, provider).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::debug!(
                    provider = %provider,
                    error = %e,
                    "Suggestion fetch failed"
                );
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, query: &str, provider: Provider) -> Result<Vec<String>> {
        let url = provider.suggest_url(query);
        let response = self.transport.get(&url).await?;

        if !response.is_success() {
            return Err(SearchError::Status(response.status));
        }

        let body: serde_json::Value = serde_json::from_str(&response.body)?;
        Ok(provider.parse_suggestions(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;

    #[tokio::test]
    async fn test_fetch_pair_array() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            &Provider::Google.suggest_url("al"),
            TransportResponse::ok(r#"["al", ["alpha", "beta"]]"#),
        );

        let fetcher = SuggestionFetcher::new(transport.clone());
        let suggestions = fetcher.fetch("al", Provider::Google).await;

        assert_eq!(suggestions, vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(
            transport.requests(),
            vec!["https://suggestqueries.google.com/complete/search?client=firefox&q=al".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_encodes_query() {
        let transport = Arc::new(ScriptedTransport::new());
        let fetcher = SuggestionFetcher::new(transport.clone());
        fetcher.fetch("c++ & rust", Provider::DuckDuckGo).await;

        assert_eq!(
            transport.requests(),
            vec!["https://duckduckgo.com/ac/?q=c%2B%2B%20%26%20rust".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            &Provider::Bing.suggest_url("x"),
            TransportResponse {
                status: 503,
                body: r#"["x", ["xylophone"]]"#.to_string(),
            },
        );

        let fetcher = SuggestionFetcher::new(transport);
        assert!(fetcher.fetch("x", Provider::Bing).await.is_empty());
        assert!(matches!(
            fetcher.try_fetch("x", Provider::Bing).await,
            Err(SearchError::Status(503))
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_is_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            &Provider::DuckDuckGo.suggest_url("x"),
            TransportResponse::ok("<html>rate limited</html>"),
        );

        let fetcher = SuggestionFetcher::new(transport);
        assert!(fetcher.fetch("x", Provider::DuckDuckGo).await.is_empty());
        assert!(matches!(
            fetcher.try_fetch("x", Provider::DuckDuckGo).await,
            Err(SearchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_empty() {
        // Unscripted URLs fail at the transport level
        let fetcher = SuggestionFetcher::new(Arc::new(ScriptedTransport::new()));
        assert!(fetcher.fetch("offline", Provider::YouTube).await.is_empty());
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(5), "vista-test").is_ok());
    }
}
