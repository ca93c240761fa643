//! Suggestion/search providers
//!
//! The provider set is closed: each variant carries its own URL templates
//! and the rule for reading its suggestion response.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder replaced by the percent-encoded query in URL templates
pub const QUERY_PLACEHOLDER: &str = "{q}";

/// Characters left alone by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// How a provider lays out its suggestion response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `["query", ["s1", "s2", ...], ...]`
    PairArray,
    /// `[{"phrase": "s1"}, {"phrase": "s2"}, ...]`
    PhraseList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    YouTube,
    Bing,
    DuckDuckGo,
}

impl Provider {
    /// Registration order; the first entry is the default.
    pub const ALL: [Provider; 4] = [
        Provider::Google,
        Provider::YouTube,
        Provider::Bing,
        Provider::DuckDuckGo,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::YouTube => "youtube",
            Provider::Bing => "bing",
            Provider::DuckDuckGo => "duckduckgo",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::YouTube => "YouTube",
            Provider::Bing => "Bing",
            Provider::DuckDuckGo => "DuckDuckGo",
        }
    }

    pub fn search_template(&self) -> &'static str {
        match self {
            Provider::Google => "https://www.google.com/search?q={q}",
            Provider::YouTube => "https://www.youtube.com/results?search_query={q}",
            Provider::Bing => "https://www.bing.com/search?q={q}",
            Provider::DuckDuckGo => "https://duckduckgo.com/?q={q}",
        }
    }

    pub fn suggest_template(&self) -> &'static str {
        match self {
            Provider::Google => {
                "https://suggestqueries.google.com/complete/search?client=firefox&q={q}"
            }
            Provider::YouTube => {
                "https://suggestqueries.google.com/complete/search?client=firefox&ds=yt&q={q}"
            }
            Provider::Bing => "https://api.bing.com/osjson.aspx?query={q}",
            Provider::DuckDuckGo => "https://duckduckgo.com/ac/?q={q}",
        }
    }

    pub fn response_shape(&self) -> ResponseShape {
        match self {
            Provider::Google | Provider::YouTube | Provider::Bing => ResponseShape::PairArray,
            Provider::DuckDuckGo => ResponseShape::PhraseList,
        }
    }

    pub fn search_url(&self, query: &str) -> String {
        fill_template(self.search_template(), query)
    }

    pub fn suggest_url(&self, query: &str) -> String {
        fill_template(self.suggest_template(), query)
    }

    /// Extract suggestion phrases from a decoded response body.
    ///
    /// Entries of the wrong type are dropped rather than failing the batch.
    pub fn parse_suggestions(&self, body: &Value) -> Vec<String> {
        let raw: Vec<&str> = match self.response_shape() {
            ResponseShape::PairArray => body
                .get(1)
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default(),
            ResponseShape::PhraseList => body
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match item {
                            Value::String(s) => Some(s.as_str()),
                            Value::Object(_) => item.get("phrase").and_then(Value::as_str),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        };

        raw.into_iter()
            .flat_map(|phrase| self.expand_phrase(phrase))
            .collect()
    }

    /// DuckDuckGo sometimes packs several completions into one phrase
    /// separated by commas; two or more commas mean it should be split.
    fn expand_phrase(&self, phrase: &str) -> Vec<String> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Vec::new();
        }

        if *self == Provider::DuckDuckGo && phrase.matches(',').count() >= 2 {
            return phrase
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect();
        }

        vec![phrase.to_string()]
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .iter()
            .copied()
            .find(|provider| provider.key() == s)
            .ok_or_else(|| format!("Unknown search provider: {}", s))
    }
}

fn fill_template(template: &str, query: &str) -> String {
    template.replacen(QUERY_PLACEHOLDER, &encode_component(query), 1)
}

/// Read-only catalog of providers, in registration order
#[derive(Debug, Clone, Copy)]
pub struct ProviderRegistry {
    providers: &'static [Provider],
}

impl ProviderRegistry {
    pub fn builtin() -> Self {
        Self {
            providers: &Provider::ALL,
        }
    }

    pub fn providers(&self) -> &'static [Provider] {
        self.providers
    }

    pub fn default_provider(&self) -> Provider {
        self.providers[0]
    }

    pub fn get(&self, key: &str) -> Option<Provider> {
        self.providers
            .iter()
            .copied()
            .find(|provider| provider.key() == key)
    }

    /// Resolve a stored key, falling back to the default provider
    pub fn lookup(&self, key: Option<&str>) -> Provider {
        key.and_then(|key| self.get(key))
            .unwrap_or_else(|| self.default_provider())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
