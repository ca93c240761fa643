//! Input classification for the search box
//!
//! Decides whether committed text is an address to open or a phrase to
//! search for. Rules are applied in order:
//! 1. Blank input → nothing to do
//! 2. Browser-internal scheme (`chrome://`, `edge://`) → remapped address
//! 3. Any `scheme://` → verbatim address
//! 4. Dotted-quad IPv4 host or `localhost` prefix → `http://` address
//! 5. Dotted token without whitespace, or `host:port` → `https://` address
//! 6. Everything else → search

use std::collections::HashMap;
use std::sync::Arc;

/// Browser-internal schemes that never go through normal resolution.
pub const INTERNAL_SCHEMES: [&str; 2] = ["chrome://", "edge://"];

/// Result of classifying search box input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResolution {
    /// Blank input, nothing to navigate to
    Empty,
    /// Navigate to a fully qualified address
    Navigate(String),
    /// Search the active provider for this (trimmed) phrase
    Search(String),
}

impl InputResolution {
    pub fn is_navigable(&self) -> bool {
        matches!(self, InputResolution::Navigate(_))
    }
}

/// Rewrites browser-internal addresses for the host browser.
pub trait SchemeRemap: Send + Sync {
    fn remap(&self, url: &str) -> String;
}

/// Leaves internal addresses untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityRemap;

impl SchemeRemap for IdentityRemap {
    fn remap(&self, url: &str) -> String {
        url.to_string()
    }
}

/// Exact-match table first, then a verbatim scheme prefix swap.
#[derive(Debug, Clone)]
pub struct PrefixRemap {
    from: String,
    to: String,
    exact: HashMap<String, String>,
}

impl PrefixRemap {
    /// `from` and `to` are full prefixes such as `"chrome://"`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            exact: HashMap::new(),
        }
    }

    pub fn with_exact(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.exact.insert(from.into(), to.into());
        self
    }
}

impl SchemeRemap for PrefixRemap {
    fn remap(&self, url: &str) -> String {
        if let Some(mapped) = self.exact.get(url) {
            return mapped.clone();
        }

        match url.strip_prefix(self.from.as_str()) {
            Some(rest) => format!("{}{}", self.to, rest),
            None => url.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct InputClassifier {
    remap: Arc<dyn SchemeRemap>,
}

impl InputClassifier {
    pub fn new() -> Self {
        Self {
            remap: Arc::new(IdentityRemap),
        }
    }

    pub fn with_remap(remap: Arc<dyn SchemeRemap>) -> Self {
        Self { remap }
    }

    /// Classify raw search box text
    pub fn classify(&self, input: &str) -> InputResolution {
        let input = input.trim();

        if input.is_empty() {
            return InputResolution::Empty;
        }

        if is_internal(input) {
            return InputResolution::Navigate(self.remap.remap(input));
        }

        if has_scheme(input) {
            return InputResolution::Navigate(input.to_string());
        }

        if is_ipv4(input) || input.starts_with("localhost") {
            return InputResolution::Navigate(format!("http://{}", input));
        }

        if is_dotted_token(input) || is_host_port(input) {
            return InputResolution::Navigate(format!("https://{}", input));
        }

        InputResolution::Search(input.to_string())
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InputClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputClassifier").finish_non_exhaustive()
    }
}

pub fn is_internal(input: &str) -> bool {
    INTERNAL_SCHEMES
        .iter()
        .any(|scheme| input.starts_with(scheme))
}

/// `[A-Za-z][A-Za-z0-9+.-]*://` at the start of the input
pub fn has_scheme(input: &str) -> bool {
    let Some(end) = input.find("://") else {
        return false;
    };

    let mut chars = input[..end].chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Parse the host portion of `input` as four decimal octets.
///
/// Anything after the first `/`, `?` or `#` is ignored, as is a `:port`
/// suffix on the host.
pub fn parse_ipv4_host(input: &str) -> Option<[u8; 4]> {
    let input = input.trim();
    let without_path = input.split(['/', '?', '#']).next()?;
    let host = without_path.split(':').next()?;

    let mut octets = [0u8; 4];
    let mut parts = host.split('.');
    for slot in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        *slot = u8::try_from(value).ok()?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(octets)
}

pub fn is_ipv4(input: &str) -> bool {
    parse_ipv4_host(input).is_some()
}

/// No whitespace anywhere and a dot with at least one character either side.
fn is_dotted_token(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }

    input
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < input.len())
}

/// `host:port` with a 2-5 digit port, optionally followed by a `/path`.
fn is_host_port(input: &str) -> bool {
    input.match_indices(':').any(|(idx, _)| {
        let host = &input[..idx];
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return false;
        }

        let rest = &input[idx + 1..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        (2..=5).contains(&digits) && (digits == rest.len() || rest.as_bytes()[digits] == b'/')
    })
}
