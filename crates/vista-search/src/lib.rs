//! Vista Search Box
//!
//! The combined address/search field on the new tab page:
//! - classifies committed text as an address or a search phrase
//! - fetches suggestions from the selected provider as the user types
//! - keeps only the newest fetch's results when requests overlap
//! - drives keyboard/mouse selection down to a single navigation

mod candidates;
mod debounce;
mod dispatch;
mod error;
mod fetch;
mod input;
mod provider;
mod search_box;
mod selection;
mod session;

#[cfg(test)]
mod test_support;

pub use candidates::{build_candidate_list, highlight, CandidateList, Highlight, MAX_CANDIDATES};
pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
pub use dispatch::{
    LocationAssign, Navigation, NavigationDispatcher, NavigationKind, NavigationRoute,
    TabNavigator,
};
pub use error::SearchError;
pub use fetch::{HttpTransport, SuggestTransport, SuggestionFetcher, TransportResponse};
pub use input::{
    has_scheme, is_internal, is_ipv4, parse_ipv4_host, IdentityRemap, InputClassifier,
    InputResolution, PrefixRemap, SchemeRemap, INTERNAL_SCHEMES,
};
pub use provider::{encode_component, Provider, ProviderRegistry, ResponseShape, QUERY_PLACEHOLDER};
pub use search_box::{
    FetchTicket, Key, KeyOutcome, KeyPress, Refresh, SearchBox, SuggestionView,
};
pub use selection::{PendingCommit, Selection, SelectionPhase};
pub use session::{restore_provider, SearchSession, SearchSettings, SEARCH_ENGINE_KEY};

pub type Result<T> = std::result::Result<T, SearchError>;
