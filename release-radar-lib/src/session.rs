//! Search session: the lifecycle of the outstanding catalog search.
//!
//! Every search mints a new [`RequestToken`]. A response may only change
//! visible state if its token is still the live one; anything else is a
//! superseded or cancelled search and is dropped on arrival. Debounce timing
//! alone does not order network responses, so the token comparison is what
//! makes the newest search win.

use release_radar_core::SearchResult;
use release_radar_lookup::LookupError;

/// Monotonically increasing identifier of one issued search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No search outstanding, dropdown hidden.
    #[default]
    Idle,
    /// A search was issued and its response has not been applied yet.
    Pending { query: String, token: RequestToken },
    /// The live search returned; its results are visible.
    Settled {
        query: String,
        token: RequestToken,
        results: Vec<SearchResult>,
    },
}

impl SessionState {
    /// The token whose response may still be applied, if any.
    pub fn live_token(&self) -> Option<RequestToken> {
        match self {
            Self::Idle => None,
            Self::Pending { token, .. } | Self::Settled { token, .. } => Some(*token),
        }
    }
}

/// What happened when a search response was offered to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchApplied {
    /// Results became visible (possibly an empty list).
    Shown { query: String, count: usize },
    /// The live search failed; the dropdown was hidden.
    Failed,
    /// The response belonged to a superseded or cancelled search.
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    state: SessionState,
    last_token: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start a new search for `query`, superseding any outstanding one.
    ///
    /// The session moves to `Pending` under a freshly minted token, which the
    /// caller attaches to the catalog call it issues.
    pub fn search(&mut self, query: &str) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        log::debug!("search {} issued for {:?}", token, query);
        self.state = SessionState::Pending {
            query: query.to_string(),
            token,
        };
        token
    }

    /// Offer a catalog response to the session.
    ///
    /// Only the response carrying the live token of a pending search is
    /// applied. Errors hide the dropdown without surfacing anything.
    pub fn apply(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<SearchResult>, LookupError>,
    ) -> SearchApplied {
        let query = match &self.state {
            SessionState::Pending { query, token: live } if *live == token => query.clone(),
            _ => {
                log::debug!(
                    "discarding stale search response {} (live: {:?})",
                    token,
                    self.state.live_token()
                );
                return SearchApplied::Stale;
            }
        };

        match outcome {
            Ok(results) => {
                let count = results.len();
                log::debug!("search {} settled with {} result(s)", token, count);
                self.state = SessionState::Settled {
                    query: query.clone(),
                    token,
                    results,
                };
                SearchApplied::Shown { query, count }
            }
            Err(e) => {
                let kind = if e.is_transient() { "transient" } else { "permanent" };
                log::debug!("search {} failed silently ({}): {}", token, kind, e);
                self.state = SessionState::Idle;
                SearchApplied::Failed
            }
        }
    }

    /// Close the dropdown (selection, blur, or dismissal). Invalidates the
    /// live token so any response still in flight is ignored.
    pub fn close(&mut self) {
        if let Some(token) = self.state.live_token() {
            log::debug!("search session closed, invalidating {}", token);
        }
        self.state = SessionState::Idle;
    }

    /// Results currently visible in the dropdown.
    pub fn visible_results(&self) -> &[SearchResult] {
        match &self.state {
            SessionState::Settled { results, .. } => results,
            _ => &[],
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Settled { .. })
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, SessionState::Pending { .. })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
