use std::fmt;

/// One successfully fetched page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Channel ids carried by the page's items; items without one are
    /// skipped at parse time.
    pub channel_ids: Vec<String>,
    /// Raw item count, which drives the per-keyword fetch accounting.
    pub item_count: u64,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Classification of one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Page(SearchPage),
    /// The credential used for the call has no request budget left.
    QuotaExhausted,
    /// Any non-quota failure; the caller decides whether to continue.
    Failed(SearchFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedBody,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
        }
    }
}
