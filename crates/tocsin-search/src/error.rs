/// Errors surfaced by the search step. All of them abort the current tick;
/// the next scheduled tick is the retry.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Elasticsearch reported `timed_out: true` on an otherwise-OK response.
    #[error("search timed out in elasticsearch")]
    Timeout,

    /// Non-200 response carrying a `reason` field.
    #[error("search rejected: {0}")]
    Rejected(String),

    /// Transport-level failure talking to the backend.
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not decode as expected.
    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Best-effort detection of a missing index. The backend only tells us
    /// through the rejection reason string, so this is a substring match
    /// covering both the 1.x exception name and the current error code.
    pub fn is_index_missing(&self) -> bool {
        match self {
            SearchError::Rejected(reason) => {
                reason.contains("IndexMissing") || reason.contains("index_not_found")
            }
            _ => false,
        }
    }
}
