use crate::error::SearchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tocsin_common::SearchResult;

#[derive(Debug, Deserialize)]
struct Rejection {
    reason: String,
}

/// Stateless client for the search backend. Cheap to clone and safe to
/// share across concurrently running ticks.
#[derive(Debug, Clone)]
pub struct SearchClient {
    addr: String,
    http: reqwest::Client,
}

impl SearchClient {
    /// `addr` is a bare `host:port`, e.g. `127.0.0.1:9200`.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Runs one search. The query must serialize into a valid request-body
    /// query for the backend.
    pub async fn search(
        &self,
        index: &str,
        doc_type: &str,
        query: &Value,
    ) -> Result<SearchResult, SearchError> {
        let url = format!("http://{}/{}/{}/_search", self.addr, index, doc_type);

        let resp = self
            .http
            .request(Method::GET, &url)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(query)?)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(status = %status, body = %body, "search response");

        if status != StatusCode::OK {
            let rejection: Rejection = serde_json::from_str(&body)?;
            return Err(SearchError::Rejected(rejection.reason));
        }

        let result: SearchResult = serde_json::from_str(&body)?;
        if result.timed_out {
            return Err(SearchError::Timeout);
        }
        Ok(result)
    }
}
