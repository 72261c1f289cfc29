//! Search client for the Elasticsearch-style backend.
//!
//! One request per alert tick: the rendered query is posted to
//! `/{index}/{type}/_search` and the response decoded into a
//! [`tocsin_common::SearchResult`].

pub mod client;
pub mod error;

pub use client::SearchClient;
pub use error::SearchError;
