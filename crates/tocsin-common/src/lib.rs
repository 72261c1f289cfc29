//! Shared data model for the tocsin alerting daemon.
//!
//! The run context built for every alert tick lives here, together with
//! the search result model it carries. Both serialize into the dynamic
//! value domain (`serde_json::Value`) that templates and Lua scripts
//! consume.

pub mod types;

pub use types::{Hit, HitBlock, RunContext, SearchResult};
