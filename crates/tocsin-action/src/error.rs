/// Errors from decoding or performing an action. Any of them aborts the
/// remaining actions of the current tick.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The `type` discriminator named no known action.
    #[error("unknown action type: {0:?}")]
    UnknownType(String),

    /// The action mapping did not decode into the variant's fields.
    #[error("invalid action definition: {0}")]
    Decode(#[from] serde_json::Error),

    /// A variant needing an API key ran without one configured.
    #[error("{service} api key not set in config")]
    MissingCredential { service: &'static str },

    /// A required field was left empty.
    #[error("missing required field {0:?}")]
    MissingField(&'static str),

    /// The configured HTTP method did not parse.
    #[error("invalid http method {0:?}")]
    InvalidMethod(String),

    /// The webhook endpoint answered outside 2xx.
    #[error("non-2xx response code returned: {0}")]
    BadStatus(u16),

    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}
