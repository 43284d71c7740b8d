use thiserror::Error;

/// Errors returned while retrieving data from Reddit.
///
/// Every variant is a retrieval failure: search and listing streams stop at
/// the first one and hand it to the caller unchanged.
#[derive(Debug, Error)]
pub enum RedditError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reddit answered with a non-success status.
    #[error("Reddit {context} failed with status {status}")]
    Status { status: u16, context: String },

    /// HTTP 429. `retry_after_secs` is Reddit's `Retry-After` hint, if sent.
    #[error("Reddit {context} was rate limited")]
    RateLimited {
        context: String,
        retry_after_secs: Option<u64>,
    },

    /// Client-credentials token exchange failed.
    #[error("Reddit auth error: {0}")]
    Auth(String),

    /// The response body did not have the expected listing shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
