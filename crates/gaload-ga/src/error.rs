use thiserror::Error;

/// Errors returned by the Reporting API client.
#[derive(Debug, Error)]
pub enum GaError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service-account key file is missing, unreadable, or malformed.
    #[error("service account key error: {0}")]
    Key(String),

    /// The OAuth token exchange was rejected (bad key, revoked account).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The Reporting API rejected the query (unknown view id, bad
    /// dimension or metric name).
    #[error("Reporting API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A report row's value count disagrees with the column header.
    #[error("malformed report: {0}")]
    Shape(String),
}
