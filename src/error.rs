use thiserror::Error;

/// Ways the collection fetch can fail. All of them are recovered by the
/// loader; none reach the render target.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API error: {status}")]
    Status { status: reqwest::StatusCode },
    #[error("invalid collection payload: {0}")]
    Parse(#[from] serde_json::Error),
}
