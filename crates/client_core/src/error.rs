use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}: {error}")]
    Status {
        url: String,
        status: u16,
        error: ApiError,
    },
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// True when the server answered with a non-success status, as opposed to the
    /// request or its response body failing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Status { .. })
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Status { error, .. } => Some(error.code),
            _ => None,
        }
    }
}
