use thiserror::Error;

use crate::toggl::HttpMethod;

#[derive(Debug, Error)]
pub enum TogglError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to marshal request: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to create request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// Any response status other than 200. `body` is the raw response text.
    #[error("status code: {status}, body: {body}")]
    Remote { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Wraps a failure from a typed endpoint with the request that was attempted.
    #[error("failed call [{method}] {url}: {source}")]
    Call {
        method: HttpMethod,
        url: String,
        source: Box<TogglError>,
    },
}

impl TogglError {
    /// The underlying failure with every `Call` annotation peeled off.
    pub fn root(&self) -> &TogglError {
        let mut current = self;
        while let TogglError::Call { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn status(&self) -> Option<u16> {
        match self.root() {
            TogglError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.root(),
            TogglError::Cancelled | TogglError::DeadlineExceeded
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
