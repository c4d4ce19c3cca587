use reqwest::Method;
use thiserror::Error;

/// Failures of a single HTTP exchange with the Toggl API.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The exchange never completed (DNS, connect, timeout, broken body stream).
    #[error("the {method} request against {url} could not be completed: {source}")]
    Transport {
        method: Method,
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The service answered with a non-2xx status.
    #[error("the {method} request against {url} failed ({status_line}): {body}")]
    Api {
        method: Method,
        url: String,
        status: u16,
        status_line: String,
        body: String,
    },

    #[error("failed to build the HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport { .. })
    }
}

/// Errors returned by the repositories. Each variant carries the label of the
/// operation that failed, e.g. `failed to retrieve projects`.
#[derive(Debug, Error)]
pub enum TogglError {
    #[error("{operation}: {source}")]
    Request {
        operation: &'static str,
        source: RequestError,
    },

    #[error("{operation}: {source}")]
    Serialization {
        operation: &'static str,
        source: serde_json::Error,
    },

    #[error("{operation}: {source}")]
    Deserialization {
        operation: &'static str,
        source: serde_json::Error,
    },
}

impl TogglError {
    pub fn operation(&self) -> &'static str {
        match self {
            TogglError::Request { operation, .. }
            | TogglError::Serialization { operation, .. }
            | TogglError::Deserialization { operation, .. } => operation,
        }
    }

    /// HTTP status of the failed exchange, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TogglError::Request { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_deserialization(&self) -> bool {
        matches!(self, TogglError::Deserialization { .. })
    }
}
