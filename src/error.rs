// Error taxonomy for the DocumentExtractor API client.
//
// Every failing call surfaces one of these variants directly to the caller;
// the client performs no retries and no local recovery. Variants carry the
// operation name, resource id, and HTTP status where applicable so a failure
// can be diagnosed without inspecting the transport layer.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// HTTP 401: the API key was rejected.
    #[error("authentication failed: check your API key")]
    Authentication { details: Option<serde_json::Value> },

    /// HTTP 403: the API key is valid but not allowed to do this.
    #[error("access forbidden")]
    Forbidden { details: Option<serde_json::Value> },

    /// HTTP 404, or a local path that does not exist (uploads only).
    #[error("{resource} not found during {operation}: {id}")]
    NotFound {
        operation: &'static str,
        resource: &'static str,
        id: String,
        /// `Some(404)` when the server reported it, `None` for local paths.
        status: Option<u16>,
    },

    /// Any other non-2xx response from the API.
    #[error("API error during {operation} (status {status}): {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// A response body that does not match the expected schema, or a request
    /// payload that failed validation before being sent.
    #[error("validation failed during {operation}: {detail}")]
    Validation {
        operation: &'static str,
        detail: String,
    },

    /// Client-side precondition failure; raised before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection, TLS, or timeout failure from the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local I/O failure other than a missing file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Missing or malformed client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status associated with this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { .. } => Some(401),
            Error::Forbidden { .. } => Some(403),
            Error::NotFound { status, .. } => *status,
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Map a non-2xx response to an error variant.
///
/// The server sends JSON bodies with either a `detail` field (4xx request
/// problems) or an `error` field (5xx); plain-text bodies are passed through
/// as-is. 404 is always reported against the resource the operation targeted.
pub(crate) fn from_response(
    operation: &'static str,
    resource: &'static str,
    id: &str,
    status: StatusCode,
    body: &str,
) -> Error {
    let details: Option<serde_json::Value> = serde_json::from_str(body).ok();

    match status.as_u16() {
        401 => Error::Authentication { details },
        403 => Error::Forbidden { details },
        404 => Error::NotFound {
            operation,
            resource,
            id: id.to_string(),
            status: Some(404),
        },
        code => {
            let message = details
                .as_ref()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("error"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    if body.is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("unknown error")
                            .to_string()
                    } else {
                        body.to_string()
                    }
                });
            Error::Api {
                operation,
                status: code,
                message,
                details,
            }
        }
    }
}
