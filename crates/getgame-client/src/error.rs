//! Error types for client operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced an HTTP response.
    Transport,
    /// The server answered with a non-2xx status.
    Server,
    /// The response body did not have the expected shape.
    Payload,
    /// The caller asked for something the client refuses to send.
    Request,
}

/// Primary error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client")]
    Build {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Request identifier contained characters not allowed in a header.
    #[error("request identifier contains invalid characters")]
    RequestId,
    /// Endpoint path could not be joined onto the API base.
    #[error("invalid endpoint path '{path}'")]
    Endpoint {
        /// Relative path that failed to join.
        path: String,
        /// Underlying URL parse error.
        #[source]
        source: url::ParseError,
    },
    /// Network-level failure before a response arrived.
    #[error("request to {endpoint} failed")]
    Transport {
        /// Endpoint path being called.
        endpoint: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Server responded with a non-success status.
    #[error("{endpoint} responded with status {status}")]
    Status {
        /// Endpoint path being called.
        endpoint: String,
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Error message extracted from the response body, when present.
        message: Option<String>,
    },
    /// Response body could not be decoded.
    #[error("unexpected payload from {endpoint}")]
    Decode {
        /// Endpoint path being called.
        endpoint: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// Response decoded but lacked a field the caller depends on.
    #[error("{endpoint} returned an incomplete payload: {reason}")]
    Malformed {
        /// Endpoint path being called.
        endpoint: String,
        /// Machine-readable reason for the rejection.
        reason: &'static str,
    },
    /// Page number outside the navigable range.
    #[error("page {requested} is outside 1..={total_pages}")]
    PageOutOfRange {
        /// Page the caller asked for.
        requested: u32,
        /// Highest page currently known.
        total_pages: u32,
    },
}

impl ClientError {
    /// Classify the failure into the transport / server / payload buckets.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Server,
            Self::Decode { .. } | Self::Malformed { .. } => FailureKind::Payload,
            Self::Build { .. }
            | Self::RequestId
            | Self::Endpoint { .. }
            | Self::PageOutOfRange { .. } => FailureKind::Request,
        }
    }

    /// HTTP status for server failures.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-provided message when the server explained the failure.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::Error as _;

    #[test]
    fn client_error_classifies_failures() {
        let status = ClientError::Status {
            endpoint: "user/games/".into(),
            status: StatusCode::NOT_FOUND,
            message: Some("No games found in your Steam library.".into()),
        };
        assert_eq!(status.kind(), FailureKind::Server);
        assert_eq!(status.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            status.server_message(),
            Some("No games found in your Steam library.")
        );
        assert_eq!(
            status.to_string(),
            "user/games/ responded with status 404 Not Found"
        );

        let decode = ClientError::Decode {
            endpoint: "csrf/".into(),
            source: serde_json::Error::custom("bad"),
        };
        assert_eq!(decode.kind(), FailureKind::Payload);
        assert!(decode.status().is_none());

        let malformed = ClientError::Malformed {
            endpoint: "steam/callback/".into(),
            reason: "missing identity",
        };
        assert_eq!(malformed.kind(), FailureKind::Payload);

        let range = ClientError::PageOutOfRange {
            requested: 4,
            total_pages: 3,
        };
        assert_eq!(range.kind(), FailureKind::Request);
        assert_eq!(range.to_string(), "page 4 is outside 1..=3");
    }
}
