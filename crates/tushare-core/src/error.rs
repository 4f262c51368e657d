//! Error types for Tushare operations.
//!
//! This module defines [`TushareError`] which covers every hard failure a query
//! can end in. Soft degradations in the post-processing layer (missing
//! adjustment factors, unparsable cells, short series) are logged, never
//! returned as errors.

use std::fmt;

use thiserror::Error;

/// Stage of the HTTP exchange at which a transport failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportStage {
    /// Serializing the request envelope.
    EncodeRequest,
    /// Building the underlying HTTP client.
    BuildClient,
    /// Sending the request and waiting for the response head.
    Send,
    /// The server answered with a non-success HTTP status.
    Status,
    /// Reading the response body.
    ReadBody,
}

impl fmt::Display for TransportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::EncodeRequest => "failed to marshal request params",
            Self::BuildClient => "failed to create request",
            Self::Send => "failed to send request",
            Self::Status => "unexpected http status",
            Self::ReadBody => "failed to read response body",
        };
        f.write_str(stage)
    }
}

/// Errors that can occur while querying the Tushare API.
#[derive(Error, Debug)]
pub enum TushareError {
    /// No credential token is configured.
    #[error("invalid token: no credential token configured")]
    Auth,

    /// The HTTP exchange failed before a response envelope could be read.
    #[error("{stage}: {message}")]
    Transport {
        /// Where in the exchange the failure happened.
        stage: TransportStage,
        /// Whether the configured timeout expired.
        timed_out: bool,
        /// Message of the underlying transport error.
        message: String,
    },

    /// The response body does not match the wire schema.
    #[error("failed to unmarshal response data: {0}")]
    Decode(String),

    /// The remote endpoint reported a failure.
    #[error("API error (code: {code}): {message}")]
    Api {
        /// Status code reported by the endpoint.
        code: i64,
        /// Message reported by the endpoint, verbatim.
        message: String,
    },

    /// An invalid parameter, selector or endpoint name was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Converting a table into JSON, CSV or a DataFrame failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TushareError {
    /// Creates a transport error for the given stage.
    #[must_use]
    pub fn transport(stage: TransportStage, message: impl Into<String>) -> Self {
        Self::Transport {
            stage,
            timed_out: false,
            message: message.into(),
        }
    }

    /// Creates a transport error caused by the request timeout expiring.
    #[must_use]
    pub fn timeout(stage: TransportStage, message: impl Into<String>) -> Self {
        Self::Transport {
            stage,
            timed_out: true,
            message: message.into(),
        }
    }

    /// Returns true if this error is a transport timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                timed_out: true,
                ..
            }
        )
    }

    /// Returns the API status code if the remote endpoint reported the failure.
    #[must_use]
    pub const fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TushareError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<csv::Error> for TushareError {
    fn from(e: csv::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias using [`TushareError`].
pub type Result<T> = std::result::Result<T, TushareError>;
