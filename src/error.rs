//! error types
//!
//! structured errors for config, http, json, scheduling, and graphql responses.

use crate::graphql::ResponseError;
use std::fmt;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for transports and the client facade
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http status {status}: {body}")]
    Status {
        /// http status code
        status: u16,
        /// raw response body
        body: String,
    },

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("graphql error: {message}")]
    GraphQl {
        /// graphql error list
        errors: Vec<ResponseError>,
        /// top-level message
        message: String,
    },

    #[error("graphql response has no data")]
    MissingData,
}

impl Error {
    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Status { status: 401 | 403, .. })
            || matches!(
                self,
                Error::Http(err) if matches!(
                    err.status(),
                    Some(reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN)
                )
            )
    }

    /// true if the transport cannot perform the requested kind of operation
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
