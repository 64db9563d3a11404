//! The error the session can return, split into two tiers.
//!
//! A failed read leaves the caller without the data the rest of its work
//! depends on; a rejected upload leaves everything already fetched intact.
//! [`ApiError::is_fatal`] exposes the tier.

use reqwest::StatusCode;
use thiserror::Error;

/// Session errors.
///
/// Every variant except [`Upload`] is fatal tier: the session never exits
/// the process, but callers normally cannot proceed past these and are
/// expected to stop. [`Upload`] is recoverable tier: the rejected upload is
/// logged and returned, and the caller decides what happens next.
///
/// [`Upload`]: ApiError::Upload
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API token failed validation at session construction.
    #[error("invalid api token: {0}")]
    InvalidToken(String),
    /// The configured base URL is not a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Transport-level failure, including response bodies that do not
    /// decode into the expected shape.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A read endpoint answered with something other than its success code.
    #[error("{endpoint} request returned {status}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
    },
    /// The transactions endpoint rejected an upload (anything but 201).
    #[error("transaction upload failed: {status}")]
    Upload { status: StatusCode, body: String },
}

impl ApiError {
    /// Whether callers can reasonably continue after this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ApiError::Upload { .. })
    }
}
