//! Metadata Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Every kind here is a "fetch failure" as far as preview resolution is
//! concerned; the variants exist so logs say *why* a page had no metadata.

use derive_more::{Display, Error};

/// A metadata source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for metadata source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed (TLS backend, bad user agent).
    #[display("HTTP client configuration error")]
    Client,
    /// Connection, DNS, TLS, timeout or body transfer failure.
    #[display("network error")]
    Network,
    /// The server answered with a non-success status code.
    #[display("unexpected HTTP status: {_0}")]
    Status(#[error(not(source))] u16),
    /// The response isn't something metadata can be extracted from.
    #[display("unsupported content type: {_0}")]
    UnsupportedContent(#[error(not(source))] String),
    /// The source has no metadata for this URL.
    #[display("no metadata available for {_0}")]
    Unavailable(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network => true,
            Self::Status(status) => *status == 429 || *status >= 500,
            Self::Client | Self::UnsupportedContent(_) | Self::Unavailable(_) => false,
        }
    }
}
