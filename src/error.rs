//! Command-line Error Types

use derive_more::{Display, Error};

/// A command error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not open the metadata cache")]
    Store,
    #[display("could not set up the HTTP client")]
    Source,
    #[display("could not load the preview template")]
    Template,
    #[display("nothing cached for {_0}")]
    NotCached(#[error(not(source))] String),
    #[display("could not write output")]
    Output,
    #[display("could not install the log subscriber")]
    Logging,
}
