//! Preview Error Types
//!
//! Resolution itself never fails (errors are rendered into the fragment), so
//! the only errors here come from setting a [`Formatter`](crate::Formatter) up.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A preview error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for preview operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The fragment template doesn't compile.
    #[display("invalid preview template")]
    Template,
    /// A template file couldn't be read.
    #[display("could not read preview template: {}", _0.display())]
    TemplateFile(#[error(not(source))] PathBuf),
}
