mod coalesce;
mod domain;
pub mod error;
mod escape;
pub mod format;
pub mod resolve;
pub mod rules;
mod truncate;

pub use crate::domain::display_domain;
pub use crate::escape::escape_html;
pub use crate::format::{Fields, Formatter, error_fragment};
pub use crate::resolve::{Outcome, Resolver};
pub use crate::rules::Rules;
pub use crate::truncate::{ELLIPSIS, MAX_CHARS, truncate};
