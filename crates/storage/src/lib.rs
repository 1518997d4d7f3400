pub mod backend;
pub mod error;
mod fingerprint;

pub use crate::backend::{EntryInfo, MetadataStore};
pub use crate::fingerprint::{Fingerprint, fingerprint};
use std::sync::Arc;

pub type StoreHandle = Arc<dyn MetadataStore + Send + Sync>;
