//! Command implementations.
//!
//! Output goes to the writer handed in (stdout in the binary); anything meant
//! for a human goes through `tracing` to stderr.

mod cache;
mod preview;

use crate::cli::{CacheCommand, Command};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use unfurl_config::Config;
use unfurl_extract::{HttpOptions, HttpSource, SourceHandle};
use unfurl_preview::{Formatter, Resolver};
use unfurl_storage::backend::{LocalStore, ReadOnlyStore};
use unfurl_storage::{Fingerprint, MetadataStore, StoreHandle};

/// Everything a command needs, built once from configuration.
pub struct Services {
    pub store: StoreHandle,
    pub resolver: Resolver,
}
impl Services {
    pub fn new(store: StoreHandle, source: SourceHandle, formatter: Formatter, coalesce: bool) -> Self {
        let resolver = Resolver::new(store.clone(), source, formatter).with_coalescing(coalesce);
        Self { store, resolver }
    }

    /// `read_only` from the command line wins over `cache.read_only = false`.
    pub fn from_config(config: &Config, read_only: bool) -> Result<Self> {
        let local = LocalStore::new("local", &config.cache.directory).or_raise(|| ErrorKind::Store)?;
        let store: StoreHandle = if read_only || config.cache.read_only {
            Arc::new(ReadOnlyStore::new(Arc::new(local)))
        } else {
            Arc::new(local)
        };

        let source = HttpSource::new(HttpOptions {
            timeout: config.fetch.timeout(),
            user_agent: config.fetch.user_agent.clone(),
            max_bytes: config.fetch.max_bytes,
        })
        .or_raise(|| ErrorKind::Source)?;

        let formatter = match &config.preview.template {
            Some(path) => Formatter::from_file(path),
            None => Formatter::new(),
        }
        .or_raise(|| ErrorKind::Template)?;

        tracing::debug!(
            cache = %config.cache.directory.display(),
            store = store.name(),
            coalesce = config.preview.coalesce,
            "Services ready"
        );
        Ok(Self::new(store, Arc::new(source), formatter, config.preview.coalesce))
    }
}

/// Run a command. Previews that could only render the error fragment make the
/// command exit with status 2, so a build script can notice.
pub async fn execute(command: Command, services: &Services, out: &mut impl Write) -> Result<ExitCode> {
    match command {
        Command::Preview { urls } => {
            if preview::run(&services.resolver, &urls, out).await? > 0 {
                return Ok(ExitCode::from(2));
            }
        },
        Command::Fingerprint { urls } => fingerprint(&urls, out)?,
        Command::Cache(CacheCommand::List) => cache::list(services.store.as_ref(), out).await?,
        Command::Cache(CacheCommand::Show { target }) => cache::show(services.store.as_ref(), &target, out).await?,
        Command::Cache(CacheCommand::Forget { target }) => cache::forget(services.store.as_ref(), &target, out).await?,
    }
    Ok(ExitCode::SUCCESS)
}

pub fn fingerprint(urls: &[String], out: &mut impl Write) -> Result<()> {
    for url in urls {
        writeln!(out, "{}  {url}", Fingerprint::of(url)).or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}

/// A cache target given on the command line: either a fingerprint as printed
/// by `cache list`, or the URL it was made from.
fn target_key(target: &str) -> Fingerprint {
    target.parse().unwrap_or_else(|_| Fingerprint::of(target))
}
