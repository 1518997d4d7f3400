use super::target_key;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Write;
use unfurl_storage::MetadataStore;

pub async fn list(store: &dyn MetadataStore, out: &mut impl Write) -> Result<()> {
    let mut entries = store.list().await.or_raise(|| ErrorKind::Store)?;
    entries.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
    for entry in &entries {
        writeln!(out, "{}  {:>8}  {}", entry.fingerprint, entry.size, entry.modified).or_raise(|| ErrorKind::Output)?;
    }
    tracing::info!(store = store.name(), entries = entries.len(), "Listed cache");
    Ok(())
}

pub async fn show(store: &dyn MetadataStore, target: &str, out: &mut impl Write) -> Result<()> {
    let key = target_key(target);
    let document = match store.read(&key).await {
        Ok(document) => document,
        Err(err) if err.is_not_found() => exn::bail!(ErrorKind::NotCached(target.to_string())),
        Err(err) => return Err(err).or_raise(|| ErrorKind::Store),
    };
    let json = serde_json::to_string_pretty(&document).or_raise(|| ErrorKind::Output)?;
    writeln!(out, "{json}").or_raise(|| ErrorKind::Output)
}

pub async fn forget(store: &dyn MetadataStore, target: &str, out: &mut impl Write) -> Result<()> {
    let key = target_key(target);
    match store.delete(&key).await {
        Ok(()) => {},
        Err(err) if err.is_not_found() => exn::bail!(ErrorKind::NotCached(target.to_string())),
        Err(err) => return Err(err).or_raise(|| ErrorKind::Store),
    }
    writeln!(out, "{key}").or_raise(|| ErrorKind::Output)
}
