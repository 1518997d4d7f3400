use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use futures::future::join_all;
use std::io::Write;
use unfurl_preview::Resolver;

/// Resolve every URL concurrently and print the fragments in argument order.
///
/// A URL whose metadata couldn't be fetched still prints its error fragment;
/// the number of such URLs is returned.
pub async fn run(resolver: &Resolver, urls: &[String], out: &mut impl Write) -> Result<usize> {
    let outcomes = join_all(urls.iter().map(|url| resolver.resolve_outcome(url))).await;
    let mut failed = 0;
    for (url, outcome) in urls.iter().zip(&outcomes) {
        if outcome.is_failed() {
            tracing::error!(%url, "No metadata available");
            failed += 1;
        }
        writeln!(out, "{}", outcome.html()).or_raise(|| ErrorKind::Output)?;
    }
    tracing::info!(total = urls.len(), failed, "Previews generated");
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use unfurl_extract::MockSource;
    use unfurl_extract::models::{General, MetadataDocument};
    use unfurl_preview::{Formatter, error_fragment};
    use unfurl_storage::backend::MemoryStore;

    fn titled(title: &str) -> MetadataDocument {
        MetadataDocument {
            general: Some(General { title: Some(title.to_string()), ..Default::default() }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fragments_in_argument_order() {
        let source = MockSource::with_documents([
            ("https://a.example/", titled("First")),
            ("https://b.example/", titled("Second")),
        ]);
        let resolver = Resolver::new(Arc::new(MemoryStore::default()), Arc::new(source), Formatter::new().unwrap());
        let urls = vec!["https://b.example/".to_string(), "https://a.example/".to_string()];

        let mut out = Vec::new();
        assert_eq!(run(&resolver, &urls, &mut out).await.unwrap(), 0);

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Second"));
        assert!(lines[1].contains("First"));
    }

    #[tokio::test]
    async fn test_failed_fetch_prints_error_fragment_and_fails() {
        let resolver =
            Resolver::new(Arc::new(MemoryStore::default()), Arc::new(MockSource::failing()), Formatter::new().unwrap());
        let urls = vec!["https://down.example/".to_string()];

        let mut out = Vec::new();
        assert_eq!(run(&resolver, &urls, &mut out).await.unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", error_fragment("https://down.example/")));
    }
}
