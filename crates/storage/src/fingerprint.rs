//! Stable cache keys derived from URLs.

use crate::error::{Error, ErrorKind};
use derive_more::Display;
use std::str::FromStr;

const HEX_LEN: usize = blake3::OUT_LEN * 2;

/// Hex-encoded BLAKE3 digest of a URL's exact bytes.
///
/// The URL is never normalized: `https://a.com` and `https://a.com/` are
/// different keys. A fingerprint is only ever compared and used as a file
/// name, never decoded back into a URL.
///
/// # Examples
///
/// ```
/// use unfurl_storage::Fingerprint;
///
/// let key = Fingerprint::of("https://example.com/");
/// assert_eq!(key.as_str().len(), 64);
/// assert_eq!(key, key.as_str().parse().unwrap());
/// // Keys are always 64 lowercase hex characters, nothing else parses.
/// assert!("../../etc/passwd".parse::<Fingerprint>().is_err());
/// ```
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{_0}")]
pub struct Fingerprint(String);
impl Fingerprint {
    pub fn of(url: &str) -> Self {
        Self(blake3::hash(url.as_bytes()).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl FromStr for Fingerprint {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::from(ErrorKind::InvalidKey(s.to_string())))
        }
    }
}
impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`Fingerprint::of`].
pub fn fingerprint(url: &str) -> Fingerprint {
    Fingerprint::of(url)
}
