//! Layered configuration for unfurl.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults,
//! 2. `config.toml` in the platform configuration directory
//!    (`~/.config/unfurl/config.toml` on Linux),
//! 3. a file given explicitly (TOML, YAML or JSON, by extension),
//! 4. `UNFURL_` environment variables, with `__` separating nested keys
//!    (`UNFURL_CACHE__DIRECTORY`, `UNFURL_FETCH__TIMEOUT_SECS`).
//!
//! ```toml
//! [cache]
//! directory = "_links"
//! read_only = false
//!
//! [fetch]
//! timeout_secs = 30
//! user_agent = "my-site-builder/1.0"
//! max_bytes = 2097152
//!
//! [preview]
//! template = "templates/link-preview.html"
//! coalesce = true
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "UNFURL_";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "unfurl")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one JSON file per cached URL. Relative paths are
    /// resolved against the working directory.
    pub directory: PathBuf,
    /// Never write to (or delete from) the cache.
    pub read_only: bool,
}
impl Default for CacheConfig {
    fn default() -> Self {
        let directory = project_dirs()
            .map(|dirs| dirs.cache_dir().join("previews"))
            .unwrap_or_else(|| PathBuf::from(".unfurl-cache"));
        Self { directory, read_only: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds; `0` waits indefinitely.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Bytes of each page read before the rest is ignored.
    pub max_bytes: usize,
}
impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("unfurl/", env!("CARGO_PKG_VERSION")).to_string(),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Custom fragment template; the built-in one is used when unset.
    pub template: Option<PathBuf>,
    /// Let concurrent resolutions of one URL share a single fetch.
    pub coalesce: bool,
}
impl Default for PreviewConfig {
    fn default() -> Self {
        Self { template: None, coalesce: true }
    }
}

impl Config {
    /// Path of the per-user configuration file, whether or not it exists.
    pub fn user_config_file() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from every source, with `explicit` as the optional
    /// file given on the command line.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(Self::user_config_file().as_deref(), explicit)
    }

    /// [`load`](Self::load) with the user configuration file chosen by the
    /// caller.
    pub fn load_with(user_file: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(user_file, explicit)?;
        let mut config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        let cwd = std::env::current_dir().or_raise(|| ErrorKind::Directory)?;
        config.resolve_relative_paths(&cwd);
        tracing::debug!(cache = %config.cache.directory.display(), "Configuration loaded");
        Ok(config)
    }

    /// The merged providers, before extraction.
    pub fn figment(user_file: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = user_file {
            // Missing is fine: most users never create one.
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::MissingFile(path.to_path_buf()));
            }
            let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        if self.cache.directory.is_relative() {
            self.cache.directory = base.join(&self.cache.directory);
        }
        if let Some(template) = &self.preview.template
            && template.is_relative()
        {
            self.preview.template = Some(base.join(template));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.cache.read_only);
        assert_eq!(config.fetch.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.fetch.max_bytes, 2 * 1024 * 1024);
        assert!(config.fetch.user_agent.starts_with("unfurl/"));
        assert!(config.preview.coalesce);
        assert!(config.preview.template.is_none());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let fetch = FetchConfig { timeout_secs: 0, ..Default::default() };
        assert_eq!(fetch.timeout(), None);
    }

    #[test]
    fn test_layering() {
        Jail::expect_with(|jail| {
            jail.create_file("user.toml", "[cache]\ndirectory = \"/srv/user\"\n[fetch]\ntimeout_secs = 10\n")?;
            jail.create_file("site.toml", "[fetch]\ntimeout_secs = 20\nuser_agent = \"site\"\n")?;
            jail.set_env("UNFURL_FETCH__USER_AGENT", "from-env");
            jail.set_env("UNFURL_PREVIEW__COALESCE", "false");

            let config = Config::load_with(Some(Path::new("user.toml")), Some(Path::new("site.toml"))).unwrap();
            assert_eq!(config.cache.directory, PathBuf::from("/srv/user"));
            assert_eq!(config.fetch.timeout_secs, 20);
            assert_eq!(config.fetch.user_agent, "from-env");
            assert!(!config.preview.coalesce);
            // Untouched keys keep their defaults.
            assert_eq!(config.fetch.max_bytes, FetchConfig::default().max_bytes);
            Ok(())
        });
    }

    #[test]
    fn test_missing_user_file_is_ignored() {
        Jail::expect_with(|_jail| {
            let config = Config::load_with(Some(Path::new("nope.toml")), None).unwrap();
            assert_eq!(config.fetch, FetchConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_relative_paths_resolve_against_working_directory() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "site.toml",
                "[cache]\ndirectory = \"_links\"\n[preview]\ntemplate = \"t/preview.html\"\n",
            )?;
            let cwd = std::env::current_dir().unwrap();
            let config = Config::load_with(None, Some(Path::new("site.toml"))).unwrap();
            assert_eq!(config.cache.directory, cwd.join("_links"));
            assert_eq!(config.preview.template, Some(cwd.join("t/preview.html")));
            Ok(())
        });
    }

    #[rstest]
    #[case("site.yaml", "cache:\n  read_only: true\n")]
    #[case("site.yml", "cache:\n  read_only: true\n")]
    #[case("site.json", r#"{"cache": {"read_only": true}}"#)]
    #[case("site.TOML", "[cache]\nread_only = true\n")]
    fn test_explicit_formats(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        let config: Config = Config::figment(None, Some(&path)).unwrap().extract().unwrap();
        assert!(config.cache.read_only);
    }

    #[test]
    fn test_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::figment(None, Some(&dir.path().join("missing.toml"))).err().unwrap();
        assert!(matches!(&*err, ErrorKind::MissingFile(_)));

        let ini = dir.path().join("site.ini");
        std::fs::write(&ini, "[cache]").unwrap();
        let err = Config::figment(None, Some(&ini)).err().unwrap();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_invalid_values() {
        Jail::expect_with(|jail| {
            jail.create_file("site.toml", "[fetch]\ntimeout_secs = \"soon\"\n")?;
            let err = Config::load_with(None, Some(Path::new("site.toml"))).err().unwrap();
            assert_eq!(*err, ErrorKind::Load);
            Ok(())
        });
    }
}
