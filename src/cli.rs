//! Command-line interface.
//!
//! ```bash
//! # Print a preview fragment per URL, fetching only what isn't cached yet
//! unfurl preview https://example.com/post https://www.rust-lang.org/
//!
//! # Inspect the cache
//! unfurl fingerprint https://example.com/post
//! unfurl cache list
//! unfurl cache show https://example.com/post
//! unfurl cache forget https://example.com/post
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "unfurl", version, about = "Cached link previews for static site builds")]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON), layered over the user config
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never write to the cache, even on a miss
    #[arg(long, global = true)]
    pub read_only: bool,

    /// More log output; repeat for more
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the preview fragment of each URL, one per line
    Preview {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },
    /// Print the cache key of each URL
    Fingerprint {
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },
    /// Inspect or prune cached metadata
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// List cached entries: fingerprint, size in bytes, last write
    List,
    /// Print the stored metadata of a URL (or fingerprint) as JSON
    Show {
        #[arg(value_name = "URL")]
        target: String,
    },
    /// Delete the cached metadata of a URL (or fingerprint)
    Forget {
        #[arg(value_name = "URL")]
        target: String,
    },
}
