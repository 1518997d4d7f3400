//! Log subscriber setup.

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Level picked by the global `-v`/`-q` flags: warnings by default, errors
/// only when quiet, and each `-v` one step chattier.
pub fn level(cli: &Cli) -> Level {
    if cli.quiet {
        return Level::ERROR;
    }
    match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Logs go to stderr so fragments printed on
/// stdout can be piped straight into a page.
pub fn init(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).or_raise(|| ErrorKind::Logging)
}
