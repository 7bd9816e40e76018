//! Command line plumbing: logging, error reporting and the run loop

mod run;
mod style;

pub use run::run;

use anstream::eprintln;
use backport::error::Error;
use owo_colors::OwoColorize;

/// Initialize logging to stderr
///
/// `RUST_LOG` overrides everything; otherwise `--verbose` turns on debug
/// logging for this crate.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "backport=debug"
    } else {
        "backport=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error the way users should see it
pub fn print_error(err: &Error) {
    match err {
        Error::Aborted => eprintln!("{}", "Aborted".dimmed()),
        other => eprintln!("{} {other}", "error:".red().bold()),
    }
}
