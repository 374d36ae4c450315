use std::env;
use std::sync::Mutex;

use log::{Level, SetLoggerError};
use slog::Drain;

/// Initialises the logs mechanisms.
///
/// Records go to stderr so they never mix with the response on stdout.
/// `RUST_LOG`, when set to a valid level, wins over `default_level`.
pub(crate) fn init(default_level: Level) -> Result<impl Drop, SetLoggerError> {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = Mutex::new(drain).fuse();
    let logger = slog::Logger::root(
        drain,
        slog::o!(
            "version" => env!("CARGO_PKG_VERSION"),
        ),
    );

    let guard = slog_scope::set_global_logger(logger);

    let level = env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(default_level);
    slog_stdlog::init_with_level(level)?;

    Ok(guard)
}
