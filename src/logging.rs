//! Log setup shared by the binaries.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Logs go to stderr, filtered by `RUST_LOG` (default `info`), so that stdout
/// only carries report output. If `debug_log_path` is given, everything at
/// `DEBUG` and above is also appended to that file.
///
/// # Errors
/// Returns an error if the debug log file cannot be opened.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
pub fn setup_logging(debug_log_path: Option<&Path>) -> Result<(), std::io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let debug_log = match debug_log_path {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}
