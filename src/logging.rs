//! Logging setup
//!
//! One-shot modes log to stderr. The terminal UI owns stdout and stderr, so
//! interactive sessions log to `quakeview.log` in the project data directory.

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file name used by interactive sessions
pub const LOG_FILE_NAME: &str = "quakeview.log";

/// Picks the filter from verbosity flags; `RUST_LOG` wins when set
fn env_filter(debug: bool, verbose: bool) -> EnvFilter {
    let default = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize logging to stderr
pub fn init_stderr_logging(debug: bool, verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug)
        .init();

    debug!("Logging initialized");
}

/// Directory holding the log file, e.g. `~/.local/share/quakeview/` on Linux
///
/// Returns `None` if no home directory can be determined.
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "quakeview").map(|dirs| dirs.data_local_dir().to_path_buf())
}

/// Initialize logging to the log file
///
/// Returns the appender guard, which must be held until exit so buffered
/// lines are flushed. Returns `None` (logging disabled) if the log directory
/// cannot be determined or created.
pub fn init_file_logging(debug: bool, verbose: bool) -> Option<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug, verbose))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    debug!(path = %dir.join(LOG_FILE_NAME).display(), "Logging initialized");
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_contains_project_name() {
        if let Some(dir) = log_dir() {
            assert!(dir.to_string_lossy().contains("quakeview"));
        }
        // Passes if there is no home directory (e.g. in CI)
    }
}
