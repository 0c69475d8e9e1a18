use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use super::handlers::CliError;

/// Environment variable holding the log filter (EnvFilter syntax)
pub const LOG_ENV: &str = "STACKPICK_LOG";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. The form owns the terminal, so it only
/// logs when given a file; subcommands log warnings to stderr.
pub fn init(log_file: Option<&Path>, interactive: bool) -> Result<(), CliError> {
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::LogFile {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("debug"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .try_init();
        }
        None if interactive => {}
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter("warn"))
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
        }
    }
    Ok(())
}
