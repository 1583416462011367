//! Session logging.
//!
//! The terminal belongs to the conversation, so log records go to the log
//! file from the settings instead of stderr.

use clhi_core::error::Result;
use clhi_core::file_handling::open_log_file;
use env_logger::{Builder, Env, Target};
use log::{info, LevelFilter};

const DEFAULT_FILTER: &str = "info";

/// The level forced by `-v` flags, if any. Without flags `RUST_LOG` decides.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Handle to the logger installed for one session.
pub struct SessionLog {
    path: String,
}

impl SessionLog {
    /// Installs the global logger, writing to `log_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened.
    pub fn init(log_path: &str, verbose: u8) -> Result<Self> {
        let file = open_log_file(log_path)?;

        let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
        if let Some(level) = level_for_verbosity(verbose) {
            builder.filter_level(level);
        }
        builder.target(Target::Pipe(Box::new(file))).init();

        info!("Session started");
        Ok(Self {
            path: log_path.to_string(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Flushes buffered records at the end of the session.
    pub fn finish(self) {
        info!("Session finished");
        log::logger().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), None);
        assert_eq!(level_for_verbosity(1), Some(LevelFilter::Debug));
        assert_eq!(level_for_verbosity(3), Some(LevelFilter::Trace));
    }
}
