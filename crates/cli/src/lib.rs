//! clhi CLI Library
//!
//! This crate provides the terminal front end for clhi: argument parsing, the
//! crossterm console the interaction state machine talks to, theme colors and
//! session logging.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`console`]: Prompts, responses, the action menu and confirmations
//! - [`logging`]: The log file for a session
//!
//! # Examples
//!
//! ```bash
//! # Start a session
//! hi
//!
//! # Use another settings file and the bash history
//! hi -c ~/work/clhi.yml --history-path ~/.bash_history
//!
//! # Confirm commands but never run them, with debug logging
//! hi --dry-run -v
//! ```

pub mod cli_args;
pub mod console;
pub mod logging;
