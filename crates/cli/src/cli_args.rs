//! Command-line argument parsing.

use clap::Parser;

/// Command-line arguments for the `hi` terminal assistant.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use clhi_cli::cli_args::Args;
///
/// let args = Args::parse_from(["hi", "--dry-run"]);
/// assert!(args.dry_run);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the settings YAML file.
    ///
    /// If not provided, defaults to `~/.clhi/settings.yml`.
    #[arg(long, short = 'c')]
    pub settings_path: Option<String>,

    /// Path to the shell history file, overriding the settings file.
    ///
    /// If neither is set, defaults to `~/.zsh_history`.
    #[arg(long)]
    pub history_path: Option<String>,

    /// Confirm commands as usual but never execute them.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// Log more detail to the log file, repeat for more (`-v` debug, `-vv` trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_values() {
        let args = Args::parse_from(["hi"]);

        assert!(args.settings_path.is_none());
        assert!(args.history_path.is_none());
        assert!(!args.dry_run);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["hi", "-c", "/custom/settings.yml", "-d", "-vv"]);

        assert_eq!(args.settings_path, Some("/custom/settings.yml".to_string()));
        assert!(args.dry_run);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_long_flags() {
        let args = Args::parse_from([
            "hi",
            "--settings-path",
            "/custom/settings.yml",
            "--history-path",
            "/custom/.bash_history",
            "--dry-run",
            "--verbose",
        ]);

        assert_eq!(args.settings_path, Some("/custom/settings.yml".to_string()));
        assert_eq!(args.history_path, Some("/custom/.bash_history".to_string()));
        assert!(args.dry_run);
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_args_rejects_positional_question() {
        assert!(Args::try_parse_from(["hi", "list files"]).is_err());
    }
}
