//! Settings and path utilities for clhi.
//!
//! Settings are read from a YAML file (see [`crate::file_handling`]). Every
//! field is optional; the accessors on each section fall back to the defaults
//! defined here, then to the environment where that makes sense.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default path for the settings file
const DEFAULT_SETTINGS_PATH: &str = "~/.clhi/settings.yml";
/// Default path for the session log
const DEFAULT_LOG_PATH: &str = "~/.clhi/logging.txt";
/// Default shell history store (zsh extended history format)
const DEFAULT_HISTORY_PATH: &str = "~/.zsh_history";

/// Default shell to use for command execution
pub const DEFAULT_SHELL: &str = "/bin/bash";
pub const DEFAULT_EDITOR: &str = "vi";

pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_HISTORY_MAX_RESULTS: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_INDEX_NAME: &str = "workspace.default.man_7_info_index";
const DEFAULT_COMMAND_COLUMN: &str = "Command";
const DEFAULT_SUMMARY_COLUMN: &str = "Summary";
const DEFAULT_GENERATION_ENDPOINT: &str = "databricks-dbrx-instruct";

pub const HOST_ENV: &str = "DATABRICKS_HOST";
pub const TOKEN_ENV: &str = "DATABRICKS_TOKEN";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RetrievalSettings {
    pub host: Option<String>,
    pub index_name: Option<String>,
    pub command_column: Option<String>,
    pub summary_column: Option<String>,
    pub top_k: Option<usize>,
}

impl RetrievalSettings {
    #[must_use]
    pub fn index_name(&self) -> &str {
        self.index_name.as_deref().unwrap_or(DEFAULT_INDEX_NAME)
    }

    #[must_use]
    pub fn command_column(&self) -> &str {
        self.command_column
            .as_deref()
            .unwrap_or(DEFAULT_COMMAND_COLUMN)
    }

    #[must_use]
    pub fn summary_column(&self) -> &str {
        self.summary_column
            .as_deref()
            .unwrap_or(DEFAULT_SUMMARY_COLUMN)
    }

    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k.unwrap_or(DEFAULT_TOP_K)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GenerationSettings {
    pub host: Option<String>,
    pub endpoint: Option<String>,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GENERATION_ENDPOINT)
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct HistorySettings {
    pub path: Option<String>,
    pub max_results: Option<usize>,
}

impl HistorySettings {
    #[must_use]
    pub fn path(&self) -> String {
        shellexpand::tilde(self.path.as_deref().unwrap_or(DEFAULT_HISTORY_PATH)).to_string()
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results.unwrap_or(DEFAULT_HISTORY_MAX_RESULTS)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ColorDefinition {
    pub rgb: Option<(u8, u8, u8)>,
    pub ansi: Option<u8>,
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ThemeDefinition {
    pub prompt: Option<ColorDefinition>,
    pub response: Option<ColorDefinition>,
    pub command: Option<ColorDefinition>,
    pub error: Option<ColorDefinition>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub theme: ThemeDefinition,
    pub timeout_secs: Option<u64>,
    pub shell: Option<String>,
    pub editor: Option<String>,
    pub log_file: Option<String>,
}

impl Settings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// The shell commands are run with: settings, then `$SHELL`, then [`DEFAULT_SHELL`].
    #[must_use]
    pub fn shell(&self) -> String {
        self.shell
            .clone()
            .or_else(|| env::var("SHELL").ok())
            .unwrap_or_else(|| DEFAULT_SHELL.to_string())
    }

    /// The editor program: settings, then `$VISUAL`, `$EDITOR`, then [`DEFAULT_EDITOR`].
    #[must_use]
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| env::var("VISUAL").ok())
            .or_else(|| env::var("EDITOR").ok())
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }

    #[must_use]
    pub fn log_path(&self) -> String {
        shellexpand::tilde(self.log_file.as_deref().unwrap_or(DEFAULT_LOG_PATH)).to_string()
    }
}

/// Resolves the settings file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// settings path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use clhi_core::config::get_settings_path;
///
/// let custom_path = get_settings_path(&Some("/path/to/settings.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/settings.yml");
/// ```
pub fn get_settings_path(settings_path_arg: &Option<String>) -> String {
    let settings_path = match settings_path_arg {
        Some(settings_path) => settings_path,
        None => DEFAULT_SETTINGS_PATH,
    };

    shellexpand::tilde(settings_path).to_string()
}

/// Resolves a service host from the settings value or `DATABRICKS_HOST`.
///
/// A missing scheme defaults to `https://` and trailing slashes are removed.
///
/// # Errors
///
/// Returns [`Error::MissingHost`] if neither source provides a host.
pub fn resolve_host(configured: &Option<String>, service: &str) -> Result<String> {
    let host = configured
        .clone()
        .or_else(|| env::var(HOST_ENV).ok())
        .filter(|host| !host.trim().is_empty())
        .ok_or_else(|| Error::MissingHost(service.to_string(), HOST_ENV.to_string()))?;

    Ok(normalize_host(&host))
}

/// Reads the bearer token from `DATABRICKS_TOKEN`.
///
/// # Errors
///
/// Returns [`Error::MissingCredential`] if the variable is unset or empty.
pub fn resolve_token() -> Result<String> {
    env::var(TOKEN_ENV)
        .ok()
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| Error::MissingCredential(TOKEN_ENV.to_string()))
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_settings_path_with_custom_path() {
        let custom_path = Some("/custom/path/settings.yml".to_string());
        assert_eq!(get_settings_path(&custom_path), "/custom/path/settings.yml");
    }

    #[test]
    fn test_get_settings_path_with_none() {
        let result = get_settings_path(&None);
        // Should expand the tilde in the default path
        assert!(result.ends_with(".clhi/settings.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_defaults_without_settings() {
        let settings = Settings::default();

        assert_eq!(settings.retrieval.top_k(), DEFAULT_TOP_K);
        assert_eq!(settings.retrieval.index_name(), DEFAULT_INDEX_NAME);
        assert_eq!(settings.retrieval.command_column(), "Command");
        assert_eq!(settings.retrieval.summary_column(), "Summary");
        assert_eq!(settings.generation.max_tokens(), 4096);
        assert_eq!(settings.generation.endpoint(), "databricks-dbrx-instruct");
        assert_eq!(settings.history.max_results(), 5);
        assert_eq!(settings.timeout(), Duration::from_secs(60));
        assert!(settings.history.path().ends_with(".zsh_history"));
        assert!(!settings.log_path().starts_with('~'));
    }

    #[test]
    fn test_configured_values_win() {
        let settings = Settings {
            shell: Some("/bin/zsh".to_string()),
            editor: Some("nano".to_string()),
            timeout_secs: Some(5),
            ..Settings::default()
        };

        assert_eq!(settings.shell(), "/bin/zsh");
        assert_eq!(settings.editor(), "nano");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("adb-123.azuredatabricks.net/"),
            "https://adb-123.azuredatabricks.net"
        );
        assert_eq!(normalize_host("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_resolve_host_prefers_settings() {
        let host = resolve_host(&Some("example.cloud.databricks.com".to_string()), "retrieval")
            .unwrap();
        assert_eq!(host, "https://example.cloud.databricks.com");
    }
}
