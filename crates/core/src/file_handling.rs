//! Settings file handling for clhi.
//!
//! Reads the YAML settings file. A missing file is not an error, the session
//! simply runs with the defaults from [`crate::config`].

use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::config::Settings;
use crate::error::{Error, Result};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

/// Loads settings from the YAML file at `settings_path`.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file contains invalid YAML
/// - The YAML doesn't match the expected structure
///
/// # Examples
///
/// ```no_run
/// use clhi_core::file_handling::get_settings;
///
/// let settings = get_settings("~/.clhi/settings.yml")?;
/// println!("Retrieving {} documents per question", settings.retrieval.top_k());
/// # Ok::<(), clhi_core::error::Error>(())
/// ```
pub fn get_settings(settings_path: &str) -> Result<Settings> {
    let settings_path = shellexpand::tilde(settings_path).to_string();

    if !Path::exists(Path::new(&settings_path)) {
        debug!("No settings file at `{settings_path}`, using defaults");
        return Ok(Settings::default());
    }

    let mut contents = String::new();
    get_reader("settings", &settings_path)?
        .read_to_string(&mut contents)
        .map_err(|e| Error::io_error("settings".to_string(), settings_path.clone(), e))?;

    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "settings".to_string(),
            settings_path.clone(),
            e,
        )
    })
}

/// Opens the session log file for appending, creating it and its parent
/// directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn open_log_file(log_path: &str) -> Result<File> {
    let io_error = |e: std::io::Error| Error::io_error("log".to_string(), log_path.to_string(), e);

    if let Some(parent) = Path::new(log_path).parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(io_error)
}
