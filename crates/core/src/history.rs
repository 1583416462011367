//! Correlation of retrieved commands with the user's own shell history.
//!
//! The history store uses the zsh extended history format, one entry per line:
//!
//! ```text
//! : 1718000000:0;tar -xzf archive.tar.gz -C /tmp/out
//! ```
//!
//! Reading never fails from the caller's point of view. A missing or
//! unreadable store correlates to nothing.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::DEFAULT_HISTORY_MAX_RESULTS;

const ENTRY_SEPARATOR: char = ';';

/// One parsed read of the history store, oldest line first.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    lines: Vec<String>,
}

impl HistorySnapshot {
    /// Splits raw store bytes into lines, dropping lines that are not valid
    /// UTF-8 (zsh writes metafied bytes for some characters).
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let lines = bytes
            .split(|b| *b == b'\n')
            .filter_map(|line| std::str::from_utf8(line).ok())
            .map(ToString::to_string)
            .collect();

        Self { lines }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finds previous invocations of `command`, most recent first.
    ///
    /// A line matches if it contains `command` followed by a space, so `ls`
    /// does not match `lsof`. Lines without an entry separator are skipped.
    #[must_use]
    pub fn correlate(&self, command: &str, max_results: usize) -> Vec<String> {
        let command = command.trim();
        if command.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let token = format!("{command} ");

        self.lines
            .iter()
            .rev()
            .filter(|line| line.contains(&token))
            .filter_map(|line| parse_entry(line))
            .take(max_results)
            .collect()
    }
}

fn parse_entry(line: &str) -> Option<String> {
    let (_, entry) = line.split_once(ENTRY_SEPARATOR)?;
    let entry = entry.trim();

    if entry.is_empty() {
        None
    } else {
        Some(entry.to_string())
    }
}

pub struct HistoryCorrelator {
    path: PathBuf,
    max_results: usize,
}

impl HistoryCorrelator {
    pub fn new(path: impl Into<PathBuf>, max_results: usize) -> Self {
        Self {
            path: path.into(),
            max_results,
        }
    }

    pub fn with_default_limit(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_HISTORY_MAX_RESULTS)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Reads the store once. Read errors yield an empty snapshot.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        match fs::read(&self.path) {
            Ok(bytes) => HistorySnapshot::from_bytes(&bytes),
            Err(e) => {
                debug!(
                    "Could not read shell history at `{}`, continuing without it: {e}",
                    self.path.display()
                );
                HistorySnapshot::default()
            }
        }
    }

    /// Reads the store and returns at most `max_results` previous invocations
    /// of `command`, most recent first.
    #[must_use]
    pub fn correlate(&self, command: &str, max_results: usize) -> Vec<String> {
        self.snapshot().correlate(command, max_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HISTORY: &str = "\
: 1718000000:0;ls -la /tmp
: 1718000001:0;lsof -i :8080
: 1718000002:0;tar -xzf archive.tar.gz
this line is malformed ls without separator
: 1718000003:0;ls -lh ~/Downloads
: 1718000004:0;  ls -R src
";

    fn history_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_correlate_most_recent_first() {
        let file = history_file(HISTORY.as_bytes());
        let correlator = HistoryCorrelator::with_default_limit(file.path());

        assert_eq!(
            correlator.correlate("ls", 5),
            vec!["ls -R src", "ls -lh ~/Downloads", "ls -la /tmp"]
        );
    }

    #[test]
    fn test_correlate_does_not_match_partial_token() {
        let file = history_file(HISTORY.as_bytes());
        let correlator = HistoryCorrelator::with_default_limit(file.path());

        let entries = correlator.correlate("ls", 5);
        assert!(entries.iter().all(|entry| !entry.starts_with("lsof")));
        assert_eq!(correlator.correlate("lsof", 5), vec!["lsof -i :8080"]);
    }

    #[test]
    fn test_correlate_respects_max_results() {
        let file = history_file(HISTORY.as_bytes());
        let correlator = HistoryCorrelator::with_default_limit(file.path());

        assert_eq!(correlator.correlate("ls", 2).len(), 2);
        assert!(correlator.correlate("ls", 0).is_empty());
    }

    #[test]
    fn test_correlate_no_match_is_empty() {
        let file = history_file(HISTORY.as_bytes());
        let correlator = HistoryCorrelator::with_default_limit(file.path());

        assert!(correlator.correlate("rsync", 5).is_empty());
    }

    #[test]
    fn test_missing_store_is_empty() {
        let correlator = HistoryCorrelator::with_default_limit("/this/path/does/not/exist");
        assert!(correlator.snapshot().is_empty());
        assert!(correlator.correlate("ls", 5).is_empty());
    }

    #[test]
    fn test_invalid_utf8_lines_are_skipped() {
        let mut contents = b": 1718000000:0;ls \xff\xfe broken\n".to_vec();
        contents.extend_from_slice(b": 1718000001:0;ls -a\n");
        let file = history_file(&contents);
        let correlator = HistoryCorrelator::with_default_limit(file.path());

        assert_eq!(correlator.correlate("ls", 5), vec!["ls -a"]);
    }
}
