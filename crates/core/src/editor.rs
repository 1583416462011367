use std::fs;
use std::io::Write;
use std::process::Command;

use log::debug;
use tempfile::Builder;

use crate::config::DEFAULT_EDITOR;
use crate::error::{Error, Result};

/// Lets the user change a piece of text, blocking until they are done.
pub trait Editor {
    /// # Errors
    ///
    /// Returns [`Error::Editor`] if the editor cannot be run or exits unsuccessfully.
    fn edit(&self, seed: &str) -> Result<String>;
}

/// Opens the seed text in an external editor program such as `vi` or
/// `code --wait`, then reads the saved file back.
pub struct ExternalEditor {
    program: String,
    args: Vec<String>,
}

impl ExternalEditor {
    /// Builds an editor from a command string; words after the first are
    /// passed as arguments before the file path.
    pub fn new(editor_command: &str) -> Self {
        let mut words = editor_command.split_whitespace().map(ToString::to_string);
        let program = words.next().unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Self {
            program,
            args: words.collect(),
        }
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, seed: &str) -> Result<String> {
        let mut file = Builder::new()
            .prefix("clhi-")
            .suffix(".sh")
            .tempfile()
            .map_err(|e| Error::Editor(format!("could not create a temporary file: {e}")))?;

        writeln!(file, "{seed}")
            .and_then(|()| file.flush())
            .map_err(|e| Error::Editor(format!("could not write the temporary file: {e}")))?;

        debug!(
            "Opening `{}` with {} {:?}",
            file.path().display(),
            self.program,
            self.args
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file.path())
            .status()
            .map_err(|e| Error::Editor(format!("could not start `{}`: {e}", self.program)))?;

        if !status.success() {
            return Err(Error::Editor(format!(
                "`{}` exited with {status}",
                self.program
            )));
        }

        let edited = fs::read_to_string(file.path())
            .map_err(|e| Error::Editor(format!("could not read the edited file: {e}")))?;

        Ok(edited.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_editor_command() {
        let editor = ExternalEditor::new("code --wait");
        assert_eq!(editor.program, "code");
        assert_eq!(editor.args, vec!["--wait"]);
    }

    #[test]
    fn test_non_interactive_editor_keeps_seed() {
        // `true` exits immediately without touching the file
        let edited = ExternalEditor::new("true").edit("ls -la").unwrap();
        assert_eq!(edited, "ls -la");
    }

    #[cfg(unix)]
    #[test]
    fn test_scripted_editor_changes_text() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("editor.sh");
        fs::write(&script, "#!/bin/sh\nprintf 'ls -la -h\\n' > \"$1\"\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let editor = ExternalEditor::new(script.to_str().unwrap());
        assert_eq!(editor.edit("ls -la").unwrap(), "ls -la -h");
    }

    #[test]
    fn test_failing_editor_is_error() {
        let result = ExternalEditor::new("false").edit("ls");
        assert!(matches!(result, Err(Error::Editor(_))));
    }
}
