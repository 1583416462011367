use std::process::{Command, Stdio};

use log::{info, warn};

use crate::error::{Error, Result};

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub command_line: String,
    /// `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero exit into [`Error::SubProcessExit`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubProcessExit`] if the command did not exit with 0.
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::SubProcessExit { code: self.code })
        }
    }
}

/// Runs a literal command line and waits for it to finish.
pub trait Executor {
    /// # Errors
    ///
    /// Returns [`Error::SubProcess`] if the process cannot be started. A
    /// non-zero exit is not an error here; it is reported in the outcome.
    fn execute(&self, command_line: &str) -> Result<ExecutionOutcome>;
}

/// Executes a command, capturing its output while the terminal stays attached
/// to stdin.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned or waited on.
pub fn execute_command(mut command: Command, command_line: &str) -> Result<ExecutionOutcome> {
    let command = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = command.output().map_err(Error::SubProcess)?;

    let outcome = ExecutionOutcome {
        command_line: command_line.to_string(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };

    if outcome.success() {
        info!("`{command_line}` finished successfully");
    } else {
        warn!("`{command_line}` exited with {:?}", outcome.code);
    }

    Ok(outcome)
}

/// Runs command lines through `<shell> -c`.
pub struct ShellExecutor {
    shell: String,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Executor for ShellExecutor {
    fn execute(&self, command_line: &str) -> Result<ExecutionOutcome> {
        info!("Executing `{command_line}` with {}", self.shell);

        let mut command = Command::new(&self.shell);
        command.args(["-c", command_line]);

        execute_command(command, command_line)
    }
}

/// Prints what would run instead of running it.
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn execute(&self, command_line: &str) -> Result<ExecutionOutcome> {
        info!("Dry run, not executing `{command_line}`");

        Ok(ExecutionOutcome {
            command_line: command_line.to_string(),
            code: Some(0),
            stdout: format!("Dry run is specified, not executing: {command_line}\n"),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_executor_captures_stdout() {
        let outcome = ShellExecutor::new("/bin/sh")
            .execute("echo hello")
            .unwrap();

        assert!(outcome.success());
        assert_eq!(outcome.stdout, "hello\n");
        assert_eq!(outcome.command_line, "echo hello");
    }

    #[test]
    fn test_shell_executor_reports_non_zero_exit() {
        let outcome = ShellExecutor::new("/bin/sh")
            .execute("echo oops >&2; exit 3")
            .unwrap();

        assert!(!outcome.success());
        assert_eq!(outcome.code, Some(3));
        assert_eq!(outcome.stderr, "oops\n");
        assert!(matches!(
            outcome.into_result(),
            Err(Error::SubProcessExit { code: Some(3) })
        ));
    }

    #[test]
    fn test_missing_shell_is_sub_process_error() {
        let result = ShellExecutor::new("/this/shell/does/not/exist").execute("ls");
        assert!(matches!(result, Err(Error::SubProcess(_))));
    }

    #[test]
    fn test_dry_run_executor_never_runs() {
        let outcome = DryRunExecutor.execute("rm -rf /tmp/nothing").unwrap();
        assert!(outcome.success());
        assert!(outcome.stdout.contains("rm -rf /tmp/nothing"));
    }
}
