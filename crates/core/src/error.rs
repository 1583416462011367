use leon::{ParseError, RenderError};
use thiserror::Error;

use crate::conversation::Role;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The conversation is empty, there is no question to answer.")]
    EmptyConversation,

    #[error("The latest message must come from the user, found a message from the {}.", .0)]
    QuestionNotFromUser(Role),

    #[error("The {} service failed: {}", .backend, .message)]
    Service { backend: String, message: String },

    #[error("Generating a response failed: {}", .message)]
    Generation { message: String },

    #[error("No credential found, set `{}` in the environment.", .0)]
    MissingCredential(String),

    #[error("No host configured for the {} service, set `{}` or add it to the settings file.", .0, .1)]
    MissingHost(String, String),

    #[error("The sub process exited with non-success code{}.", .code.map(|c| format!(" {c}")).unwrap_or_default())]
    SubProcessExit { code: Option<i32> },

    #[error("Error with sub process process: {}", .0)]
    SubProcess(std::io::Error),

    #[error("The editor failed: {}", .0)]
    Editor(String),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error parsing prompt template: {}", .0)]
    Parse(#[from] ParseError),

    #[error("Error rendering prompt template: {}", .0)]
    Render(#[from] RenderError),

    #[error("Unknown action `{}`, expected one of a, e, f or q.", .0)]
    UnknownAction(String),

    #[error("For a color, only one of `rgb`, `ansi` or `name` should be defined.")]
    MultipleColorTypes,

    #[error("Unknown color name: \"{}\"", _0)]
    UnknownColorName(String),

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),
}

impl Error {
    pub fn service(backend: &str, message: impl std::fmt::Display) -> Self {
        Self::Service {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }

    pub fn generation(message: impl std::fmt::Display) -> Self {
        Self::Generation {
            message: message.to_string(),
        }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Whether a failure inside a single turn leaves the session usable.
    ///
    /// Conversation, backend, template, editor and process errors abort the
    /// current turn only. Terminal I/O and configuration errors do not.
    #[must_use]
    pub fn is_turn_recoverable(&self) -> bool {
        !matches!(
            self,
            Error::Stdio(_)
                | Error::Yaml { .. }
                | Error::Io { .. }
                | Error::MissingCredential(_)
                | Error::MissingHost(_, _)
                | Error::MultipleColorTypes
                | Error::UnknownColorName(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_message() {
        let error = Error::service("retrieval", "connection refused");
        assert_eq!(
            error.to_string(),
            "The retrieval service failed: connection refused"
        );
    }

    #[test]
    fn test_sub_process_exit_message() {
        assert_eq!(
            Error::SubProcessExit { code: Some(2) }.to_string(),
            "The sub process exited with non-success code 2."
        );
        assert_eq!(
            Error::SubProcessExit { code: None }.to_string(),
            "The sub process exited with non-success code."
        );
    }

    #[test]
    fn test_turn_recoverable_classification() {
        assert!(Error::EmptyConversation.is_turn_recoverable());
        assert!(Error::QuestionNotFromUser(Role::Assistant).is_turn_recoverable());
        assert!(Error::service("retrieval", "down").is_turn_recoverable());
        assert!(Error::generation("down").is_turn_recoverable());
        assert!(Error::SubProcessExit { code: Some(1) }.is_turn_recoverable());

        let stdio = Error::Stdio(std::io::Error::other("closed"));
        assert!(!stdio.is_turn_recoverable());
        assert!(!Error::MissingCredential("TOKEN".to_string()).is_turn_recoverable());
    }
}
