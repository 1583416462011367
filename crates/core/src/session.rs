//! The per-session interaction state machine.
//!
//! A session alternates between reading a question and deciding what to do
//! with the generated answer:
//!
//! ```text
//! AwaitingInput ──question──▶ AwaitingDecision ──apply/edit/followup──▶ AwaitingInput
//!       │                            │
//!       └──empty / interrupt──▶ Terminated ◀──quit / interrupt──┘
//! ```
//!
//! Terminal interaction goes through the [`Console`] trait so the state
//! machine can be driven without a terminal.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::{error, info};

use crate::conversation::ContextBuffer;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::execution::{ExecutionOutcome, Executor};
use crate::extraction::{extract, ExtractedCommand};
use crate::pipeline::RagPipeline;

/// What the user can do with a generated response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Apply,
    Edit,
    FollowUp,
    Quit,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Apply, Action::Edit, Action::FollowUp, Action::Quit];

    #[must_use]
    pub fn key(self) -> char {
        match self {
            Action::Apply => 'a',
            Action::Edit => 'e',
            Action::FollowUp => 'f',
            Action::Quit => 'q',
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Action::Apply => "Apply the CLI command",
            Action::Edit => "Edit the CLI command",
            Action::FollowUp => "Ask follow-up question",
            Action::Quit => "Quit",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.key(), self.description())
    }
}

impl TryFrom<char> for Action {
    type Error = Error;

    fn try_from(value: char) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.key() == value.to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownAction(value.to_string()))
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => Action::try_from(key),
            _ => Err(Error::UnknownAction(s.trim().to_string())),
        }
    }
}

/// The user's answer when asked to confirm a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunChoice {
    Yes,
    No,
}

/// Which question to ask when waiting for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPrompt {
    Greeting,
    Continue,
    FollowUp,
}

impl InputPrompt {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            InputPrompt::Greeting => "Hi, ask me anything about the CLI!",
            InputPrompt::Continue => "How can I help you further?",
            InputPrompt::FollowUp => "How can I elaborate?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput(InputPrompt),
    AwaitingDecision {
        response: String,
        command: ExtractedCommand,
    },
    Terminated,
}

/// Everything the session needs from the terminal.
///
/// Methods that read input return `Ok(None)` when the user interrupts or
/// gives no answer, which ends the session.
pub trait Console {
    fn read_question(&mut self, prompt: InputPrompt) -> Result<Option<String>>;

    fn show_response(&mut self, response: &str) -> Result<()>;

    fn choose_action(&mut self) -> Result<Option<Action>>;

    fn confirm_command(&mut self, command_line: &str) -> Result<Option<RunChoice>>;

    fn notify(&mut self, message: &str) -> Result<()>;

    fn report_error(&mut self, error: &Error) -> Result<()>;

    fn show_outcome(&mut self, outcome: &ExecutionOutcome) -> Result<()>;
}

/// The message recorded after the user corrects a generated command, so the
/// next turns see the correction.
#[must_use]
pub fn correction_message(original: &str, edited: &str) -> String {
    format!("I've corrected your generated command '{original}' to '{edited}'")
}

pub struct InteractionController<'a> {
    pipeline: &'a RagPipeline,
    console: &'a mut dyn Console,
    editor: &'a dyn Editor,
    executor: &'a dyn Executor,
    buffer: ContextBuffer,
}

impl<'a> InteractionController<'a> {
    pub fn new(
        pipeline: &'a RagPipeline,
        console: &'a mut dyn Console,
        editor: &'a dyn Editor,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            pipeline,
            console,
            editor,
            executor,
            buffer: ContextBuffer::new(),
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &ContextBuffer {
        &self.buffer
    }

    /// Runs the session until it terminates.
    ///
    /// # Errors
    ///
    /// Only errors that leave the session unusable, such as terminal I/O
    /// failures, are returned. Everything else is shown and the session
    /// continues.
    pub fn run(&mut self) -> Result<()> {
        let mut state = SessionState::AwaitingInput(InputPrompt::Greeting);

        while state != SessionState::Terminated {
            state = self.step(state)?;
        }

        info!("Session terminated after {} message(s)", self.buffer.len());
        Ok(())
    }

    /// Advances the state machine by one transition.
    ///
    /// # Errors
    ///
    /// See [`InteractionController::run`].
    pub fn step(&mut self, state: SessionState) -> Result<SessionState> {
        match state {
            SessionState::AwaitingInput(prompt) => self.await_input(prompt),
            SessionState::AwaitingDecision { response, command } => {
                self.await_decision(&response, command)
            }
            SessionState::Terminated => Ok(SessionState::Terminated),
        }
    }

    fn await_input(&mut self, prompt: InputPrompt) -> Result<SessionState> {
        let Some(question) = self.console.read_question(prompt)? else {
            return Ok(SessionState::Terminated);
        };

        let question = question.trim();
        if question.is_empty() {
            return Ok(SessionState::Terminated);
        }

        self.buffer.push_user(question);

        match self.pipeline.respond(&self.buffer) {
            Ok(response) => {
                let command = extract(&response);
                self.buffer.push_assistant(response.clone());
                Ok(SessionState::AwaitingDecision { response, command })
            }
            Err(e) => {
                self.surface(e)?;
                Ok(SessionState::AwaitingInput(InputPrompt::Continue))
            }
        }
    }

    fn await_decision(
        &mut self,
        response: &str,
        command: ExtractedCommand,
    ) -> Result<SessionState> {
        self.console.show_response(response)?;

        match self.console.choose_action()? {
            None | Some(Action::Quit) => Ok(SessionState::Terminated),
            Some(Action::Apply) => self.apply(command),
            Some(Action::Edit) => self.edit(command),
            Some(Action::FollowUp) => Ok(SessionState::AwaitingInput(InputPrompt::FollowUp)),
        }
    }

    fn apply(&mut self, command: ExtractedCommand) -> Result<SessionState> {
        let ExtractedCommand::Found(command_line) = command else {
            self.console
                .notify("I did not find an executable command in my recommendation to apply.")?;
            return Ok(SessionState::AwaitingInput(InputPrompt::Continue));
        };

        match self.console.confirm_command(&command_line)? {
            None => return Ok(SessionState::Terminated),
            Some(RunChoice::Yes) => self.run_command(&command_line)?,
            Some(RunChoice::No) => {}
        }

        Ok(SessionState::AwaitingInput(InputPrompt::Continue))
    }

    fn edit(&mut self, command: ExtractedCommand) -> Result<SessionState> {
        let ExtractedCommand::Found(original) = command else {
            self.console
                .notify("I did not find an executable command in my recommendation to edit.")?;
            return Ok(SessionState::AwaitingInput(InputPrompt::Continue));
        };

        let edited = match self.editor.edit(&original) {
            Ok(edited) => edited,
            Err(e) => {
                self.surface(e)?;
                return Ok(SessionState::AwaitingInput(InputPrompt::Continue));
            }
        };

        if edited.trim().is_empty() {
            self.console
                .notify("The edited command is empty, there is nothing to apply.")?;
            return Ok(SessionState::AwaitingInput(InputPrompt::Continue));
        }

        match self.console.confirm_command(&edited)? {
            None => return Ok(SessionState::Terminated),
            Some(RunChoice::Yes) => {
                self.run_command(&edited)?;
                self.buffer.push_user(correction_message(&original, &edited));
            }
            Some(RunChoice::No) => {}
        }

        Ok(SessionState::AwaitingInput(InputPrompt::Continue))
    }

    fn run_command(&mut self, command_line: &str) -> Result<()> {
        match self.executor.execute(command_line) {
            Ok(outcome) => {
                self.console.show_outcome(&outcome)?;
                if let Err(e) = outcome.into_result() {
                    self.console.report_error(&e)?;
                }
                Ok(())
            }
            Err(e) => self.surface(e),
        }
    }

    /// Shows a turn-level error and keeps the session going, or hands back
    /// an error the session cannot survive.
    fn surface(&mut self, e: Error) -> Result<()> {
        if !e.is_turn_recoverable() {
            return Err(e);
        }

        error!("{e}");
        self.console.report_error(&e)
    }
}
