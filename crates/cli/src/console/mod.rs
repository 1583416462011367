//! The interactive terminal console.
//!
//! [`TerminalConsole`] implements the core [`Console`] trait with crossterm:
//! prompts and responses are printed in the theme colors, questions are read
//! with a line editor and actions and confirmations are single key presses
//! read in raw mode.

pub mod colors;
pub mod input;
pub mod ui;

use std::io::stdout;

use clhi_core::error::{Error, Result};
use clhi_core::execution::ExecutionOutcome;
use clhi_core::session::{Action, Console, InputPrompt, RunChoice};

pub use colors::Theme;
use input::QuestionReader;

pub struct TerminalConsole {
    theme: Theme,
    questions: QuestionReader,
}

impl TerminalConsole {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up for line editing.
    pub fn new(theme: Theme) -> Result<Self> {
        Ok(Self {
            theme,
            questions: QuestionReader::new()?,
        })
    }

    /// Clears the screen for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be written to.
    pub fn clear(&self) -> Result<()> {
        ui::clear_screen(&mut stdout())
    }
}

impl Console for TerminalConsole {
    fn read_question(&mut self, prompt: InputPrompt) -> Result<Option<String>> {
        ui::write_prompt(&mut stdout(), self.theme.prompt, prompt.text())?;
        self.questions.read_line(ui::INPUT_MARKER)
    }

    fn show_response(&mut self, response: &str) -> Result<()> {
        ui::write_response(&mut stdout(), self.theme.response, response)
    }

    fn choose_action(&mut self) -> Result<Option<Action>> {
        ui::write_action_menu(&mut stdout(), self.theme.prompt)?;
        input::read_action(self.theme.error)
    }

    fn confirm_command(&mut self, command_line: &str) -> Result<Option<RunChoice>> {
        ui::write_confirmation(&mut stdout(), self.theme.command, command_line)?;
        input::read_confirmation()
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        ui::write_notice(&mut stdout(), message)
    }

    fn report_error(&mut self, error: &Error) -> Result<()> {
        ui::write_error(&mut stdout(), self.theme.error, &error.to_string())
    }

    fn show_outcome(&mut self, outcome: &ExecutionOutcome) -> Result<()> {
        ui::write_outcome(&mut stdout(), self.theme.error, outcome)
    }
}
