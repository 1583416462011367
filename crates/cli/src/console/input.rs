//! Keyboard input.
//!
//! Questions are read as whole lines with rustyline. Actions and
//! confirmations are single key presses read in raw mode; their key handling
//! is split into pure functions over [`KeyEvent`]s so it can be tested
//! without a terminal.

use std::io::{self, stdout, Write};
use std::time::Duration;

use clhi_core::error::{Error, Result};
use clhi_core::session::{Action, RunChoice};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, queue};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const BELL: char = '\x07';

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
    }
}

fn readline_error(error: ReadlineError) -> Error {
    match error {
        ReadlineError::Io(e) => Error::Stdio(e),
        other => Error::Stdio(io::Error::other(other.to_string())),
    }
}

/// Maps a rustyline result to a question. Ctrl-C and Ctrl-D end the session.
pub fn question_from_readline(
    result: std::result::Result<String, ReadlineError>,
) -> Result<Option<String>> {
    match result {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(readline_error(e)),
    }
}

/// Line editor for questions, with in-session recall of earlier ones.
pub struct QuestionReader {
    editor: DefaultEditor,
}

impl QuestionReader {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up for line editing.
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new().map_err(readline_error)?,
        })
    }

    /// Reads one line after `marker`. Returns `None` on Ctrl-C or Ctrl-D.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    pub fn read_line(&mut self, marker: &str) -> Result<Option<String>> {
        let question = question_from_readline(self.editor.readline(marker))?;

        if let Some(question) = &question {
            if !question.trim().is_empty() {
                let _ = self.editor.add_history_entry(question.as_str());
            }
        }

        Ok(question)
    }
}

/// What a single key press means while a choice is pending.
#[derive(Debug)]
pub enum Selection<T> {
    Chosen(T),
    Cancelled,
    Rejected(Error),
    Ignored,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c' | 'd')))
}

/// A key typed without Ctrl or Alt, Shift allowed.
fn is_plain(key: &KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

pub fn action_for_key(key: &KeyEvent) -> Selection<Action> {
    if is_interrupt(key) {
        return Selection::Cancelled;
    }

    match key.code {
        KeyCode::Char(c) if is_plain(key) => {
            match Action::try_from(c) {
                Ok(action) => Selection::Chosen(action),
                Err(e) => Selection::Rejected(e),
            }
        }
        _ => Selection::Ignored,
    }
}

/// Only an explicit `y` or `n` answers. Enter is ignored so a key meant for
/// an earlier prompt never confirms a command.
pub fn confirmation_for_key(key: &KeyEvent) -> Selection<RunChoice> {
    if is_interrupt(key) {
        return Selection::Cancelled;
    }

    match key.code {
        KeyCode::Char(c) if is_plain(key) => {
            match c.to_ascii_lowercase() {
                'y' => Selection::Chosen(RunChoice::Yes),
                'n' => Selection::Chosen(RunChoice::No),
                _ => Selection::Ignored,
            }
        }
        _ => Selection::Ignored,
    }
}

/// Discards keys typed before the current prompt was shown.
fn drain_pending_events() -> Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}

fn next_key_press() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

fn end_line(out: &mut impl Write) -> Result<()> {
    queue!(out, cursor::MoveToNextLine(1))?;
    out.flush()?;
    Ok(())
}

/// Waits for a single key naming an [`Action`], complaining about others.
pub fn read_action(error_color: Color) -> Result<Option<Action>> {
    let _raw_mode_guard = RawModeGuard::enable()?;
    let mut stdout = stdout();
    drain_pending_events()?;

    loop {
        match action_for_key(&next_key_press()?) {
            Selection::Chosen(action) => {
                queue!(stdout, Print(action.key()))?;
                end_line(&mut stdout)?;
                return Ok(Some(action));
            }
            Selection::Cancelled => {
                end_line(&mut stdout)?;
                return Ok(None);
            }
            Selection::Rejected(e) => {
                queue!(
                    stdout,
                    Print(BELL),
                    SetForegroundColor(error_color),
                    Print(e),
                    ResetColor,
                )?;
                end_line(&mut stdout)?;
            }
            Selection::Ignored => {}
        }
    }
}

/// Waits for a yes or no answer.
pub fn read_confirmation() -> Result<Option<RunChoice>> {
    let _raw_mode_guard = RawModeGuard::enable()?;
    let mut stdout = stdout();
    drain_pending_events()?;

    loop {
        match confirmation_for_key(&next_key_press()?) {
            Selection::Chosen(choice) => {
                let echo = match choice {
                    RunChoice::Yes => 'y',
                    RunChoice::No => 'n',
                };
                queue!(stdout, Print(echo))?;
                end_line(&mut stdout)?;
                return Ok(Some(choice));
            }
            Selection::Cancelled => {
                end_line(&mut stdout)?;
                return Ok(None);
            }
            Selection::Rejected(_) | Selection::Ignored => {}
        }
    }
}
