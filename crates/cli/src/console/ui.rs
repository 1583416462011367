use std::io::Write;

use clhi_core::error::Result;
use clhi_core::execution::ExecutionOutcome;
use clhi_core::session::Action;
use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use itertools::Itertools;

pub const INPUT_MARKER: &str = "> ";
pub const ACTION_MARKER: &str = "Choose [a/e/f/q]: ";

pub fn clear_screen(out: &mut impl Write) -> Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

fn write_colored_line(out: &mut impl Write, color: Color, text: &str) -> Result<()> {
    queue!(out, SetForegroundColor(color), Print(text), ResetColor, Print('\n'))?;
    Ok(())
}

/// Prints the question prompt. The line editor prints the input marker.
pub fn write_prompt(out: &mut impl Write, color: Color, text: &str) -> Result<()> {
    queue!(
        out,
        Print('\n'),
        SetForegroundColor(color),
        SetAttribute(Attribute::Bold),
        Print(text),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print('\n')
    )?;
    out.flush()?;
    Ok(())
}

pub fn write_response(out: &mut impl Write, color: Color, response: &str) -> Result<()> {
    queue!(out, Print('\n'))?;
    write_colored_line(out, color, response.trim_end())?;
    out.flush()?;
    Ok(())
}

pub fn write_action_menu(out: &mut impl Write, color: Color) -> Result<()> {
    queue!(out, Print('\n'))?;
    write_colored_line(out, color, &Action::ALL.iter().join("\n"))?;
    queue!(out, Print(ACTION_MARKER))?;
    out.flush()?;
    Ok(())
}

pub fn write_confirmation(out: &mut impl Write, color: Color, command_line: &str) -> Result<()> {
    queue!(out, Print("Do you want to apply the following command:\n"))?;
    write_colored_line(out, color, command_line)?;
    queue!(out, Print("([y]es/[n]o): "))?;
    out.flush()?;
    Ok(())
}

pub fn write_notice(out: &mut impl Write, text: &str) -> Result<()> {
    queue!(out, Print(text), Print('\n'))?;
    out.flush()?;
    Ok(())
}

pub fn write_error(out: &mut impl Write, color: Color, text: &str) -> Result<()> {
    write_colored_line(out, color, text)?;
    out.flush()?;
    Ok(())
}

/// Echoes what the command printed, stdout first.
pub fn write_outcome(out: &mut impl Write, error_color: Color, outcome: &ExecutionOutcome) -> Result<()> {
    if !outcome.stdout.is_empty() {
        queue!(out, Print(&outcome.stdout))?;
        if !outcome.stdout.ends_with('\n') {
            queue!(out, Print('\n'))?;
        }
    }

    if !outcome.stderr.is_empty() {
        write_colored_line(out, error_color, outcome.stderr.trim_end())?;
    }

    out.flush()?;
    Ok(())
}
