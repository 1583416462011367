use clhi_core::config::{ColorDefinition, ThemeDefinition};
use clhi_core::error::{Error, Result};
use crossterm::style::Color;

/// The colors the terminal console prints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub prompt: Color,
    pub response: Color,
    pub command: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            prompt: Color::Rgb {
                r: 0x67,
                g: 0x3a,
                b: 0xb7,
            },
            response: Color::Yellow,
            command: Color::Green,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// Builds a theme from the settings file, keeping the default for every
    /// color that is not defined.
    ///
    /// # Errors
    ///
    /// Returns an error if a color defines more than one of `rgb`, `ansi` or
    /// `name`, or uses an unknown name.
    pub fn from_definition(definition: &ThemeDefinition) -> Result<Self> {
        let defaults = Theme::default();
        Ok(Self {
            prompt: Self::resolve(definition.prompt.as_ref(), defaults.prompt)?,
            response: Self::resolve(definition.response.as_ref(), defaults.response)?,
            command: Self::resolve(definition.command.as_ref(), defaults.command)?,
            error: Self::resolve(definition.error.as_ref(), defaults.error)?,
        })
    }

    fn resolve(definition: Option<&ColorDefinition>, fallback: Color) -> Result<Color> {
        let Some(definition) = definition else {
            return Ok(fallback);
        };

        match (definition.rgb, definition.ansi, definition.name.as_deref()) {
            (None, None, None) => Ok(fallback),
            (Some((r, g, b)), None, None) => Ok(Color::Rgb { r, g, b }),
            (None, Some(ansi), None) => Ok(Color::AnsiValue(ansi)),
            (None, None, Some(name)) => named_color(name),
            _ => Err(Error::MultipleColorTypes),
        }
    }
}

/// Looks up a crossterm color name. `darkcyan` is accepted as well as
/// crossterm's own `dark_cyan`.
fn named_color(name: &str) -> Result<Color> {
    let lowercase = name.trim().to_lowercase();
    let normalized = match lowercase.strip_prefix("dark") {
        Some(rest) if !rest.is_empty() && !rest.starts_with('_') => format!("dark_{rest}"),
        _ => lowercase,
    };

    Color::try_from(normalized.as_str()).map_err(|()| Error::UnknownColorName(name.to_string()))
}
