#[cfg(test)]
mod tests {
    use std::io::Write;

    use clhi_cli::console::input::{action_for_key, confirmation_for_key, Selection};
    use clhi_cli::console::Theme;
    use clhi_core::file_handling::get_settings;
    use clhi_core::session::{Action, RunChoice};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use crossterm::style::Color;
    use tempfile::NamedTempFile;

    fn typed(text: &str) -> Vec<KeyEvent> {
        text.chars()
            .map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .collect()
    }

    /// Feeds keys to the menu, then the remaining keys to the confirmation,
    /// the way the console reads them.
    fn apply_then_confirm(keys: &[KeyEvent]) -> Option<RunChoice> {
        let (first, rest) = keys.split_first()?;
        assert!(matches!(action_for_key(first), Selection::Chosen(Action::Apply)));

        rest.iter().find_map(|key| match confirmation_for_key(key) {
            Selection::Chosen(choice) => Some(choice),
            _ => None,
        })
    }

    #[test]
    fn test_apply_followed_by_enter_does_not_confirm() {
        let mut keys = typed("a");
        keys.push(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(apply_then_confirm(&keys), None);
    }

    #[test]
    fn test_apply_needs_explicit_answer() {
        let mut keys = typed("a");
        keys.push(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        keys.extend(typed("xn"));

        assert_eq!(apply_then_confirm(&keys), Some(RunChoice::No));
        assert_eq!(apply_then_confirm(&typed("ay")), Some(RunChoice::Yes));
    }

    #[test]
    fn test_menu_keys_cover_every_action() {
        for action in Action::ALL {
            let key = KeyEvent::new(KeyCode::Char(action.key()), KeyModifiers::NONE);
            assert!(matches!(action_for_key(&key), Selection::Chosen(chosen) if chosen == action));
        }
    }

    #[test]
    fn test_theme_from_settings_file() {
        let mut settings_file = NamedTempFile::new().unwrap();
        write!(
            settings_file,
            r#"
theme:
  prompt:
    rgb: [255, 87, 34]
  response:
    ansi: 214
"#
        )
        .unwrap();

        let settings = get_settings(settings_file.path().to_str().unwrap()).unwrap();
        let theme = Theme::from_definition(&settings.theme).unwrap();

        assert_eq!(theme.prompt, Color::Rgb { r: 255, g: 87, b: 34 });
        assert_eq!(theme.response, Color::AnsiValue(214));
        assert_eq!(theme.command, Theme::default().command);
    }

    #[test]
    fn test_theme_with_conflicting_color_fails() {
        let mut settings_file = NamedTempFile::new().unwrap();
        write!(
            settings_file,
            r#"
theme:
  error:
    name: "red"
    ansi: 1
"#
        )
        .unwrap();

        let settings = get_settings(settings_file.path().to_str().unwrap()).unwrap();
        assert!(Theme::from_definition(&settings.theme).is_err());
    }
}
