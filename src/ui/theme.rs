use crate::ui::style::{Color, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub prompt: Style,
    pub typed: Style,
    /// Trailing part of the completion behind the typed text.
    pub ghost: Style,
    pub placeholder: Style,
    pub row: Style,
    pub selected_row: Style,
    pub footer: Style,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            prompt: Style::new().color(Color::Cyan).bold(),
            typed: Style::default(),
            ghost: Style::new().color(Color::DarkGrey),
            placeholder: Style::new().color(Color::DarkGrey).dim(),
            row: Style::default(),
            selected_row: Style::new().color(Color::Cyan).bold(),
            footer: Style::new().color(Color::DarkGrey),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
