use crate::state::AppState;
use crate::terminal::{CursorPos, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::widgets::traits::{Drawable, Interactive, RenderContext};

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}

#[derive(Debug, Default, Clone)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn render(&self, state: &AppState, terminal_size: TerminalSize) -> RenderFrame {
        let view = state.view();
        let ctx = RenderContext {
            focused_id: Some(view.id().to_string()),
            terminal_size,
            theme: self.theme.clone(),
        };

        let mut frame = RenderFrame {
            lines: view.draw(&ctx).lines,
            cursor: view.cursor_pos(),
        };
        if state.is_loading() {
            frame
                .lines
                .push(vec![Span::styled("  loading…", self.theme.footer)]);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::span::line_text;
    use crate::widgets::components::SearchInput;

    #[test]
    fn frame_places_cursor_after_prompt() {
        let state = AppState::new(SearchInput::new("search", "Service").with_placeholder("…"));
        let frame = Renderer::default().render(
            &state,
            TerminalSize {
                width: 40,
                height: 10,
            },
        );
        assert_eq!(frame.lines.len(), 1);
        assert_eq!(line_text(&frame.lines[0]), "> Service: …");
        assert_eq!(frame.cursor, Some(CursorPos { col: 11, row: 0 }));
    }
}
