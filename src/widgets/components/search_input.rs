//! Search field with inline ghost completion and a match dropdown.
//!
//! Two fields are layered at the same origin. The real field holds the typed
//! query and is sized to exactly the measured width of that query. The ghost
//! field behind it shows the whole completion in a muted style, so only the
//! untyped remainder is visible past the real field's right edge.

use crate::core::Candidate;
use crate::core::search::{Suggestion, suggest};
use crate::runtime::event::{SystemEvent, WidgetAction};
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::widgets::base::ComponentBase;
use crate::widgets::components::scroll::CursorNav;
use crate::widgets::inputs::text_edit;
use crate::widgets::shared::width_probe::{WidthProbe, text_width};
use crate::widgets::traits::{
    DrawOutput, Drawable, InteractionResult, Interactive, RenderContext, TextEditState,
};
use tracing::{debug, trace};

const DEFAULT_MAX_VISIBLE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing typed: full-width field, placeholder, no ghost, no list.
    Empty,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// The real field spans the whole row.
    Full,
    /// The real field is exactly this many columns wide.
    Measured(u16),
}

/// Render instructions for one state of the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView<'a> {
    pub state: ViewState,
    pub query: &'a str,
    pub field_width: FieldWidth,
    /// Full completion text for the ghost field.
    pub ghost: Option<&'a str>,
    pub results: &'a [Candidate],
    pub selected: Option<usize>,
}

pub struct SearchInput {
    base: ComponentBase,
    query: String,
    cursor: usize,
    placeholder: String,
    candidates: Vec<Candidate>,
    suggestion: Suggestion,
    probe: WidthProbe,
    measured_width: Option<u16>,
    nav: CursorNav,
}

impl SearchInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: ComponentBase::new(id, label),
            query: String::new(),
            cursor: 0,
            placeholder: String::new(),
            candidates: Vec::new(),
            suggestion: Suggestion::default(),
            probe: WidthProbe::detached(),
            measured_width: None,
            nav: CursorNav::new(Some(DEFAULT_MAX_VISIBLE)),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.nav.set_max_visible(max_visible);
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.set_candidates(candidates);
        self
    }

    pub fn with_probe(mut self, probe: WidthProbe) -> Self {
        self.probe = probe;
        self.remeasure();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn suggestion(&self) -> &Suggestion {
        &self.suggestion
    }

    pub fn state(&self) -> ViewState {
        if self.query.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Searching
        }
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.suggestion.matches.get(self.nav.active())
    }

    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.recompute();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cursor = text_edit::char_count(&self.query);
        self.recompute();
    }

    pub fn attach_probe(&mut self, size: TerminalSize) {
        self.probe.attach(size);
        self.remeasure();
    }

    /// Replaces the query with the ghost completion. Returns `false` when
    /// there is nothing left to complete.
    pub fn accept_completion(&mut self) -> bool {
        if self.suggestion.remainder(&self.query).is_empty() {
            return false;
        }
        let completion = self.suggestion.completion.clone();
        self.set_query(completion);
        true
    }

    pub fn view(&self) -> SearchView<'_> {
        match self.state() {
            ViewState::Empty => SearchView {
                state: ViewState::Empty,
                query: &self.query,
                field_width: FieldWidth::Full,
                ghost: None,
                results: &[],
                selected: None,
            },
            ViewState::Searching => SearchView {
                state: ViewState::Searching,
                query: &self.query,
                field_width: self
                    .measured_width
                    .map(FieldWidth::Measured)
                    .unwrap_or(FieldWidth::Full),
                ghost: Some(self.suggestion.completion.as_str()).filter(|c| !c.is_empty()),
                results: &self.suggestion.matches,
                selected: (!self.suggestion.is_empty()).then(|| self.nav.active()),
            },
        }
    }

    fn recompute(&mut self) {
        self.suggestion = suggest(&self.query, &self.candidates);
        self.nav.reset(self.suggestion.matches.len());
        self.remeasure();
        debug!(
            query = %self.query,
            matches = self.suggestion.matches.len(),
            completion = %self.suggestion.completion,
            "suggestions recomputed"
        );
    }

    fn remeasure(&mut self) {
        if self.probe.is_attached() {
            self.measured_width = Some(self.probe.measure_width(&self.query));
        } else {
            trace!("width probe detached, keeping previous field width");
        }
    }

    fn edited(&mut self) -> InteractionResult {
        self.recompute();
        InteractionResult::handled()
    }

    fn move_selection(&mut self, delta: isize) -> InteractionResult {
        let total = self.suggestion.matches.len();
        if total == 0 {
            return InteractionResult::ignored();
        }
        self.nav.move_by(delta, total);
        InteractionResult::handled()
    }

    fn prompt_width(&self) -> usize {
        text_width(&self.base.prompt(true))
    }

    fn draw_results(&self, theme: &Theme, indent: &str) -> Vec<SpanLine> {
        let results = &self.suggestion.matches;
        let (start, end) = self.nav.visible_range(results.len());
        let mut lines = Vec::with_capacity(end - start + 1);

        for (offset, candidate) in results[start..end].iter().enumerate() {
            let selected = start + offset == self.nav.active();
            let (marker, style) = if selected {
                ("> ", theme.selected_row)
            } else {
                ("  ", theme.row)
            };
            lines.push(vec![
                Span::new(format!("{indent}{marker}")),
                Span::styled(candidate.name.clone(), style),
            ]);
        }
        if let Some(footer) = self.nav.footer(results.len()) {
            lines.push(vec![Span::styled(
                format!("{indent}  {footer}"),
                theme.footer,
            )]);
        }
        lines
    }
}

impl Drawable for SearchInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = ctx.is_focused(self.base.id());
        let theme = &ctx.theme;
        let view = self.view();

        let mut first_line = Vec::new();
        let prompt = self.base.prompt(focused);
        if !prompt.is_empty() {
            first_line.push(Span::styled(prompt, theme.prompt));
        }
        first_line.extend(compose_field(&view, &self.placeholder, theme));

        let mut lines = vec![first_line];
        if view.state == ViewState::Searching && !view.results.is_empty() {
            let indent = " ".repeat(self.prompt_width());
            lines.extend(self.draw_results(theme, &indent));
        }
        DrawOutput { lines }
    }
}

impl Interactive for SearchInput {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        // AltGr arrives as Ctrl+Alt on Windows.
        let alt_gr_char = ctrl && alt && matches!(key.code, KeyCode::Char(_));
        if (ctrl || alt) && !alt_gr_char {
            return InteractionResult::ignored();
        }
        match key.code {
            KeyCode::Char(ch) => {
                text_edit::insert_char(&mut self.query, &mut self.cursor, ch);
                self.edited()
            }
            KeyCode::Backspace => {
                if text_edit::backspace_char(&mut self.query, &mut self.cursor) {
                    return self.edited();
                }
                InteractionResult::ignored()
            }
            KeyCode::Delete => {
                if text_edit::delete_char(&mut self.query, &mut self.cursor) {
                    return self.edited();
                }
                InteractionResult::ignored()
            }
            KeyCode::Left => {
                if text_edit::move_left(&mut self.cursor, &self.query) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Right => {
                if text_edit::move_right(&mut self.cursor, &self.query) || self.accept_completion()
                {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Home => {
                self.cursor = 0;
                InteractionResult::handled()
            }
            KeyCode::End => {
                self.cursor = text_edit::char_count(&self.query);
                InteractionResult::handled()
            }
            KeyCode::Tab => {
                if self.accept_completion() {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => match self.selected().cloned() {
                Some(candidate) => InteractionResult::with_action(WidgetAction::Submit(candidate)),
                None => InteractionResult::ignored(),
            },
            _ => InteractionResult::ignored(),
        }
    }

    fn text_editing(&mut self) -> Option<TextEditState<'_>> {
        Some(TextEditState {
            value: &mut self.query,
            cursor: &mut self.cursor,
        })
    }

    fn on_text_edited(&mut self) {
        self.recompute();
    }

    fn on_system_event(&mut self, event: &SystemEvent) -> InteractionResult {
        match event {
            SystemEvent::CandidatesLoaded(candidates) => {
                self.set_candidates(candidates.clone());
                InteractionResult::handled()
            }
            SystemEvent::SurfaceResized(size) => {
                self.attach_probe(*size);
                InteractionResult::handled()
            }
        }
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        let typed = text_edit::clamp_cursor(self.cursor, &self.query);
        let before_cursor = &self.query[..text_edit::byte_index_at_char(&self.query, typed)];
        let mut col = text_width(before_cursor);
        if let FieldWidth::Measured(width) = self.view().field_width {
            col = col.min(width as usize);
        }
        Some(CursorPos {
            col: (self.prompt_width() + col).min(u16::MAX as usize) as u16,
            row: 0,
        })
    }
}

/// Composites the real field over the ghost field for one row.
fn compose_field(view: &SearchView<'_>, placeholder: &str, theme: &Theme) -> SpanLine {
    match (view.state, view.field_width) {
        (ViewState::Empty, _) => {
            if placeholder.is_empty() {
                Vec::new()
            } else {
                vec![Span::styled(placeholder, theme.placeholder)]
            }
        }
        (ViewState::Searching, FieldWidth::Full) => vec![Span::styled(view.query, theme.typed)],
        (ViewState::Searching, FieldWidth::Measured(width)) => {
            let mut spans = vec![Span::styled(fit_field(view.query, width), theme.typed)];
            // The ghost's first `query` columns sit under the typed text, so
            // only the untyped remainder can show. A stale field wider than
            // the query covers the start of the remainder as well.
            let remainder = view
                .ghost
                .and_then(|ghost| ghost.strip_prefix(view.query))
                .unwrap_or("");
            let gap = usize::from(width).saturating_sub(text_width(view.query));
            let trailing = skip_columns(remainder, gap);
            if !trailing.is_empty() {
                spans.push(Span::styled(trailing, theme.ghost));
            }
            spans
        }
    }
}

/// Renders `text` in a field exactly `width` columns wide. Narrow text is
/// padded; wide text scrolls so its end stays visible.
fn fit_field(text: &str, width: u16) -> String {
    let width = usize::from(width);
    let text_cols = text_width(text);
    if text_cols <= width {
        return format!("{text}{}", " ".repeat(width - text_cols));
    }

    let tail = char_boundaries(text)
        .map(|idx| &text[idx..])
        .find(|tail| text_width(tail) <= width)
        .unwrap_or("");
    format!("{}{tail}", " ".repeat(width - text_width(tail)))
}

/// What stays visible of `text` once the first `cols` columns are covered.
/// A wide glyph cut by the edge leaves blank cells.
fn skip_columns(text: &str, cols: usize) -> String {
    char_boundaries(text)
        .find_map(|idx| {
            let covered = text_width(&text[..idx]);
            (covered >= cols).then(|| format!("{}{}", " ".repeat(covered - cols), &text[idx..]))
        })
        .unwrap_or_default()
}

fn char_boundaries(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
}
