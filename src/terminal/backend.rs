use crate::ui::renderer::RenderFrame;
use crate::ui::span::SpanLine;
use crate::ui::style::Color;
use crossterm::cursor::{Hide, MoveTo, Show, position};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers as CrosstermKeyModifiers,
};
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
    EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen, ScrollUp,
};
use crossterm::{execute, queue};
use serde::Deserialize;
use std::io::{self, Stdout, Write};
use std::ops::BitOr;
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Draw below the shell prompt and leave the scrollback intact.
    #[default]
    Inline,
    AltScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Unknown,
    Char(char),
    Enter,
    Tab,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyModifiers(u8);

impl KeyModifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CONTROL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for KeyModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize(TerminalSize),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPos {
    pub col: u16,
    pub row: u16,
}

#[derive(Debug, Default)]
struct InlineState {
    block_start_row: u16,
    last_frame: Vec<SpanLine>,
    last_cursor: Option<CursorPos>,
    last_size: TerminalSize,
    has_rendered_once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InlineLayoutPlan {
    block_start_row: u16,
    draw_count: usize,
    skip: usize,
}

/// Keeps the drawn block on screen: when the frame grows past the bottom edge
/// the block is shifted up, and rows that still do not fit are skipped from
/// the top.
fn plan_inline_layout(height: usize, frame_len: usize, prev_block_start_row: u16) -> InlineLayoutPlan {
    if height == 0 {
        return InlineLayoutPlan {
            block_start_row: 0,
            draw_count: 0,
            skip: 0,
        };
    }

    let max_row = height.saturating_sub(1) as u16;
    let mut block_start = prev_block_start_row.min(max_row) as usize;
    let desired_visible = frame_len.min(height);
    let available = height.saturating_sub(block_start);
    if desired_visible > available {
        block_start = block_start.saturating_sub(desired_visible - available);
    }

    let draw_count = frame_len.min(height.saturating_sub(block_start));
    InlineLayoutPlan {
        block_start_row: block_start.min(u16::MAX as usize) as u16,
        draw_count,
        skip: frame_len.saturating_sub(draw_count),
    }
}

pub struct Terminal {
    stdout: Stdout,
    size: TerminalSize,
    mode: RenderMode,
    inline: InlineState,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            size: TerminalSize { width, height },
            mode: RenderMode::default(),
            inline: InlineState::default(),
        })
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn set_size(&mut self, size: TerminalSize) {
        self.size = size;
    }

    pub fn refresh_size(&mut self) -> io::Result<TerminalSize> {
        let (width, height) = terminal::size()?;
        self.size = TerminalSize { width, height };
        Ok(self.size)
    }

    pub fn enter(&mut self) -> io::Result<()> {
        self.refresh_size()?;
        terminal::enable_raw_mode()?;
        match self.mode {
            RenderMode::AltScreen => {
                execute!(self.stdout, EnterAlternateScreen, Hide)?;
            }
            RenderMode::Inline => {
                let (_, row) = position()?;
                self.inline.block_start_row = row.min(self.size.height.saturating_sub(1));
                execute!(self.stdout, DisableLineWrap, Hide)?;
            }
        }
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        match self.mode {
            RenderMode::AltScreen => {
                execute!(self.stdout, LeaveAlternateScreen, EnableLineWrap, Show)?;
            }
            RenderMode::Inline => {
                // Clear the widget so the shell prompt returns to where it was.
                queue!(
                    self.stdout,
                    MoveTo(0, self.inline.block_start_row),
                    Clear(ClearType::FromCursorDown)
                )?;
                execute!(self.stdout, EnableLineWrap, Show)?;
            }
        }
        terminal::disable_raw_mode()?;
        self.stdout.flush()
    }

    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<TerminalEvent> {
        if !event::poll(timeout)? {
            return Ok(TerminalEvent::Tick);
        }
        match event::read()? {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                Ok(TerminalEvent::Key(map_key_event(key)))
            }
            CrosstermEvent::Resize(width, height) => {
                Ok(TerminalEvent::Resize(TerminalSize { width, height }))
            }
            _ => Ok(TerminalEvent::Tick),
        }
    }

    pub fn render_frame(&mut self, frame: &RenderFrame) -> io::Result<()> {
        match self.mode {
            RenderMode::AltScreen => self.render_altscreen(frame),
            RenderMode::Inline => self.render_inline(frame),
        }
    }
}

impl Terminal {
    fn render_altscreen(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let height = self.size.height as usize;
        let width = self.size.width;
        if height == 0 || width == 0 {
            return Ok(());
        }

        queue!(self.stdout, BeginSynchronizedUpdate, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in frame.lines.iter().take(height).enumerate() {
            queue!(self.stdout, MoveTo(0, row as u16))?;
            self.write_span_line(line, width)?;
        }
        self.place_cursor(frame.cursor, 0, 0, height)?;
        queue!(self.stdout, EndSynchronizedUpdate)?;
        self.stdout.flush()
    }

    fn render_inline(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let height = self.size.height as usize;
        let width = self.size.width;
        if height == 0 || width == 0 {
            return Ok(());
        }

        let unchanged = self.inline.has_rendered_once
            && self.inline.last_frame == frame.lines
            && self.inline.last_cursor == frame.cursor
            && self.inline.last_size == self.size;
        if unchanged {
            return Ok(());
        }

        let prev_start = self.inline.block_start_row;
        let plan = plan_inline_layout(height, frame.lines.len(), prev_start);
        let scroll_up_lines = prev_start.saturating_sub(plan.block_start_row);

        queue!(self.stdout, BeginSynchronizedUpdate, Hide)?;
        if scroll_up_lines > 0 {
            queue!(
                self.stdout,
                MoveTo(0, self.size.height.saturating_sub(1)),
                ScrollUp(scroll_up_lines)
            )?;
        }
        queue!(
            self.stdout,
            MoveTo(0, plan.block_start_row),
            Clear(ClearType::FromCursorDown)
        )?;

        let block_start = plan.block_start_row as usize;
        for visible_row in 0..plan.draw_count {
            queue!(self.stdout, MoveTo(0, (block_start + visible_row) as u16))?;
            if let Some(line) = frame.lines.get(plan.skip + visible_row) {
                self.write_span_line(line, width)?;
            }
        }
        self.place_cursor(frame.cursor, plan.skip, block_start, height)?;

        self.inline.block_start_row = plan.block_start_row;
        self.inline.last_frame.clone_from(&frame.lines);
        self.inline.last_cursor = frame.cursor;
        self.inline.last_size = self.size;
        self.inline.has_rendered_once = true;

        queue!(self.stdout, EndSynchronizedUpdate)?;
        self.stdout.flush()
    }

    fn place_cursor(
        &mut self,
        cursor: Option<CursorPos>,
        skip: usize,
        block_start: usize,
        height: usize,
    ) -> io::Result<()> {
        let target = cursor.and_then(|cursor| {
            let row = (cursor.row as usize).checked_sub(skip)? + block_start;
            (row < height).then_some((cursor.col, row as u16))
        });
        match target {
            Some((col, row)) => {
                let col = col.min(self.size.width.saturating_sub(1));
                queue!(self.stdout, MoveTo(col, row), Show)?;
            }
            None => {
                queue!(self.stdout, Hide)?;
            }
        }
        Ok(())
    }

    fn write_span_line(&mut self, line: &SpanLine, width: u16) -> io::Result<()> {
        // One spare column keeps the terminal from wrapping on the last cell.
        let render_width = usize::from(if width > 1 { width - 1 } else { width });
        let mut used = 0usize;
        for span in line {
            if used >= render_width {
                break;
            }
            let clipped = clip_to_width(&span.text, render_width - used);
            if clipped.is_empty() {
                continue;
            }
            if let Some(color) = span.style.color {
                queue!(self.stdout, SetForegroundColor(map_color(color)))?;
            }
            if span.style.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            if span.style.dim {
                queue!(self.stdout, SetAttribute(Attribute::Dim))?;
            }
            queue!(self.stdout, Print(clipped.as_str()), ResetColor)?;
            if span.style.bold || span.style.dim {
                queue!(self.stdout, SetAttribute(Attribute::NormalIntensity))?;
            }
            used = used.saturating_add(UnicodeWidthStr::width(clipped.as_str()));
        }
        Ok(())
    }
}

fn map_color(color: Color) -> CrosstermColor {
    match color {
        Color::DarkGrey => CrosstermColor::DarkGrey,
        Color::Cyan => CrosstermColor::DarkCyan,
    }
}

fn map_key_event(key: CrosstermKeyEvent) -> KeyEvent {
    KeyEvent {
        code: map_key_code(key.code),
        modifiers: map_key_modifiers(key.modifiers),
    }
}

fn map_key_code(code: CrosstermKeyCode) -> KeyCode {
    match code {
        CrosstermKeyCode::Char(ch) => KeyCode::Char(ch),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        _ => KeyCode::Unknown,
    }
}

fn map_key_modifiers(modifiers: CrosstermKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::NONE;
    if modifiers.contains(CrosstermKeyModifiers::SHIFT) {
        out = out | KeyModifiers::SHIFT;
    }
    if modifiers.contains(CrosstermKeyModifiers::CONTROL) {
        out = out | KeyModifiers::CONTROL;
    }
    if modifiers.contains(CrosstermKeyModifiers::ALT) {
        out = out | KeyModifiers::ALT;
    }
    out
}

fn clip_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars().filter(|ch| !matches!(ch, '\n' | '\r')) {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used.saturating_add(ch_width) > max_width {
            break;
        }
        out.push(ch);
        used = used.saturating_add(ch_width);
    }
    out
}
