//! Off-screen text measurement.
//!
//! The probe answers "how many terminal columns would this text take in the
//! query field". It never draws and never takes focus. Until it is attached
//! to a terminal surface it has nothing to measure against and reports
//! `None`.

use crate::terminal::TerminalSize;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidthProbe {
    surface: Option<TerminalSize>,
}

impl WidthProbe {
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attached(size: TerminalSize) -> Self {
        let mut probe = Self::default();
        probe.attach(size);
        probe
    }

    /// A zero-width surface counts as not attached.
    pub fn attach(&mut self, size: TerminalSize) {
        self.surface = (size.width > 0).then_some(size);
    }

    pub fn detach(&mut self) {
        self.surface = None;
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn measure(&self, text: &str) -> Option<u16> {
        self.surface?;
        Some(u16::try_from(text_width(text)).unwrap_or(u16::MAX))
    }

    pub fn measure_width(&self, text: &str) -> u16 {
        self.measure(text).unwrap_or(0)
    }
}

/// Column width of `text` laid out as one run. Joined sequences such as
/// lam-alef or ZWJ emoji are measured as a unit, so a string's width is not
/// always the sum of its chars' widths. Everything that positions text next
/// to a measured field goes through this.
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
