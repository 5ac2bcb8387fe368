use crate::core::Candidate;
use crate::terminal::{TerminalEvent, TerminalSize};

/// Actions emitted by widgets in `InteractionResult`.
/// These flow upward from widgets to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// The user picked a candidate from the list.
    Submit(Candidate),
}

/// Events the runtime pushes down into widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
    /// The startup fetch resolved. Replaces the working set wholesale.
    CandidatesLoaded(Vec<Candidate>),
    /// The rendering surface changed size (or became available).
    SurfaceResized(TerminalSize),
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Terminal(TerminalEvent),
    System(SystemEvent),
}
