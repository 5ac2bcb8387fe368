use crate::core::Candidate;
use crate::runtime::command::Command;
use crate::runtime::event::{SystemEvent, WidgetAction};
use crate::source::CandidateFetch;
use crate::widgets::components::SearchInput;
use crate::widgets::traits::{InteractionResult, Interactive};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Selected(Candidate),
    Cancelled,
}

/// Everything the event loop mutates: the search component, the pending
/// startup fetch, and how the session ended.
pub struct AppState {
    view: SearchInput,
    fetch: Option<CandidateFetch>,
    outcome: Option<Outcome>,
}

impl AppState {
    pub fn new(view: SearchInput) -> Self {
        Self {
            view,
            fetch: None,
            outcome: None,
        }
    }

    pub fn with_fetch(mut self, fetch: CandidateFetch) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn view(&self) -> &SearchInput {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.as_ref().is_some_and(CandidateFetch::is_pending)
    }

    pub fn should_exit(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.outcome.take()
    }

    /// Applies one command. Returns whether a render is needed.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Cancel => {
                self.outcome = Some(Outcome::Cancelled);
                true
            }
            Command::InputKey(key) => {
                let result = self.view.on_key(key);
                self.apply_result(result)
            }
            Command::TextAction(action) => {
                let result = self.view.on_text_action(action);
                self.apply_result(result)
            }
            Command::Tick => self.poll_fetch(),
        }
    }

    pub fn handle_system_event(&mut self, event: SystemEvent) -> bool {
        let result = self.view.on_system_event(&event);
        self.apply_result(result)
    }

    fn poll_fetch(&mut self) -> bool {
        let Some(candidates) = self.fetch.as_mut().and_then(CandidateFetch::poll) else {
            return false;
        };
        self.fetch = None;
        self.handle_system_event(SystemEvent::CandidatesLoaded(candidates));
        true
    }

    fn apply_result(&mut self, result: InteractionResult) -> bool {
        for action in result.actions {
            match action {
                WidgetAction::Submit(candidate) => {
                    info!(id = %candidate.id, name = %candidate.name, "candidate selected");
                    self.outcome = Some(Outcome::Selected(candidate));
                }
            }
        }
        result.request_render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ZoneId;
    use crate::source::StaticSource;
    use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
    use crate::widgets::traits::TextAction;
    use std::time::{Duration, Instant};

    fn key(code: KeyCode) -> Command {
        Command::InputKey(KeyEvent::plain(code))
    }

    fn loaded_state() -> AppState {
        let fetch = CandidateFetch::spawn(
            Box::new(StaticSource::new(vec![
                Candidate::new("1", "Plumbing"),
                Candidate::new("2", "Painting"),
            ])),
            ZoneId::default(),
        );
        let mut state = AppState::new(SearchInput::new("search", "")).with_fetch(fetch);
        state.handle_system_event(SystemEvent::SurfaceResized(TerminalSize {
            width: 80,
            height: 24,
        }));

        let deadline = Instant::now() + Duration::from_secs(5);
        while state.is_loading() && Instant::now() < deadline {
            state.handle_command(Command::Tick);
            std::thread::sleep(Duration::from_millis(5));
        }
        state
    }

    #[test]
    fn tick_delivers_fetched_candidates() {
        let state = loaded_state();
        assert!(!state.is_loading());
        assert_eq!(state.view().candidates().len(), 2);
    }

    #[test]
    fn enter_on_highlighted_match_ends_with_selection() {
        let mut state = loaded_state();
        for ch in "Pai".chars() {
            state.handle_command(key(KeyCode::Char(ch)));
        }
        state.handle_command(key(KeyCode::Enter));

        assert!(state.should_exit());
        assert_eq!(
            state.take_outcome(),
            Some(Outcome::Selected(Candidate::new("2", "Painting")))
        );
    }

    #[test]
    fn cancel_ends_without_selection() {
        let mut state = loaded_state();
        assert!(state.handle_command(Command::Cancel));
        assert_eq!(state.outcome(), Some(&Outcome::Cancelled));
    }

    #[test]
    fn word_delete_goes_through_the_view() {
        let mut state = loaded_state();
        for ch in "Plu".chars() {
            state.handle_command(key(KeyCode::Char(ch)));
        }
        assert!(state.handle_command(Command::TextAction(TextAction::DeleteWordLeft)));
        assert_eq!(state.view().query(), "");
    }

    #[test]
    fn idle_tick_requests_no_render() {
        let mut state = AppState::new(SearchInput::new("search", ""));
        assert!(!state.handle_command(Command::Tick));
    }
}
