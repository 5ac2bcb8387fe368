use service_search::source::{CandidateFetch, FileSource};
use service_search::state::{AppState, Outcome};
use service_search::runtime::command::Command;
use service_search::runtime::event::SystemEvent;
use service_search::terminal::{KeyCode, KeyEvent, TerminalSize};
use service_search::ui::renderer::Renderer;
use service_search::ui::span::line_text;
use service_search::widgets::components::{FieldWidth, SearchInput, ViewState};
use service_search::{Candidate, ZoneId};
use std::io::Write;
use std::time::{Duration, Instant};

const SIZE: TerminalSize = TerminalSize {
    width: 60,
    height: 20,
};

fn start(payload: &str) -> (AppState, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{payload}").expect("write fixture");

    let fetch = CandidateFetch::spawn(Box::new(FileSource::new(file.path())), ZoneId::default());
    let view = SearchInput::new("service", "").with_placeholder("What service do you need?");
    let mut state = AppState::new(view).with_fetch(fetch);
    state.handle_system_event(SystemEvent::SurfaceResized(SIZE));

    let deadline = Instant::now() + Duration::from_secs(5);
    while state.is_loading() && Instant::now() < deadline {
        state.handle_command(Command::Tick);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!state.is_loading(), "fetch should resolve");
    (state, file)
}

fn type_text(state: &mut AppState, text: &str) {
    for ch in text.chars() {
        state.handle_command(Command::InputKey(KeyEvent::plain(KeyCode::Char(ch))));
    }
}

fn screen(state: &AppState) -> Vec<String> {
    Renderer::default()
        .render(state, SIZE)
        .lines
        .iter()
        .map(|line| line_text(line))
        .collect()
}

#[test]
fn typing_filters_and_enter_selects() {
    let (mut state, _file) = start(
        r#"[{"id":"1","name":"Plumbing"},{"id":"2","name":"Painting"},{"id":"3","name":"Gardening"}]"#,
    );
    assert_eq!(screen(&state), vec!["What service do you need?"]);

    type_text(&mut state, "P");
    assert_eq!(screen(&state), vec!["Plumbing", "> Plumbing", "  Painting"]);

    type_text(&mut state, "a");
    assert_eq!(state.view().view().field_width, FieldWidth::Measured(2));
    assert_eq!(screen(&state), vec!["Painting", "> Painting"]);

    state.handle_command(Command::InputKey(KeyEvent::plain(KeyCode::Enter)));
    assert_eq!(
        state.take_outcome(),
        Some(Outcome::Selected(Candidate::new("2", "Painting")))
    );
}

#[test]
fn malformed_payload_degrades_to_no_candidates() {
    let (mut state, _file) = start(r#"{"error":"zone not found"}"#);
    assert!(state.view().candidates().is_empty());

    type_text(&mut state, "Plu");
    assert_eq!(state.view().state(), ViewState::Searching);
    assert_eq!(screen(&state), vec!["Plu"]);
}

#[test]
fn escape_binding_cancels() {
    let (mut state, _file) = start(r#"[{"id":"1","name":"Plumbing"}]"#);
    let bindings = service_search::runtime::key_bindings::KeyBindings::new();
    let command = bindings.resolve(KeyEvent::plain(KeyCode::Esc));
    state.handle_command(command);
    assert_eq!(state.take_outcome(), Some(Outcome::Cancelled));
}
