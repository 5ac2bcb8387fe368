use crate::runtime::command::Command;
use crate::runtime::event::{AppEvent, SystemEvent};
use crate::runtime::key_bindings::KeyBindings;
use crate::state::{AppState, Outcome};
use crate::terminal::{Terminal, TerminalEvent};
use crate::ui::renderer::Renderer;
use std::io;
use std::time::Duration;
use tracing::debug;

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

pub struct Runtime {
    state: AppState,
    terminal: Terminal,
    key_bindings: KeyBindings,
    renderer: Renderer,
}

impl Runtime {
    pub fn new(state: AppState, terminal: Terminal) -> Self {
        Self {
            state,
            terminal,
            key_bindings: KeyBindings::new(),
            renderer: Renderer::default(),
        }
    }

    /// Runs until the user submits or cancels. The terminal is restored even
    /// when the loop fails.
    pub fn run(mut self) -> io::Result<Outcome> {
        self.terminal.enter()?;

        let run_result = (|| -> io::Result<()> {
            let size = self.terminal.size();
            self.dispatch(AppEvent::System(SystemEvent::SurfaceResized(size)))?;
            self.render()?;

            while !self.state.should_exit() {
                let event = self.terminal.poll_event(POLL_TIMEOUT)?;
                self.dispatch(AppEvent::Terminal(event))?;
            }
            Ok(())
        })();

        let exit_result = self.terminal.exit();
        run_result.and(exit_result)?;
        Ok(self.state.take_outcome().unwrap_or(Outcome::Cancelled))
    }

    fn dispatch(&mut self, event: AppEvent) -> io::Result<()> {
        let render_requested = match event {
            AppEvent::Terminal(TerminalEvent::Resize(size)) => {
                debug!(width = size.width, height = size.height, "terminal resized");
                self.terminal.set_size(size);
                self.state
                    .handle_system_event(SystemEvent::SurfaceResized(size));
                true
            }
            AppEvent::Terminal(TerminalEvent::Key(key)) => {
                let command = self.key_bindings.resolve(key);
                self.state.handle_command(command)
            }
            AppEvent::Terminal(TerminalEvent::Tick) => self.state.handle_command(Command::Tick),
            AppEvent::System(event) => self.state.handle_system_event(event),
        };

        if render_requested && !self.state.should_exit() {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.renderer.render(&self.state, self.terminal.size());
        self.terminal.render_frame(&frame)
    }
}
