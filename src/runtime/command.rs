use crate::terminal::KeyEvent;
use crate::widgets::traits::TextAction;

#[derive(Debug, Clone)]
pub enum Command {
    /// Leave without a selection.
    Cancel,
    InputKey(KeyEvent),
    TextAction(TextAction),
    Tick,
}
