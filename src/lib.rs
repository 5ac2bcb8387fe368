//! Search field with inline autosuggest for a small, eagerly loaded list of
//! named entries.
//!
//! The matching itself is a pure function ([`core::search::suggest`]); the
//! terminal component in [`widgets::components::search_input`] drives it on
//! every keystroke and keeps the ghost completion aligned with the typed text.

pub mod config;
pub mod core;
pub mod runtime;
pub mod source;
pub mod state;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use core::search::{Suggestion, suggest};
pub use core::{Candidate, ZoneId};
