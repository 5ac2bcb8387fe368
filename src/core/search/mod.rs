pub mod suggest;

pub use suggest::{Suggestion, suggest};
