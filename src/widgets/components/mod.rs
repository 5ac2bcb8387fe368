pub mod scroll;
pub mod search_input;

pub use search_input::{FieldWidth, SearchInput, SearchView, ViewState};
