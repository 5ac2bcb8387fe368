pub mod width_probe;

pub use width_probe::{WidthProbe, text_width};
