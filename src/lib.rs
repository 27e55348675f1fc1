// src/lib.rs
pub mod colors;
pub mod error;
pub mod fields;
pub mod writer;

pub use colors::{should_use_colors, should_use_colors_for, Styles};
pub use error::FormatError;
pub use writer::{ConsoleWriter, Formatter, WriterConfig, DEFAULT_TIME_FORMAT};
