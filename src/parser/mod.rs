//! Basic low-level parser functionality.
pub mod char_parser;
pub mod parsing_error;

pub use char_parser::CharParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
