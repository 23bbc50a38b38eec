//! Low-level character-by-character parser for tree descriptions.
//!
//! This module provides [CharParser] for parsing text-based descriptions with
//! support for peeking, consuming, and scanning name runs. Used as the
//! foundation for the Newick parser.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// CHAR PARSER
// =#========================================================================#=
/// A character-by-character parser over a string slice with support for
/// peeking, consuming and scanning runs of characters.
///
/// Positions are byte offsets into the input, so they can be used to slice
/// the input for error context.
///
/// # Example
/// ```
/// use circlewick::parser::CharParser;
///
/// let mut parser = CharParser::for_str("(Homo sapiens,Pan);");
/// assert!(parser.consume_if('('));
/// let name = parser.scan_run(|c| c.is_alphabetic() || c == ' ', 500).unwrap();
/// assert_eq!(name, Some("Homo sapiens".to_string()));
/// assert_eq!(parser.peek(), Some(','));
/// ```
pub struct CharParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> CharParser<'a> {
    /// Creates a new `CharParser` over the given string.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    pub fn for_str(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Peeks at the current character without consuming it.
    ///
    /// # Returns
    /// * `Some(char)` - The current character if available
    /// * `None` - If at end of input
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Gets the current character and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(char)` - The current character if available
    /// * `None` - If at end of input
    #[inline]
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Checks if the current character is `ch`.
    pub fn peek_is(&self, ch: char) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current character if it is `ch`.
    ///
    /// # Returns
    /// `true` if the character was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: char) -> bool {
        if self.peek_is(ch) {
            self.next_char();
            true
        } else {
            false
        }
    }

    /// Consumes a run of characters accepted by `accept`.
    ///
    /// # Arguments
    /// * `accept` - Predicate deciding whether a character belongs to the run
    /// * `max_len` - Maximum number of characters in the run
    ///
    /// # Returns
    /// * `Ok(Some(run))` - The (non-empty) run
    /// * `Ok(None)` - The current character does not start a run (nothing consumed)
    /// * `Err(ParsingError)` - The run is longer than `max_len` characters
    pub fn scan_run<F>(&mut self, accept: F, max_len: usize) -> Result<Option<String>, ParsingError>
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        let mut len = 0;
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            len += 1;
            if len > max_len {
                return Err(ParsingError::name_scan_overflow(self, max_len));
            }
            self.next_char();
        }

        if self.pos == start {
            Ok(None)
        } else {
            Ok(Some(self.input[start..self.pos].to_string()))
        }
    }

    /// Returns whether the end of input has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current parser position (byte offset) in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns up to `k` characters from the current position for error context.
    pub fn get_context_as_string(&self, k: usize) -> String {
        self.input[self.pos..].chars().take(k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;

    #[test]
    fn test_peek_and_consume() {
        let mut parser = CharParser::for_str("(é,");
        assert_eq!(parser.peek(), Some('('));
        assert!(!parser.consume_if(','));
        assert!(parser.consume_if('('));
        assert_eq!(parser.next_char(), Some('é'));
        assert_eq!(parser.position(), 3);
        assert!(parser.consume_if(','));
        assert!(parser.is_eof());
        assert_eq!(parser.next_char(), None);
    }

    #[test]
    fn test_scan_run_stops_at_rejected_char() {
        let mut parser = CharParser::for_str("abc,d");
        let run = parser.scan_run(|c| c.is_alphabetic(), 10).unwrap();
        assert_eq!(run.as_deref(), Some("abc"));
        assert_eq!(parser.peek(), Some(','));

        let empty = parser.scan_run(|c| c.is_alphabetic(), 10).unwrap();
        assert_eq!(empty, None);
        assert_eq!(parser.position(), 3);
    }

    #[test]
    fn test_scan_run_overflow() {
        let input = "a".repeat(11);
        let mut parser = CharParser::for_str(&input);
        let err = parser.scan_run(|c| c.is_alphabetic(), 10).unwrap_err();
        assert_eq!(*err.kind(), ParsingErrorType::NameScanOverflow { limit: 10 });

        // Exactly at the limit is fine
        let mut parser = CharParser::for_str(&input[..10]);
        assert!(parser.scan_run(|c| c.is_alphabetic(), 10).unwrap().is_some());
    }

    #[test]
    fn test_context() {
        let mut parser = CharParser::for_str("(A,B));");
        parser.next_char();
        assert_eq!(parser.get_context_as_string(3), "A,B");
    }
}
