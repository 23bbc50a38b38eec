//! Error types for the Newick parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while parsing tree descriptions.

use crate::parser::char_parser::CharParser;
use std::fmt;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur while parsing a Newick string.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    /// Unbalanced parentheses, invalid character, or an ascent without parent
    #[error("Malformed newick string: {0}")]
    MalformedNewick(String),
    /// The top level of the description does not hold exactly one subtree
    #[error("Re-rooting failed: {0}")]
    ReRoot(String),
    /// A single name run exceeded the configured maximum length
    #[error("Name longer than {limit} characters, possibly an unrecognized character")]
    NameScanOverflow {
        /// Maximum number of characters allowed in a name
        limit: usize,
    },
    /// A `:` introducing a branch length was found
    #[error("Branch lengths are not supported")]
    UnsupportedBranchLength,
    /// Reading the input failed
    #[error("IO error - {0}")]
    Io(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and following characters).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser(kind: ParsingErrorType, parser: &CharParser<'_>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for MalformedNewick
    pub fn malformed_newick(parser: &CharParser<'_>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::MalformedNewick(msg), parser)
    }

    /// Convenience constructor for ReRoot
    pub fn re_root(parser: &CharParser<'_>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::ReRoot(msg), parser)
    }

    /// Convenience constructor for NameScanOverflow
    pub fn name_scan_overflow(parser: &CharParser<'_>, limit: usize) -> Self {
        Self::from_parser(ParsingErrorType::NameScanOverflow { limit }, parser)
    }

    /// Convenience constructor for UnsupportedBranchLength
    pub fn unsupported_branch_length(parser: &CharParser<'_>) -> Self {
        Self::from_parser(ParsingErrorType::UnsupportedBranchLength, parser)
    }

    /// Create a ParsingError without parser context (e.g. for IO errors)
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position (byte offset) where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the input following the error position
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;

        if !self.context.is_empty() {
            write!(
                f,
                "\n  Context (next {} chars): {}",
                self.context.chars().count(),
                self.context
            )?;
        }

        Ok(())
    }
}

impl std::error::Error for ParsingError {}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        Self::without_context(ParsingErrorType::Io(err.to_string()))
    }
}
