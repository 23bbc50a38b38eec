//! Newick parser and writer for binary phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse restricted Newick strings
//! into a [`PhyloTree`] and [`to_newick`] to write a tree back.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single string
//! * [`parse_file`] - parses the first line of a file
//!
//! # Full API
//! For more control, configure a [`NewickParser`] and provide a [`CharParser`]:
//! * [`NewickParser::parse_str`] - parse a single tree
//!
//! # Format
//! Only a restricted subset of Newick is accepted:
//! * `tree ::= group ';'`
//! * `group ::= '(' member [',' member] ')' [name]`
//! * `member ::= group | name`
//! * `name ::= (alphabetic | '.' | ' ' | '_' | '/' | '-' | '+' | '*')+`
//!
//! Furthermore:
//! * Names may contain but not start with a space, and are trimmed
//! * No whitespace between elements, no newlines, no comments
//! * No branch lengths (`:` is rejected), no quoted names, no digits
//! * At most two members per group (binary trees only)
//! * Everything after the terminating `;` is ignored

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::to_newick;

use crate::model::PhyloTree;
use crate::parser::{CharParser, ParsingError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`PhyloTree`].
///
/// This is a convenience function for quick parsing of a single Newick string
/// using default settings and thus not requiring configuration of a parser.
///
/// # Arguments
/// * `newick` - The Newick string to parse
///
/// # Returns
/// * [`PhyloTree`] - Re-rooted tree parsed from the string
/// * [`ParsingError`] - If the string is not valid (restricted) Newick
///
/// # Example
/// ```
/// use circlewick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula cirrhata,(Fratercula arctica,Fratercula corniculata));").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let mut char_parser = CharParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut char_parser)
}

/// Parses the Newick string on the first line of a file.
///
/// Further lines are ignored, as is everything after the terminating `;`.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Returns
/// * [`PhyloTree`] - Tree parsed from the first line
/// * [`ParsingError`] - If reading fails or the line is not valid Newick
///
/// # Example
/// ```no_run
/// use circlewick::newick::parse_file;
///
/// let tree = parse_file("gut_genera.nwk")?;
/// println!("Parsed tree with {} leaves", tree.num_leaves());
/// # Ok::<(), circlewick::parser::ParsingError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<PhyloTree, ParsingError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    parse_str(line.trim_end_matches(['\n', '\r']))
}
