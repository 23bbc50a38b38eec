//! Constants and character classes for the Newick parser and writer.

/// Punctuation that may occur within names, besides alphabetic characters
pub(crate) const NAME_PUNCTUATION: &[char] = &['.', ' ', '_', '/', '-', '+', '*'];

/// Default maximum length of a single name run
pub(crate) const DEFAULT_MAX_NAME_LEN: usize = 500;

/// Returns whether `c` may occur within a name.
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || NAME_PUNCTUATION.contains(&c)
}

/// Returns whether `c` may start a name (a space may not).
pub(crate) fn is_name_start(c: char) -> bool {
    c != ' ' && is_name_char(c)
}
