//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, a small state machine that
//! walks a description character by character, moving a single cursor through
//! the tree under construction.

use crate::model::tree::{NodeIndex, PhyloTree};
use crate::newick::defs::{DEFAULT_MAX_NAME_LEN, is_name_char, is_name_start};
use crate::parser::char_parser::CharParser;
use crate::parser::parsing_error::ParsingError;
use tracing::{debug, trace, warn};

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for single Newick strings describing binary
/// phylogenetic trees.
///
/// Parsing starts with a cursor at a synthetic, empty root that wraps the
/// whole description. The first `(` creates the top-level node below it. When
/// the terminating `;` is reached, the synthetic root must have exactly this
/// one child, which then becomes the real root (re-rooting).
///
/// # Configuration
/// * [`with_max_name_len(max)`](Self::with_max_name_len)
///     - Maximum number of characters in a single name (default 500). Longer
///       runs are reported as [NameScanOverflow](crate::parser::ParsingErrorType::NameScanOverflow).
///
/// # Example
/// ```
/// use circlewick::newick::NewickParser;
/// use circlewick::parser::CharParser;
///
/// let mut char_parser = CharParser::for_str("((Anas,Aythya),Anser);");
/// let tree = NewickParser::new().parse_str(&mut char_parser).unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.height(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    max_name_len: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with default settings.
    pub fn new() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }

    /// Sets the maximum number of characters a single name may have.
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }

    /// Returns the maximum number of characters a single name may have.
    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses a single Newick tree from the given [CharParser].
    ///
    /// Characters after the terminating `;` are not consumed.
    ///
    /// # Arguments
    /// * `parser` - The char parser positioned at the start of a Newick string
    ///
    /// # Returns
    /// * `Ok(PhyloTree)` - The parsed, re-rooted tree with depths computed
    /// * `Err(ParsingError)` - If the description is malformed; no partial
    ///   tree is returned
    pub fn parse_str(&self, parser: &mut CharParser<'_>) -> Result<PhyloTree, ParsingError> {
        let mut tree = PhyloTree::new();
        let mut cursor = tree.root_index();
        let mut open_groups = 0usize;

        loop {
            let Some(c) = parser.peek() else {
                return Err(ParsingError::malformed_newick(
                    parser,
                    "Missing terminating ';'".to_string(),
                ));
            };

            match c {
                '(' => {
                    cursor = self.open_group(&mut tree, cursor, parser)?;
                    open_groups += 1;
                    parser.next_char();
                }
                ')' => {
                    if open_groups == 0 {
                        return Err(ParsingError::malformed_newick(
                            parser,
                            "Unbalanced ')' without matching '('".to_string(),
                        ));
                    }
                    cursor = self.ascend(&tree, cursor, parser)?;
                    open_groups -= 1;
                    parser.next_char();
                }
                ',' => {
                    cursor = self.add_sibling(&mut tree, cursor, parser)?;
                    parser.next_char();
                }
                ';' => {
                    if open_groups > 0 {
                        return Err(ParsingError::malformed_newick(
                            parser,
                            format!("{open_groups} unclosed '(' at end of tree"),
                        ));
                    }
                    self.re_root(&mut tree, parser)?;
                    parser.next_char();
                    return Ok(tree);
                }
                ' ' => {
                    return Err(ParsingError::malformed_newick(
                        parser,
                        "Unexpected whitespace outside of a name".to_string(),
                    ));
                }
                ':' => {
                    warn!(position = parser.position(), "branch length in newick string");
                    return Err(ParsingError::unsupported_branch_length(parser));
                }
                c if is_name_start(c) => {
                    let name = parser
                        .scan_run(is_name_char, self.max_name_len)?
                        .unwrap_or_default();
                    trace!(node = cursor, name = name.trim(), "named node");
                    tree.node_mut(cursor).set_name(name.trim());
                }
                other => {
                    return Err(ParsingError::malformed_newick(
                        parser,
                        format!("Invalid character {other:?}"),
                    ));
                }
            }
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Handles `(`: creates a new left child of the cursor and returns it as
    /// new cursor.
    ///
    /// At the synthetic root, the top-level node is created first and the
    /// new child is placed below it, so the synthetic root only ever gets the
    /// top-level node as child.
    fn open_group(
        &self,
        tree: &mut PhyloTree,
        cursor: NodeIndex,
        parser: &CharParser<'_>,
    ) -> Result<NodeIndex, ParsingError> {
        let node = tree.node(cursor);
        if node.has_name() || !node.is_leaf() {
            return Err(ParsingError::malformed_newick(
                parser,
                "Unexpected '(' after a name or subtree".to_string(),
            ));
        }

        let group = if cursor == tree.root_index() {
            let top = tree.add_node();
            tree.attach_left(cursor, top);
            top
        } else {
            cursor
        };

        let first = tree.add_node();
        tree.attach_left(group, first);
        Ok(first)
    }

    /// Handles `)`: returns the parent of the cursor.
    fn ascend(
        &self,
        tree: &PhyloTree,
        cursor: NodeIndex,
        parser: &CharParser<'_>,
    ) -> Result<NodeIndex, ParsingError> {
        tree.node(cursor).parent().ok_or_else(|| {
            ParsingError::malformed_newick(parser, "Node has no parent to ascend to".to_string())
        })
    }

    /// Handles `,`: creates a new right child of the cursor's parent and
    /// returns it as new cursor.
    fn add_sibling(
        &self,
        tree: &mut PhyloTree,
        cursor: NodeIndex,
        parser: &CharParser<'_>,
    ) -> Result<NodeIndex, ParsingError> {
        let parent = self.ascend(tree, cursor, parser)?;
        if tree.node(parent).right().is_some() {
            return Err(ParsingError::malformed_newick(
                parser,
                "More than two children, only binary trees are supported".to_string(),
            ));
        }

        let sibling = tree.add_node();
        tree.attach_right(parent, sibling);
        Ok(sibling)
    }

    /// Handles `;`: replaces the synthetic root by its only child and
    /// recomputes depths.
    fn re_root(&self, tree: &mut PhyloTree, parser: &CharParser<'_>) -> Result<(), ParsingError> {
        match tree.root().num_children() {
            0 => {
                return Err(ParsingError::re_root(
                    parser,
                    "Empty tree, no subtree at top level".to_string(),
                ));
            }
            2 => {
                return Err(ParsingError::re_root(
                    parser,
                    "Too many children, more than one subtree at top level".to_string(),
                ));
            }
            _ => {}
        }

        if tree.discard_root().is_none() {
            return Err(ParsingError::re_root(
                parser,
                "Could not promote top-level subtree to root".to_string(),
            ));
        }

        debug!(
            num_nodes = tree.num_nodes(),
            num_leaves = tree.num_leaves(),
            height = tree.height(),
            "parsed newick tree"
        );
        Ok(())
    }
}
