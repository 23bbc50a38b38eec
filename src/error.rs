//! Crate-level error type for the full pipeline.

use crate::model::tree::NodeIndex;
use crate::parser::parsing_error::ParsingError;
use thiserror::Error;

/// Errors that abort building a [CircularTree](crate::CircularTree).
///
/// All of them are fatal: no partially laid out tree is ever returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// The Newick string could not be parsed
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    /// A leaf has no entry in the counts data
    #[error("Leaf '{label}' has no entry in the counts data")]
    MissingCounts {
        /// Trimmed name of the leaf
        label: String,
    },
    /// The layout recurrence cannot be solved numerically
    #[error("Degenerate layout at node {node}: {reason}")]
    DegenerateLayout {
        /// Index of the node at which the computation broke down
        node: NodeIndex,
        /// What went wrong
        reason: String,
    },
}
