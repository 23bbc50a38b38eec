//! Data model for binary phylogenetic trees laid out on a circle.
//!
//! # Tree representation
//! Trees are represented by [PhyloTree], which uses the arena pattern to store
//! [TreeNode]s, referenced by [NodeIndex]. A node has a parent slot and a left
//! and right child slot; its degree counts the slots that are set.
//!
//! | Type | Role |
//! |------|------|
//! | [TreeNode] | Taxon or bifurcation, with coordinates and layout scratch values |
//! | [PhyloTree] | Arena of nodes with root index and height |
//! | [Edge] | Snapshot of the coordinates of a node and its parent |
//!
//! # Building trees
//! Trees are typically obtained from the
//! [NewickParser](crate::newick::NewickParser), which also re-roots them and
//! computes depths. After layout and finalization the nodes move into a
//! read-only [CircularTree](crate::CircularTree).

pub mod edge;
pub mod node;
pub mod tree;

pub use edge::Edge;
pub use node::TreeNode;
pub use tree::NodeIndex;
pub use tree::PhyloTree;
pub use tree::{PostOrderIter, PreOrderIter};
