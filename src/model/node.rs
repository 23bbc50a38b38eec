//! Node module for phylogenetic tree representation.

use crate::model::tree::NodeIndex;

// =#========================================================================#=
// TREE NODE
// =#========================================================================#=
/// Represents a node (taxon or bifurcation) in a phylogenetic tree that is
/// to be drawn circularly.
///
/// A node is either:
/// - **Leaf**: Has no children, name is the taxon name
/// - **Internal**: Has one or two children, name might be empty
///
/// Nodes live in the arena of a [PhyloTree](crate::model::PhyloTree) and refer
/// to each other only via [NodeIndex]. The `parent` slot is a back-reference
/// used for ascent and depth computation; children are owned by the tree.
///
/// # Invariants
/// - `degree` is the number of set slots among `parent`, `left` and `right`,
///   and is kept up to date by the slot setters
/// - `depth` is 1 for the root and `parent.depth + 1` otherwise
///   (re-established by [PhyloTree::update_depths](crate::model::PhyloTree::update_depths))
/// - `coords[2]` (z) is never written by this crate
/// - `offset` and `coefficient` are only meaningful after layout
/// - `sample_counts` is only populated for leaves
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeNode {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Taxon name for leaves, optional group name for internal nodes
    name: String,
    /// Position (x, y, z)
    coords: [f64; 3],
    /// Index of the parent node
    parent: Option<NodeIndex>,
    /// Index of the left child
    left: Option<NodeIndex>,
    /// Index of the right child
    right: Option<NodeIndex>,
    /// Number of set neighbor slots (parent, left, right)
    degree: u8,
    /// Depth in the tree, root has depth 1
    depth: usize,
    /// Constant term of `coords = coefficient * parent_coords + offset`
    offset: [f64; 2],
    /// Linear term of `coords = coefficient * parent_coords + offset`
    coefficient: [f64; 2],
    /// Fraction of the population per sample (leaves only)
    sample_counts: Vec<f64>,
}

/// Slot position of the parent in [TreeNode::neighbors].
pub const PARENT_SLOT: usize = 0;
/// Slot position of the left child in [TreeNode::neighbors].
pub const LEFT_SLOT: usize = 1;
/// Slot position of the right child in [TreeNode::neighbors].
pub const RIGHT_SLOT: usize = 2;

impl TreeNode {
    /// Creates a new unconnected node without name at depth 1.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    pub fn new(index: NodeIndex) -> Self {
        TreeNode {
            index,
            name: String::new(),
            coords: [0.0; 3],
            parent: None,
            left: None,
            right: None,
            degree: 0,
            depth: 1,
            offset: [0.0; 2],
            coefficient: [0.0; 2],
            sample_counts: Vec::new(),
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the name of this node (empty if none was given).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether a name has been assigned to this node.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Sets the name of this node.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Returns all three coordinates (x, y, z).
    pub fn coords(&self) -> [f64; 3] {
        self.coords
    }

    /// Returns the coordinate `i` (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    /// Panics if `i > 2`.
    pub fn coord(&self, i: usize) -> f64 {
        self.coords[i]
    }

    /// Sets the coordinate `i` (0 = x, 1 = y, 2 = z).
    ///
    /// # Panics
    /// Panics if `i > 2`.
    pub fn set_coord(&mut self, i: usize, value: f64) {
        self.coords[i] = value;
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the index of the left child, if any.
    pub fn left(&self) -> Option<NodeIndex> {
        self.left
    }

    /// Returns the index of the right child, if any.
    pub fn right(&self) -> Option<NodeIndex> {
        self.right
    }

    /// Returns the neighbor slots in the order parent, left, right.
    pub fn neighbors(&self) -> [Option<NodeIndex>; 3] {
        [self.parent, self.left, self.right]
    }

    /// Sets or clears the parent slot, keeping the degree up to date.
    pub fn set_parent(&mut self, parent: Option<NodeIndex>) {
        Self::set_slot(&mut self.parent, &mut self.degree, parent);
    }

    /// Sets or clears the left child slot, keeping the degree up to date.
    pub fn set_left(&mut self, left: Option<NodeIndex>) {
        Self::set_slot(&mut self.left, &mut self.degree, left);
    }

    /// Sets or clears the right child slot, keeping the degree up to date.
    pub fn set_right(&mut self, right: Option<NodeIndex>) {
        Self::set_slot(&mut self.right, &mut self.degree, right);
    }

    fn set_slot(slot: &mut Option<NodeIndex>, degree: &mut u8, value: Option<NodeIndex>) {
        match (slot.is_some(), value.is_some()) {
            (false, true) => *degree += 1,
            (true, false) => *degree -= 1,
            _ => {}
        }
        *slot = value;
    }

    /// Returns the number of set neighbor slots (parent, left, right).
    pub fn degree(&self) -> u8 {
        self.degree
    }

    /// Returns the depth of this node (root has depth 1).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Sets the depth of this node.
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Returns the layout offset.
    pub fn offset(&self) -> [f64; 2] {
        self.offset
    }

    /// Sets the layout offset.
    pub fn set_offset(&mut self, offset: [f64; 2]) {
        self.offset = offset;
    }

    /// Returns the layout coefficient.
    pub fn coefficient(&self) -> [f64; 2] {
        self.coefficient
    }

    /// Sets the layout coefficient.
    pub fn set_coefficient(&mut self, coefficient: [f64; 2]) {
        self.coefficient = coefficient;
    }

    /// Returns the per-sample population fractions (empty for internal nodes).
    pub fn sample_counts(&self) -> &[f64] {
        &self.sample_counts
    }

    /// Attaches the per-sample population fractions.
    pub fn set_sample_counts(&mut self, counts: Vec<f64>) {
        self.sample_counts = counts;
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the children that are set, left before right.
    pub fn children(&self) -> impl Iterator<Item = NodeIndex> {
        self.left.into_iter().chain(self.right)
    }

    /// Returns the number of children (0, 1 or 2).
    pub fn num_children(&self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    /// Decrements every stored index (own and neighbors) that lies above
    /// `removed`, used when the node at `removed` is taken out of the arena.
    pub(crate) fn shift_indices_above(&mut self, removed: NodeIndex) {
        if self.index > removed {
            self.index -= 1;
        }
        for i in [&mut self.parent, &mut self.left, &mut self.right]
            .into_iter()
            .flatten()
        {
            if *i > removed {
                *i -= 1;
            }
        }
    }
}
