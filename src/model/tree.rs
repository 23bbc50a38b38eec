//! Provides the arena-based tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [PhyloTree] - Main tree structure using the arena pattern
//! * [NodeIndex] as type used to index nodes in tree
//! * [PostOrderIter] and [PreOrderIter] for stack-based traversals

use crate::model::node::TreeNode;
use crate::newick;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A binary phylogenetic tree represented using the arena pattern
/// on [TreeNode].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// Children are owned by the arena, the parent slot of a node is a plain
/// index and therefore never forms an ownership cycle.
///
/// # Structure
/// - All nodes (root, internal, and leaves) are stored in the arena
///   in creation order.
/// - Index of root is maintained.
/// - Nodes are strictly binary: at most a left and a right child.
/// - Unlike fully resolved trees, a node may have a single child
///   (e.g. a group with only one member).
///
/// # Construction
/// A fresh tree consists of a single nameless root. Add nodes with
/// [`add_node`](Self::add_node) and connect them with
/// [`attach_left`](Self::attach_left) / [`attach_right`](Self::attach_right).
/// Usually trees are obtained from the [NewickParser](crate::newick::NewickParser).
/// Test validity with [`PhyloTree::is_valid()`].
#[derive(Debug, Clone)]
pub struct PhyloTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<TreeNode>,

    /// Index of the root of this tree
    root_index: NodeIndex,

    /// Maximum depth of any node, as of the last depth update
    height: usize,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl PhyloTree {
    /// Creates a new tree consisting of only a nameless root.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a new tree consisting of only a nameless root,
    /// with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(TreeNode::new(0));
        PhyloTree {
            nodes,
            root_index: 0,
            height: 1,
        }
    }

    /// Adds an unconnected node to the arena and returns its index.
    pub fn add_node(&mut self) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(TreeNode::new(index));
        index
    }

    /// Makes `child` the left child of `parent`.
    ///
    /// Degrees of both nodes are updated and the depth of `child` is set to
    /// `depth(parent) + 1`. A previous left child of `parent` is detached.
    ///
    /// # Panics
    /// Panics if one of the indices is out of bounds.
    pub fn attach_left(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let Some(old) = self.nodes[parent].left() {
            self.nodes[old].set_parent(None);
        }
        self.nodes[parent].set_left(Some(child));
        self.link_to_parent(parent, child);
    }

    /// Makes `child` the right child of `parent`.
    ///
    /// Degrees of both nodes are updated and the depth of `child` is set to
    /// `depth(parent) + 1`. A previous right child of `parent` is detached.
    ///
    /// # Panics
    /// Panics if one of the indices is out of bounds.
    pub fn attach_right(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let Some(old) = self.nodes[parent].right() {
            self.nodes[old].set_parent(None);
        }
        self.nodes[parent].set_right(Some(child));
        self.link_to_parent(parent, child);
    }

    fn link_to_parent(&mut self, parent: NodeIndex, child: NodeIndex) {
        let depth = self.nodes[parent].depth() + 1;
        let child = &mut self.nodes[child];
        child.set_parent(Some(parent));
        child.set_depth(depth);
    }

    /// Discards the root, making its only child the new root.
    ///
    /// The discarded node is removed from the arena, so indices of all nodes
    /// created after it shift down by one. Depths are recomputed from the new
    /// root.
    ///
    /// # Returns
    /// The index of the new root, or `None` (leaving the tree untouched)
    /// if the root does not have exactly one child.
    pub fn discard_root(&mut self) -> Option<NodeIndex> {
        let old_root = self.root_index;
        let root = &self.nodes[old_root];
        if root.num_children() != 1 {
            return None;
        }
        let new_root = root.left().or(root.right())?;

        self.nodes[old_root].set_left(None);
        self.nodes[old_root].set_right(None);
        self.nodes[new_root].set_parent(None);

        self.nodes.remove(old_root);
        for node in &mut self.nodes {
            node.shift_indices_above(old_root);
        }
        self.root_index = if new_root > old_root {
            new_root - 1
        } else {
            new_root
        };

        self.update_depths();
        Some(self.root_index)
    }

    /// Recomputes the depth of every node, starting with depth 1 at the root,
    /// and stores and returns the height (maximum depth).
    ///
    /// Uses an explicit stack, so arbitrarily deep trees are fine.
    pub fn update_depths(&mut self) -> usize {
        let mut height = 1;
        self.nodes[self.root_index].set_depth(1);
        let mut stack = vec![self.root_index];

        while let Some(index) = stack.pop() {
            let depth = self.nodes[index].depth() + 1;
            let [_, left, right] = self.nodes[index].neighbors();
            for child in [left, right].into_iter().flatten() {
                self.nodes[child].set_depth(depth);
                height = height.max(depth);
                stack.push(child);
            }
        }

        self.height = height;
        height
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index]
    }

    /// Returns a mutable reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut TreeNode {
        &mut self.nodes[index]
    }

    /// Returns all nodes in arena (creation) order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves (nodes without children) in this tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of nodes with degree 1.
    ///
    /// These are the nodes the circular layout places on the unit circle:
    /// all leaves, plus the root if it has a single child.
    pub fn total_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.degree() == 1).count()
    }

    /// Returns the height of this tree, i.e. the maximum depth of any node
    /// as of the last depth update (the root alone has height 1).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns an iterator over all leaves in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Returns the Newick representation of this tree.
    pub fn to_newick(&self) -> String {
        newick::to_newick(&self.nodes, self.root_index)
    }

    /// Consumes the tree and returns its arena, root index and height.
    pub(crate) fn into_parts(self) -> (Vec<TreeNode>, NodeIndex, usize) {
        (self.nodes, self.root_index, self.height)
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and the root has no parent
    /// - All node indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this node as a child
    /// - Degrees match the set slots
    /// - Depths: root has depth 1, every other node one more than its parent
    /// - Every node is reachable from the root
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        let n = self.nodes.len();

        // Check root
        if self.root_index >= n {
            return false;
        }
        let root = &self.nodes[self.root_index];
        if root.parent().is_some() || root.depth() != 1 {
            return false;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            // Check node index matches its arena position
            if node.index() != index {
                return false;
            }

            // Check degree bookkeeping
            let set_slots = node.neighbors().iter().filter(|s| s.is_some()).count();
            if usize::from(node.degree()) != set_slots {
                return false;
            }

            // Check children point back to this node as parent
            for child in node.children() {
                if child >= n || self.nodes[child].parent() != Some(index) {
                    return false;
                }
            }

            // Check parent references
            if index != self.root_index {
                match node.parent() {
                    None => return false, // Second root
                    Some(parent) => {
                        if parent >= n {
                            return false;
                        }
                        let p = &self.nodes[parent];
                        if p.left() != Some(index) && p.right() != Some(index) {
                            return false;
                        }
                        if node.depth() != p.depth() + 1 {
                            return false;
                        }
                    }
                }
            }
        }

        // Check connectivity (also rules out cycles given the checks above)
        self.pre_order_iter().count() == n
    }
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<NodeIndex> for PhyloTree {
    type Output = TreeNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

impl std::ops::IndexMut<NodeIndex> for PhyloTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Left subtrees are visited before right subtrees.
    ///
    /// # Example
    /// ```
    /// use circlewick::newick::parse_str;
    ///
    /// let tree = parse_str("(A,(B,C));").unwrap();
    /// let names: Vec<_> = tree.post_order_iter().map(|n| n.name()).collect();
    /// assert_eq!(names, vec!["A", "B", "C", "", ""]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(&self.nodes, self.root_index)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// # Example
    /// ```
    /// use circlewick::newick::parse_str;
    ///
    /// let tree = parse_str("(A,(B,C));").unwrap();
    /// let names: Vec<_> = tree.pre_order_iter().map(|n| n.name()).collect();
    /// assert_eq!(names, vec!["", "A", "", "B", "C"]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(&self.nodes, self.root_index)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    nodes: &'a [TreeNode],
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    pub(crate) fn new(nodes: &'a [TreeNode], root: NodeIndex) -> Self {
        let mut stack = Vec::new();
        if root < nodes.len() {
            stack.push((root, false));
        }
        PostOrderIter { nodes, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.nodes[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));

            // Push right first, so left is processed first
            if let Some(right) = node.right() {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left() {
                self.stack.push((left, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    nodes: &'a [TreeNode],
    stack: Vec<NodeIndex>,
}

impl<'a> PreOrderIter<'a> {
    pub(crate) fn new(nodes: &'a [TreeNode], root: NodeIndex) -> Self {
        let mut stack = Vec::new();
        if root < nodes.len() {
            stack.push(root);
        }
        PreOrderIter { nodes, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.nodes[index];

        // Push right first, so left is processed first
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }

        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `((A,B),C)` by hand
    fn small_tree() -> PhyloTree {
        let mut tree = PhyloTree::new();
        let root = tree.root_index();
        let inner = tree.add_node();
        let a = tree.add_node();
        let b = tree.add_node();
        let c = tree.add_node();
        tree.attach_left(root, inner);
        tree.attach_right(root, c);
        tree.attach_left(inner, a);
        tree.attach_right(inner, b);
        tree.node_mut(a).set_name("A");
        tree.node_mut(b).set_name("B");
        tree.node_mut(c).set_name("C");
        tree.update_depths();
        tree
    }

    #[test]
    fn test_attach_sets_degree_and_depth() {
        let tree = small_tree();
        assert!(tree.is_valid());
        assert_eq!(tree.root().degree(), 2);
        assert_eq!(tree[1].degree(), 3);
        assert_eq!(tree[2].depth(), 3);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.total_leaves(), 3);
    }

    #[test]
    fn test_discard_root_requires_single_child() {
        let mut tree = small_tree();
        assert_eq!(tree.discard_root(), None);
        assert!(tree.is_valid());
        assert_eq!(tree.num_nodes(), 5);
    }

    #[test]
    fn test_discard_root_compacts_arena() {
        let mut tree = PhyloTree::new();
        let top = tree.add_node();
        let a = tree.add_node();
        let b = tree.add_node();
        tree.attach_left(0, top);
        tree.attach_left(top, a);
        tree.attach_right(top, b);

        assert_eq!(tree.discard_root(), Some(0));
        assert_eq!(tree.num_nodes(), 3);
        assert!(tree.is_valid());
        assert_eq!(tree.root().children().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(tree[1].depth(), 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_traversal_orders() {
        let tree = small_tree();
        let post: Vec<_> = tree.post_order_iter().map(|n| n.index()).collect();
        assert_eq!(post, vec![2, 3, 1, 4, 0]);
        let pre: Vec<_> = tree.pre_order_iter().map(|n| n.index()).collect();
        assert_eq!(pre, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_depth_detected() {
        let mut tree = small_tree();
        tree[4].set_depth(7);
        assert!(!tree.is_valid());
    }

    #[test]
    #[should_panic]
    fn test_get_node_out_of_bounds() {
        let tree = PhyloTree::new();
        let _ = &tree[55];
    }
}
