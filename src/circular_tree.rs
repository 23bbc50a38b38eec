//! The finished, read-only circular layout and the builder running the full
//! pipeline (parse, layout, finalize).

use crate::counts::CountsSource;
use crate::error::TreeError;
use crate::layout::{CircularLayout, LayoutConfig};
use crate::model::edge::Edge;
use crate::model::node::TreeNode;
use crate::model::tree::{NodeIndex, PhyloTree, PostOrderIter, PreOrderIter};
use crate::newick::{self, NewickParser};
use crate::parser::CharParser;
use tracing::{debug, warn};

// =$========================================================================$=
// CIRCULAR TREE
// =$========================================================================$=
/// A laid out tree, ready to be handed to a renderer.
///
/// Holds the nodes with their final (scaled) coordinates, every leaf with its
/// per-sample population fractions, and one [Edge] per non-root node. There
/// are no mutable accessors, so a [CircularTree] can be shared freely
/// between threads once built.
///
/// # Example
/// ```
/// use circlewick::build_circular_tree;
/// use std::collections::HashMap;
///
/// let counts: HashMap<String, Vec<f64>> = [("A", 0.2), ("B", 0.8)]
///     .into_iter()
///     .map(|(name, f)| (name.to_string(), vec![f]))
///     .collect();
///
/// let tree = build_circular_tree("(A,B);", &counts).unwrap();
/// assert_eq!(tree.total_leaves(), 2);
/// assert_eq!(tree.edges().len(), 2);
/// assert_eq!(tree.num_samples(), 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CircularTree {
    nodes: Vec<TreeNode>,
    edges: Vec<Edge>,
    root_index: NodeIndex,
    total_leaves: usize,
    height: usize,
    num_samples: usize,
}

// ============================================================================
// Finalization (pub)
// ============================================================================
impl CircularTree {
    /// Finalizes a laid out tree.
    ///
    /// Attaches to every leaf its series from `counts` (looked up by trimmed
    /// name), scales all coordinates as configured, and then snapshots one
    /// edge per non-root node.
    ///
    /// # Arguments
    /// * `tree` - Tree on which [CircularLayout::apply] has run
    /// * `total_leaves` - Number of nodes placed on the circle, as returned by the layout
    /// * `config` - Scaling configuration
    /// * `counts` - Series per taxon
    ///
    /// # Returns
    /// * `Ok(CircularTree)` - The finished tree
    /// * `Err(TreeError::MissingCounts)` - If a leaf has no series in `counts`
    pub fn finalize<C>(
        tree: PhyloTree,
        total_leaves: usize,
        config: &LayoutConfig,
        counts: &C,
    ) -> Result<Self, TreeError>
    where
        C: CountsSource + ?Sized,
    {
        let (mut nodes, root_index, height) = tree.into_parts();

        for node in nodes.iter_mut().filter(|n| n.is_leaf()) {
            let label = node.name().trim();
            let Some(series) = counts.counts(label) else {
                warn!(label, "leaf missing from counts");
                return Err(TreeError::MissingCounts {
                    label: label.to_string(),
                });
            };
            node.set_sample_counts(series.to_vec());
        }

        let scale = config.scale_for(total_leaves);
        if scale != 1.0 {
            for node in &mut nodes {
                let [x, y, _] = node.coords();
                node.set_coord(0, x * scale);
                node.set_coord(1, y * scale);
            }
        }

        let edges: Vec<Edge> = nodes
            .iter()
            .filter_map(|child| child.parent().map(|p| Edge::between(&nodes[p], child)))
            .collect();

        debug!(
            total_leaves,
            scale,
            num_edges = edges.len(),
            "finalized circular tree"
        );
        Ok(CircularTree {
            nodes,
            edges,
            root_index,
            total_leaves,
            height,
            num_samples: counts.num_samples(),
        })
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl CircularTree {
    /// Returns all nodes in arena order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Returns the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root_index]
    }

    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns the edges, one per non-root node, in arena order of the child.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of nodes that were placed on the circle.
    pub fn total_leaves(&self) -> usize {
        self.total_leaves
    }

    /// Returns the maximum depth of any node (the root has depth 1).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of samples reported by the counts data.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Returns an iterator over all leaves in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Returns an iterator over the nodes in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(&self.nodes, self.root_index)
    }

    /// Returns an iterator over the nodes in pre-order (parents before children).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(&self.nodes, self.root_index)
    }

    /// Returns the Newick representation of this tree.
    pub fn to_newick(&self) -> String {
        newick::to_newick(&self.nodes, self.root_index)
    }
}

// =$========================================================================$=
// CIRCULAR TREE BUILDER
// =$========================================================================$=
/// Runs the whole pipeline from Newick string to [CircularTree].
///
/// # Configuration
/// * [`with_max_name_len(max)`](Self::with_max_name_len)
///     - Maximum number of characters in a name (default 500)
/// * [`with_layout_config(config)`](Self::with_layout_config)
///     - Scaling and numerical tolerance, see [LayoutConfig]
///
/// # Example
/// ```
/// use circlewick::CircularTreeBuilder;
/// use circlewick::counts::CountsMap;
/// use circlewick::layout::LayoutConfig;
///
/// let counts: CountsMap = "A,B,C\nday_1,1,2,1\n".parse().unwrap();
/// let tree = CircularTreeBuilder::new()
///     .with_layout_config(LayoutConfig::default().with_scale_threshold(2))
///     .build("(A,(B,C));", &counts)
///     .unwrap();
///
/// // Three leaves, scaled by 3 * 0.1
/// let [x, _, _] = tree.root().coords();
/// assert!((x - 0.15).abs() < 1e-12);
/// assert_eq!(tree.node(1).sample_counts(), &[0.25]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CircularTreeBuilder {
    parser: NewickParser,
    layout: CircularLayout,
}

impl CircularTreeBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of characters a single name may have.
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.parser = self.parser.with_max_name_len(max_name_len);
        self
    }

    /// Sets the layout and scaling configuration.
    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout = CircularLayout::new(config);
        self
    }

    /// Parses `newick`, lays it out and finalizes it against `counts`.
    ///
    /// # Returns
    /// * `Ok(CircularTree)` - The finished tree
    /// * `Err(TreeError)` - If parsing, layout or counts binding fails;
    ///   nothing is produced in that case
    pub fn build<C>(&self, newick: &str, counts: &C) -> Result<CircularTree, TreeError>
    where
        C: CountsSource + ?Sized,
    {
        let mut char_parser = CharParser::for_str(newick);
        let tree = self.parser.parse_str(&mut char_parser)?;
        self.build_from_tree(tree, counts)
    }

    /// Lays out an already parsed tree and finalizes it against `counts`.
    pub fn build_from_tree<C>(
        &self,
        mut tree: PhyloTree,
        counts: &C,
    ) -> Result<CircularTree, TreeError>
    where
        C: CountsSource + ?Sized,
    {
        let total_leaves = self.layout.apply(&mut tree)?;
        CircularTree::finalize(tree, total_leaves, self.layout.config(), counts)
    }
}
