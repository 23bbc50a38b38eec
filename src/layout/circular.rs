//! Two-pass circular layout.
//!
//! The position of every non-root node is expressed as
//! `coords = coefficient * parent_coords + offset` (component-wise).
//! A post-order pass solves coefficient and offset bottom-up, with leaves
//! fixed on the unit circle; a pre-order pass then resolves the actual
//! coordinates top-down, starting at the root whose coordinates are its offset.

use crate::error::TreeError;
use crate::layout::LayoutConfig;
use crate::model::node::{LEFT_SLOT, PARENT_SLOT, RIGHT_SLOT, TreeNode};
use crate::model::tree::{NodeIndex, PhyloTree};
use std::f64::consts::TAU;
use tracing::{debug, trace};

// =#========================================================================#=
// CIRCULAR LAYOUT
// =#========================================================================#=
/// Computes circular (radial) coordinates for a [PhyloTree].
///
/// Nodes of degree 1 (all leaves, plus a root with a single child) are placed
/// on the unit circle in post-order, evenly spaced by angle. Every other node
/// is placed at a weighted average of its neighbors, where edges closer to
/// the root weigh more.
///
/// # Example
/// ```
/// use circlewick::layout::{CircularLayout, LayoutConfig};
/// use circlewick::newick::parse_str;
///
/// let mut tree = parse_str("(A,(B,C));").unwrap();
/// let total_leaves = CircularLayout::new(LayoutConfig::default()).apply(&mut tree).unwrap();
/// assert_eq!(total_leaves, 3);
///
/// let root = tree.root().coords();
/// assert!((root[0] - 0.5).abs() < 1e-12 && root[1].abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CircularLayout {
    config: LayoutConfig,
}

/// Coefficient (absent for the root) and offset of an internal node
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    coefficient: Option<[f64; 2]>,
    offset: [f64; 2],
}

impl CircularLayout {
    /// Creates a new layout with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this layout.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Computes coordinates for all nodes of `tree`.
    ///
    /// Writes offset, coefficient and (x, y) of every node; z stays untouched.
    /// Coordinates are not scaled.
    ///
    /// # Returns
    /// * `Ok(total_leaves)` - Number of nodes placed on the unit circle
    /// * `Err(TreeError::DegenerateLayout)` - If the tree has nothing to place
    ///   on the circle, or a denominator vanishes or a value is not finite
    pub fn apply(&self, tree: &mut PhyloTree) -> Result<usize, TreeError> {
        let total_leaves = tree.total_leaves();
        if total_leaves == 0 {
            return Err(TreeError::DegenerateLayout {
                node: tree.root_index(),
                reason: "no node of degree 1 to place on the circle".to_string(),
            });
        }

        let leaves_found = self.solve_post_order(tree, total_leaves)?;
        debug_assert_eq!(leaves_found, total_leaves);
        self.resolve_pre_order(tree)?;

        debug!(
            total_leaves,
            num_nodes = tree.num_nodes(),
            "computed circular layout"
        );
        Ok(total_leaves)
    }
}

// ============================================================================
// Passes
// ============================================================================
impl CircularLayout {
    /// Post-order pass: coefficient and offset, children before parents.
    /// Returns the number of nodes placed on the circle.
    fn solve_post_order(
        &self,
        tree: &mut PhyloTree,
        total_leaves: usize,
    ) -> Result<usize, TreeError> {
        let root = tree.root_index();
        let order: Vec<NodeIndex> = tree.post_order_iter().map(|n| n.index()).collect();
        let mut leaves_found = 0;

        for index in order {
            let node = &tree[index];
            if node.is_leaf() || (index == root && node.degree() == 1) {
                let angle = TAU * leaves_found as f64 / total_leaves as f64;
                leaves_found += 1;

                let node = &mut tree[index];
                node.set_coefficient([0.0, 0.0]);
                node.set_offset([angle.cos(), angle.sin()]);
                trace!(node = index, angle, "placed on circle");
                continue;
            }

            let is_root = index == root;
            let weights = edge_weights(node, is_root);
            let children = [node.left(), node.right()]
                .map(|child| child.map(|c| (tree[c].coefficient(), tree[c].offset())));
            let placement = combine(weights, children, self.config.epsilon())
                .map_err(|reason| TreeError::DegenerateLayout { node: index, reason })?;

            let node = &mut tree[index];
            if let Some(coefficient) = placement.coefficient {
                node.set_coefficient(coefficient);
            }
            node.set_offset(placement.offset);
            trace!(node = index, ?placement, "solved internal node");
        }

        Ok(leaves_found)
    }

    /// Pre-order pass: coordinates, parents before children.
    fn resolve_pre_order(&self, tree: &mut PhyloTree) -> Result<(), TreeError> {
        let order: Vec<NodeIndex> = tree.pre_order_iter().map(|n| n.index()).collect();

        for index in order {
            let node = &tree[index];
            let [offset_x, offset_y] = node.offset();
            let [x, y] = match node.parent() {
                None => [offset_x, offset_y],
                Some(parent) => {
                    let parent_coords = tree[parent].coords();
                    let [co_x, co_y] = node.coefficient();
                    [
                        co_x * parent_coords[0] + offset_x,
                        co_y * parent_coords[1] + offset_y,
                    ]
                }
            };

            if !x.is_finite() || !y.is_finite() {
                return Err(TreeError::DegenerateLayout {
                    node: index,
                    reason: format!("non-finite coordinates ({x}, {y})"),
                });
            }

            let node = &mut tree[index];
            node.set_coord(0, x);
            node.set_coord(1, y);
        }

        Ok(())
    }
}

// ============================================================================
// Recurrence
// ============================================================================
/// Returns the weight of each set neighbor slot (parent, left, right) of an
/// internal node; unset slots weigh 0.
///
/// The parent edge, and every edge of the root, weighs `1/depth`; child
/// edges of other nodes share `1/depth` among the `degree - 1` children.
fn edge_weights(node: &TreeNode, is_root: bool) -> [f64; 3] {
    let depth = node.depth() as f64;
    let mut weights = [0.0; 3];
    for (slot, neighbor) in node.neighbors().iter().enumerate() {
        if neighbor.is_none() {
            continue;
        }
        weights[slot] = if is_root || slot == PARENT_SLOT {
            1.0 / depth
        } else {
            1.0 / (depth * f64::from(node.degree() - 1))
        };
    }
    weights
}

/// Combines the (coefficient, offset) pairs of the children, given per child
/// slot (left, right), into the placement of their parent.
///
/// The coefficient is only computed if a parent edge has weight.
fn combine(
    weights: [f64; 3],
    children: [Option<([f64; 2], [f64; 2])>; 2],
    epsilon: f64,
) -> Result<Placement, String> {
    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 {
        return Err(format!("edge weights sum to {total}"));
    }

    // t accumulates weighted coefficients, t2 weighted offsets
    let mut t = [0.0; 2];
    let mut t2 = [0.0; 2];
    for (slot, child) in [LEFT_SLOT, RIGHT_SLOT].into_iter().zip(children) {
        let Some((coefficient, offset)) = child else {
            continue;
        };
        let share = weights[slot] / total;
        for d in 0..2 {
            t[d] += share * coefficient[d];
            t2[d] += share * offset[d];
        }
    }

    let denominators = [1.0 - t[0], 1.0 - t[1]];
    if denominators.iter().any(|d| d.abs() < epsilon || !d.is_finite()) {
        return Err(format!(
            "denominators ({}, {}) too close to zero",
            denominators[0], denominators[1]
        ));
    }

    let offset = [t2[0] / denominators[0], t2[1] / denominators[1]];
    let coefficient = (weights[PARENT_SLOT] > 0.0).then(|| {
        [
            weights[PARENT_SLOT] / (total * denominators[0]),
            weights[PARENT_SLOT] / (total * denominators[1]),
        ]
    });

    let finite = offset.iter().chain(coefficient.iter().flatten()).all(|v| v.is_finite());
    if !finite {
        return Err("non-finite coefficient or offset".to_string());
    }

    Ok(Placement { coefficient, offset })
}
