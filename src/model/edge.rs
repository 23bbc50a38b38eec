//! Edge module: frozen parent-child connections for rendering.

use crate::model::node::TreeNode;
use crate::model::tree::NodeIndex;

/// A connection between a node and its parent.
///
/// An edge stores *copies* of the coordinates of both endpoints, taken when the
/// edge is created. Changing a node afterwards does not move existing edges.
#[derive(PartialEq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Edge {
    parent: NodeIndex,
    child: NodeIndex,
    parent_coords: [f64; 3],
    child_coords: [f64; 3],
}

impl Edge {
    /// Creates the edge between `parent` and `child`, capturing their current
    /// x and y coordinates (z is left at 0 for the renderer to set).
    pub fn between(parent: &TreeNode, child: &TreeNode) -> Self {
        let p = parent.coords();
        let c = child.coords();
        Edge {
            parent: parent.index(),
            child: child.index(),
            parent_coords: [p[0], p[1], 0.0],
            child_coords: [c[0], c[1], 0.0],
        }
    }

    /// Returns the index of the parent endpoint.
    pub fn parent(&self) -> NodeIndex {
        self.parent
    }

    /// Returns the index of the child endpoint.
    pub fn child(&self) -> NodeIndex {
        self.child
    }

    /// Returns the coordinates of the parent endpoint at creation time.
    pub fn parent_coords(&self) -> [f64; 3] {
        self.parent_coords
    }

    /// Returns the coordinates of the child endpoint at creation time.
    pub fn child_coords(&self) -> [f64; 3] {
        self.child_coords
    }

    /// Euclidean length of the edge in the plane.
    pub fn length(&self) -> f64 {
        let dx = self.child_coords[0] - self.parent_coords[0];
        let dy = self.child_coords[1] - self.parent_coords[1];
        dx.hypot(dy)
    }
}
