//! Property-based invariant tests for parsing, layout and finalization.
//!
//! For randomly shaped binary trees (with occasional single-member groups):
//!
//! 1. Parsed trees are valid and every depth is one more than the parent's.
//! 2. `total_leaves` counts the degree-1 nodes: all leaves plus a root with a
//!    single child.
//! 3. Writing and re-parsing yields the same string and shape.
//! 4. Every degree-1 node lies on the unit circle, exactly one per angle.
//! 5. Finalized coordinates are the raw ones scaled by `total_leaves * 0.1`
//!    for more than 5 leaves.
//! 6. Edge snapshots match the finalized coordinates of both endpoints.

use circlewick::build_circular_tree;
use circlewick::layout::CircularLayout;
use circlewick::newick::parse_str;
use proptest::prelude::*;
use std::collections::HashMap;
use std::f64::consts::TAU;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Single(Box<Shape>),
    Pair(Box<Shape>, Box<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(Shape::Leaf)
        .prop_recursive(8, 64, 2, |inner| {
            prop_oneof![
                1 => inner.clone().prop_map(|s| Shape::Single(Box::new(s))),
                4 => (inner.clone(), inner).prop_map(|(l, r)| Shape::Pair(Box::new(l), Box::new(r))),
            ]
        })
        .prop_map(|shape| match shape {
            // The top level has to be a group
            Shape::Leaf => Shape::Single(Box::new(Shape::Leaf)),
            group => group,
        })
}

/// Letters only, digits are not allowed in names
fn taxon_name(mut i: usize) -> String {
    let mut name = String::from("Taxon ");
    loop {
        name.push(char::from(b'a' + (i % 26) as u8));
        i /= 26;
        if i == 0 {
            return name;
        }
    }
}

fn render(shape: &Shape, next_leaf: &mut usize, out: &mut String) {
    match shape {
        Shape::Leaf => {
            out.push_str(&taxon_name(*next_leaf));
            *next_leaf += 1;
        }
        Shape::Single(child) => {
            out.push('(');
            render(child, next_leaf, out);
            out.push(')');
        }
        Shape::Pair(left, right) => {
            out.push('(');
            render(left, next_leaf, out);
            out.push(',');
            render(right, next_leaf, out);
            out.push(')');
        }
    }
}

/// Returns the Newick string of the shape and its number of leaves
fn newick_strategy() -> impl Strategy<Value = (String, usize)> {
    shape_strategy().prop_map(|shape| {
        let mut newick = String::new();
        let mut num_leaves = 0;
        render(&shape, &mut num_leaves, &mut newick);
        newick.push(';');
        (newick, num_leaves)
    })
}

fn counts_for(num_leaves: usize) -> HashMap<String, Vec<f64>> {
    (0..num_leaves)
        .map(|i| (taxon_name(i), vec![1.0, 0.5]))
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Depth invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn depth_is_parent_depth_plus_one((newick, num_leaves) in newick_strategy()) {
        let tree = parse_str(&newick).unwrap();
        prop_assert!(tree.is_valid(), "invalid tree for {}", newick);
        prop_assert_eq!(tree.num_leaves(), num_leaves);
        prop_assert_eq!(tree.root().depth(), 1);

        let mut height = 1;
        for node in tree.nodes() {
            if let Some(parent) = node.parent() {
                prop_assert_eq!(node.depth(), tree[parent].depth() + 1);
            }
            height = height.max(node.depth());
        }
        prop_assert_eq!(tree.height(), height);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. total_leaves counts degree-1 nodes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn total_leaves_counts_degree_one((newick, num_leaves) in newick_strategy()) {
        let tree = parse_str(&newick).unwrap();
        let degree_one = tree.nodes().iter().filter(|n| n.degree() == 1).count();
        prop_assert_eq!(tree.total_leaves(), degree_one);

        let virtual_leaf = usize::from(tree.root().degree() == 1);
        prop_assert_eq!(tree.total_leaves(), num_leaves + virtual_leaf);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn written_newick_reparses((newick, _num_leaves) in newick_strategy()) {
        let tree = parse_str(&newick).unwrap();
        let written = tree.to_newick();
        prop_assert_eq!(&written, &newick);

        let reparsed = parse_str(&written).unwrap();
        let shape = |t: &circlewick::PhyloTree| -> Vec<(String, usize, u8)> {
            t.pre_order_iter()
                .map(|n| (n.name().to_string(), n.depth(), n.degree()))
                .collect()
        };
        prop_assert_eq!(shape(&reparsed), shape(&tree));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Degree-1 nodes on the unit circle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn degree_one_nodes_on_circle((newick, _num_leaves) in newick_strategy()) {
        let mut tree = parse_str(&newick).unwrap();
        let total_leaves = CircularLayout::default().apply(&mut tree).unwrap();

        for k in 0..total_leaves {
            let angle = TAU * k as f64 / total_leaves as f64;
            let (cos, sin) = (angle.cos(), angle.sin());
            let placed = tree
                .nodes()
                .iter()
                .filter(|n| n.degree() == 1)
                .filter(|n| (n.coord(0) - cos).abs() < 1e-9 && (n.coord(1) - sin).abs() < 1e-9)
                .count();
            prop_assert_eq!(placed, 1, "angle {} of {}", k, newick);
        }

        for node in tree.nodes() {
            prop_assert!(node.coord(0).is_finite() && node.coord(1).is_finite());
            prop_assert!(node.coord(0).hypot(node.coord(1)) <= 1.0 + 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Scaling law
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn finalized_coordinates_are_scaled((newick, num_leaves) in newick_strategy()) {
        let mut raw = parse_str(&newick).unwrap();
        let total_leaves = CircularLayout::default().apply(&mut raw).unwrap();
        let tree = build_circular_tree(&newick, &counts_for(num_leaves)).unwrap();

        prop_assert_eq!(tree.total_leaves(), total_leaves);
        let scale = if total_leaves > 5 { total_leaves as f64 * 0.1 } else { 1.0 };
        for (before, after) in raw.nodes().iter().zip(tree.nodes()) {
            prop_assert!((after.coord(0) - before.coord(0) * scale).abs() < 1e-9);
            prop_assert!((after.coord(1) - before.coord(1) * scale).abs() < 1e-9);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Edge snapshots
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edges_match_endpoints((newick, num_leaves) in newick_strategy()) {
        let tree = build_circular_tree(&newick, &counts_for(num_leaves)).unwrap();
        prop_assert_eq!(tree.edges().len(), tree.num_nodes() - 1);

        for edge in tree.edges() {
            let parent = tree.node(edge.parent());
            let child = tree.node(edge.child());
            prop_assert_eq!(child.parent(), Some(parent.index()));
            let [px, py, _] = edge.parent_coords();
            let [cx, cy, _] = edge.child_coords();
            prop_assert_eq!([px, py], [parent.coord(0), parent.coord(1)]);
            prop_assert_eq!([cx, cy], [child.coord(0), child.coord(1)]);
        }
    }
}
