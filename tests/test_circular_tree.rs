use circlewick::counts::{CountsMap, CountsSource};
use circlewick::layout::{CircularLayout, LayoutConfig};
use circlewick::model::Edge;
use circlewick::newick::{parse_file, parse_str};
use circlewick::parser::ParsingErrorType;
use circlewick::{CircularTree, CircularTreeBuilder, TreeError, build_circular_tree};
use std::collections::HashMap;
use std::path::Path;

const EPS: f64 = 1e-12;

fn uniform_counts(labels: &[&str], num_samples: usize) -> HashMap<String, Vec<f64>> {
    labels
        .iter()
        .map(|label| (label.to_string(), vec![1.0 / labels.len() as f64; num_samples]))
        .collect()
}

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

// --- TESTS COUNTS BINDING ---
#[test]
fn test_counts_attached_to_leaves() {
    let mut counts = uniform_counts(&["A", "B"], 2);
    counts.insert("C".to_string(), vec![0.1, 0.9]);

    let tree = build_circular_tree("(A,(B,C));", &counts).unwrap();
    assert_eq!(tree.num_samples(), 2);
    for node in tree.nodes() {
        if node.is_leaf() {
            assert_eq!(node.sample_counts(), counts[node.name()].as_slice());
        } else {
            assert!(node.sample_counts().is_empty());
        }
    }
}

#[test]
fn test_missing_counts() {
    let counts = uniform_counts(&["A", "B"], 1);
    let err = build_circular_tree("(A,(B,C));", &counts).unwrap_err();
    assert_eq!(
        err,
        TreeError::MissingCounts {
            label: "C".to_string()
        }
    );
    assert!(err.to_string().contains("'C'"));
}

#[test]
fn test_parsing_error_propagates() {
    let counts = uniform_counts(&["A", "B"], 1);
    match build_circular_tree("(A,B))", &counts).unwrap_err() {
        TreeError::Parsing(err) => {
            assert!(matches!(err.kind(), ParsingErrorType::MalformedNewick(_)))
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(
        build_circular_tree("A;", &counts),
        Err(TreeError::Parsing(_))
    ));
}

// --- TESTS SCALING ---
#[test]
fn test_small_trees_are_not_scaled() {
    let labels = ["A", "B", "C", "D", "E"];
    let counts = uniform_counts(&labels, 1);
    let tree = build_circular_tree("((A,B),(C,(D,E)));", &counts).unwrap();
    assert_eq!(tree.total_leaves(), 5);
    for leaf in tree.leaves() {
        let [x, y, _] = leaf.coords();
        assert!((x.hypot(y) - 1.0).abs() < EPS);
    }
}

#[test]
fn test_scaling_law() {
    let newick = "((A,B),((C,D),(E,F)));";
    let counts = uniform_counts(&["A", "B", "C", "D", "E", "F"], 1);

    let mut unscaled = parse_str(newick).unwrap();
    CircularLayout::default().apply(&mut unscaled).unwrap();
    let scaled = build_circular_tree(newick, &counts).unwrap();

    assert_eq!(scaled.total_leaves(), 6);
    let scale = 6.0 * 0.1;
    for (raw, node) in unscaled.nodes().iter().zip(scaled.nodes()) {
        let [x, y, z] = node.coords();
        assert!((x - raw.coord(0) * scale).abs() < EPS);
        assert!((y - raw.coord(1) * scale).abs() < EPS);
        assert_eq!(z, 0.0);
    }
}

#[test]
fn test_configured_scaling() {
    let counts = uniform_counts(&["A", "B"], 1);
    let config = LayoutConfig::default()
        .with_scale_threshold(1)
        .with_scale_factor(2.5);
    let tree = CircularTreeBuilder::new()
        .with_layout_config(config)
        .build("(A,B);", &counts)
        .unwrap();

    let a = tree.node(tree.root().left().unwrap());
    assert!((a.coord(0) - 5.0).abs() < EPS);
}

// --- TESTS EDGES ---
#[test]
fn test_one_edge_per_non_root_node() {
    let counts = uniform_counts(&["A", "B", "C", "D"], 3);
    let tree = build_circular_tree("((A,B),(C,D));", &counts).unwrap();

    assert_eq!(tree.edges().len(), tree.num_nodes() - 1);
    for edge in tree.edges() {
        let child = tree.node(edge.child());
        assert_eq!(child.parent(), Some(edge.parent()));
        assert_ne!(edge.child(), tree.root_index());
    }
}

#[test]
fn test_edges_capture_scaled_coordinates() {
    let labels = ["A", "B", "C", "D", "E", "F", "G"];
    let counts = uniform_counts(&labels, 1);
    let tree = build_circular_tree("(((A,B),(C,D)),((E,F),G));", &counts).unwrap();

    for edge in tree.edges() {
        let parent = tree.node(edge.parent()).coords();
        let child = tree.node(edge.child()).coords();
        assert_eq!(edge.parent_coords(), [parent[0], parent[1], 0.0]);
        assert_eq!(edge.child_coords(), [child[0], child[1], 0.0]);
    }
}

#[test]
fn test_edges_are_snapshots() {
    let counts = uniform_counts(&["A", "B"], 1);
    let tree = build_circular_tree("(A,B);", &counts).unwrap();

    let mut nodes = tree.nodes().to_vec();
    let root = tree.root_index();
    let leaf = tree.root().left().unwrap();
    let edge = Edge::between(&nodes[root], &nodes[leaf]);
    assert_eq!(edge, tree.edges()[0]);

    // Moving both endpoints afterwards leaves the edge where it was
    nodes[root].set_coord(0, 42.0);
    nodes[leaf].set_coord(1, -42.0);
    nodes[leaf].set_coord(2, 7.0);
    assert_eq!(edge.parent_coords(), tree.root().coords());
    assert_eq!(edge.child_coords(), tree.node(leaf).coords());
    assert_ne!(Edge::between(&nodes[root], &nodes[leaf]), edge);
}

// --- TESTS PIPELINE ---
#[test]
fn test_fixture_pipeline() {
    let counts = CountsMap::from_file(fixture("condensed_counts.csv")).unwrap();
    let parsed = parse_file(fixture("gut_genera.nwk")).unwrap();
    let tree = CircularTreeBuilder::new()
        .build_from_tree(parsed, &counts)
        .unwrap();

    assert_eq!(tree.total_leaves(), 7);
    assert_eq!(tree.height(), 5);
    assert_eq!(tree.num_samples(), 3);

    let scale = 7.0 * 0.1;
    for leaf in tree.leaves() {
        let [x, y, _] = leaf.coords();
        assert!((x.hypot(y) - scale).abs() < 1e-9);
        assert_eq!(leaf.sample_counts(), counts.counts(leaf.name()).unwrap());
    }

    let bacteroides = tree.leaves().find(|n| n.name() == "Bacteroides").unwrap();
    assert_eq!(bacteroides.sample_counts(), &[0.4, 0.0, 0.1]);
}

#[test]
fn test_manual_steps_match_builder() {
    let counts = uniform_counts(&["A", "B", "C"], 1);
    let config = LayoutConfig::default();

    let mut tree = parse_str("(A,(B,C));").unwrap();
    let total_leaves = CircularLayout::new(config).apply(&mut tree).unwrap();
    let manual = CircularTree::finalize(tree, total_leaves, &config, &counts).unwrap();
    let built = build_circular_tree("(A,(B,C));", &counts).unwrap();

    assert_eq!(manual.nodes(), built.nodes());
    assert_eq!(manual.edges(), built.edges());
    assert_eq!(manual.to_newick(), "(A,(B,C));");
}

#[test]
fn test_circular_tree_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CircularTree>();
}

#[cfg(feature = "serde")]
#[test]
fn test_serialize_to_json() {
    let counts = uniform_counts(&["A", "B"], 1);
    let tree = build_circular_tree("(A,B);", &counts).unwrap();
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["total_leaves"], 2);
    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"].as_array().unwrap().len(), 2);
    assert_eq!(json["nodes"][1]["name"], "A");
}
