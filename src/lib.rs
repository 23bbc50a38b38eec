//! Circlewick is a library to lay out binary phylogenetic trees on a circle
//! and annotate their leaves with time-series sample data.
//!
//! This crate parses a tree from a (restricted) Newick string, computes a
//! deterministic radial layout for it, and binds every leaf to the series of
//! population fractions it took up in each sample. The result is handed to a
//! renderer as a read-only [CircularTree].
//! Core functionality provided:
//! - Newick: Parse single Newick strings into a re-rooted [PhyloTree] and
//!   write trees back, see [crate::newick].
//! - Layout: Place all leaves evenly on the unit circle and all internal
//!   nodes inside it, see [crate::layout].
//! - Counts: Load condensed counts files or provide your own
//!   [CountsSource](counts::CountsSource), see [crate::counts].
//! - Finalization: Scale coordinates, attach sample series to leaves and
//!   snapshot one [Edge](model::Edge) per parent-child pair.
//! - Tree model: Arena pattern, so no direct node references are stored,
//!   only node indices. See [crate::model] for more details.
//!
//! Limitations:
//! - Only binary trees (a group may also have a single member)
//! - No branch lengths, comments, quoted names or digits in names
//!
//! # Usage patterns
//! 1. [build_circular_tree] runs the whole pipeline with default settings.
//! 2. Configure a [CircularTreeBuilder] for control over name length limit,
//!    scaling and numerical tolerance, or run the steps yourself with a
//!    [NewickParser](newick::NewickParser), a
//!    [CircularLayout](layout::CircularLayout) and [CircularTree::finalize].
//!
//! ## Example Default Configuration
//! ```
//! use circlewick::build_circular_tree;
//! use circlewick::counts::CountsMap;
//!
//! let counts: CountsMap = "Anas,Aythya,Anser\nt0,2,1,1\nt1,0,4,0\n".parse().unwrap();
//! let tree = build_circular_tree("((Anas,Aythya),Anser);", &counts).unwrap();
//!
//! assert_eq!(tree.total_leaves(), 3);
//! assert_eq!(tree.height(), 3);
//! for leaf in tree.leaves() {
//!     let [x, y, _] = leaf.coords();
//!     assert!((x.hypot(y) - 1.0).abs() < 1e-9);
//!     assert_eq!(leaf.sample_counts().len(), 2);
//! }
//! ```
//!
//! ## Example Running the Steps
//! ```no_run
//! use circlewick::CircularTree;
//! use circlewick::counts::CountsMap;
//! use circlewick::layout::{CircularLayout, LayoutConfig};
//! use circlewick::newick;
//!
//! let mut tree = newick::parse_file("gut_genera.nwk")?;
//! let counts = CountsMap::from_file("condensed_counts.csv")?;
//!
//! let config = LayoutConfig::default().with_scale_factor(0.2);
//! let total_leaves = CircularLayout::new(config).apply(&mut tree)?;
//! let tree = CircularTree::finalize(tree, total_leaves, &config, &counts)?;
//! println!("{} edges", tree.edges().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod circular_tree;
pub mod counts;
pub mod error;
pub mod layout;
pub mod model;
pub mod newick;
pub mod parser;

pub use crate::circular_tree::{CircularTree, CircularTreeBuilder};
pub use crate::error::TreeError;
pub use crate::model::PhyloTree;

use crate::counts::CountsSource;

// ============================================================================
// Quick API
// ============================================================================
/// Parses a Newick string, lays it out and finalizes it against `counts`,
/// using default settings.
///
/// See [CircularTreeBuilder::build] for the configurable version.
///
/// # Returns
/// * `Ok(CircularTree)` - The finished tree
/// * `Err(TreeError)` - If the string is malformed, the layout degenerates,
///   or a leaf has no entry in `counts`
pub fn build_circular_tree<S, C>(newick: S, counts: &C) -> Result<CircularTree, TreeError>
where
    S: AsRef<str>,
    C: CountsSource + ?Sized,
{
    CircularTreeBuilder::new().build(newick.as_ref(), counts)
}
