//! Newick string writing for trees.

use crate::model::node::TreeNode;
use crate::model::tree::NodeIndex;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Returns the Newick representation of the tree stored in the given arena,
/// with closing semicolon.
///
/// Internal nodes are written as `(left,right)name` (or `(child)name` for a
/// single child), leaves as their name. Branch lengths are never written.
/// The result can be parsed again by the [NewickParser](crate::newick::NewickParser)
/// into a tree of the same shape and names.
///
/// # Arguments
/// * `nodes` - Arena of nodes
/// * `root` - Index of the root in `nodes`
///
/// # Example
/// ```
/// use circlewick::newick::parse_str;
///
/// let tree = parse_str("(Kea,(Kaka,Kakapo)Strigopoidea);").unwrap();
/// assert_eq!(tree.to_newick(), "(Kea,(Kaka,Kakapo)Strigopoidea);");
/// ```
pub fn to_newick(nodes: &[TreeNode], root: NodeIndex) -> String {
    /// Pieces still to be written
    enum Step {
        Enter(NodeIndex),
        Comma,
        Close(NodeIndex),
    }

    let mut newick = String::with_capacity(estimate_newick_len(nodes));
    let mut stack = vec![Step::Enter(root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(index) => {
                let node = &nodes[index];
                if node.is_leaf() {
                    newick.push_str(node.name());
                    continue;
                }

                newick.push('(');
                stack.push(Step::Close(index));
                match (node.left(), node.right()) {
                    (Some(left), Some(right)) => {
                        stack.push(Step::Enter(right));
                        stack.push(Step::Comma);
                        stack.push(Step::Enter(left));
                    }
                    (Some(only), None) | (None, Some(only)) => stack.push(Step::Enter(only)),
                    (None, None) => {}
                }
            }
            Step::Comma => newick.push(','),
            Step::Close(index) => {
                newick.push(')');
                newick.push_str(nodes[index].name());
            }
        }
    }

    newick.push(';');
    newick
}

/// Estimates the length of a Newick string for the given nodes:
/// names plus one parenthesis or comma per node.
fn estimate_newick_len(nodes: &[TreeNode]) -> usize {
    let names: usize = nodes.iter().map(|n| n.name().len()).sum();
    names + 2 * nodes.len() + BUFFER_CHARS
}
