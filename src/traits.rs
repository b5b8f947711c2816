//! Common abstractions for tree nodes

use crate::tree::NodeId;


/// The state of a node
///
/// A node is either a leaf holding exactly one element or a branch with a
/// collection of child nodes. Split trees are full, so unlike a spatial tree
/// there is no empty state.
///
/// # Type parameters
///
/// - `O` is what a leaf exposes, here the index of its element in the sorted
///   input.
/// - `C` is a collection of nodes in a branch.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeState<O, C> {

    /// A leaf node contains exactly one element
    Leaf(O),

    /// A branch node contains a collection of nodes
    Branch(C),
}


/// A tree node
///
/// This is part of the essential features of a tree. Note that both a whole
/// tree and its constituents implement this.
pub trait Node {

    /// The type of value stored
    type Value;

    /// The state of the node
    ///
    /// Leaves expose the sorted index of their element, branches their left
    /// and right child.
    fn state(&self) -> NodeState<usize, (NodeId, NodeId)>;

    /// The value of the node
    ///
    /// For a leaf this is the element itself, for a branch it is the separator
    /// produced by the combiner.
    fn value(&self) -> &Self::Value;

    /// Number of elements below this node
    fn count(&self) -> usize;

    /// Whether this node is a leaf
    fn is_leaf(&self) -> bool {
        matches!(self.state(), NodeState::Leaf(_))
    }
}
