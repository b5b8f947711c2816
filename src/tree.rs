//! Split tree construction and layout.
//!
//! Nodes live in an arena owned by the tree and refer to each other through
//! `NodeId` handles. The leaves occupy the first `len` slots in sorted order,
//! so the leaf of the element with sorted index `i` is always `NodeId(i)`.
//! Branches follow in post-order and the root is the last node.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::split::SplitState;
use crate::traits::{Node, NodeState};
use crate::util;


/// Handle of a node inside a `SplitTree`
///
/// Handles are only meaningful for the tree that produced them.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}


/// A node of a split tree
///
/// Besides the static payload (value, shape and element count) every node
/// carries a transient split state, which is `Unsplit` whenever no query is
/// in progress.
#[derive(PartialEq, Clone, Debug)]
pub struct TreeNode<T> {
    pub(crate) value: T,
    pub(crate) state: NodeState<usize, (NodeId, NodeId)>,
    pub(crate) count: usize,
    pub(crate) first: usize,
    pub(crate) split: SplitState,
}

impl<T> TreeNode<T> {
    fn leaf(value: T, index: usize) -> TreeNode<T> {
        TreeNode {
            value,
            state: NodeState::Leaf(index),
            count: 1,
            first: index,
            split: SplitState::Unsplit,
        }
    }

    /// Sorted indices of the elements below this node
    pub fn span(&self) -> Range<usize> {
        self.first..self.first + self.count
    }

    /// The transient split annotation of this node
    pub fn split(&self) -> SplitState {
        self.split
    }
}

impl<T> Node for TreeNode<T> {
    type Value = T;

    fn state(&self) -> NodeState<usize, (NodeId, NodeId)> {
        self.state
    }

    fn value(&self) -> &T {
        &self.value
    }

    fn count(&self) -> usize {
        self.count
    }
}


/// A static balanced tree over a sorted sequence
///
/// Elements are stored in the leaves, in order. Every branch stores a
/// separator computed by a combiner from the two elements adjacent to its
/// cut, which guides the search for a query value. Once built, the shape
/// never changes; only the split annotations along one search path are
/// attached and cleared again by each query.
#[derive(Clone, Debug)]
pub struct SplitTree<T> {
    pub(crate) nodes: Vec<TreeNode<T>>,
    pub(crate) root: NodeId,
    len: usize,
}

impl<T> SplitTree<T> {
    /// Construct a tree from sorted elements
    ///
    /// The input must be sorted with respect to the ordering later used for
    /// queries. This is not verified; use `generate_tree_checked` for that.
    /// Unsorted input yields meaningless query results.
    ///
    /// # Parameters
    ///
    /// - `items` are the elements in ascending order.
    /// - `combiner` receives the greatest element left of a cut and the least
    ///   element right of it and returns the branch separator. It must return
    ///   a value between its two arguments, e.g. `util::left_separator`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `items` is empty.
    pub fn generate_tree<C>(items: Vec<T>, combiner: C) -> Result<SplitTree<T>>
        where C: Fn(&T, &T) -> T,
    {
        if items.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot build a split tree from an empty sequence".to_string()
            ));
        }
        let len = items.len();
        let mut nodes: Vec<TreeNode<T>> = Vec::with_capacity(2 * len - 1);
        nodes.extend(items.into_iter().enumerate().map(|(i, value)| TreeNode::leaf(value, i)));
        let root = build(&mut nodes, 0, len, &combiner);
        let tree = SplitTree { nodes, root, len };
        tracing::debug!(len, depth = tree.depth(), "built split tree");
        Ok(tree)
    }

    /// Construct a tree after checking that the input is sorted
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `items` is empty or some adjacent pair
    /// `(a, b)` violates `leq(a, b)`.
    pub fn generate_tree_checked<C, L>(items: Vec<T>, combiner: C, leq: L) -> Result<SplitTree<T>>
        where C: Fn(&T, &T) -> T,
              L: Fn(&T, &T) -> bool,
    {
        if let Some(position) = util::first_unsorted(&items, leq) {
            return Err(Error::InvalidArgument(format!(
                "input is not sorted at position {}", position
            )));
        }
        SplitTree::generate_tree(items, combiner)
    }

    /// Free all nodes of the tree
    pub fn release(self) {
        tracing::debug!(nodes = self.nodes.len(), "releasing split tree");
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// A split tree always holds at least one element
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        // The right half is never smaller, so the rightmost path is longest.
        let mut depth = 1;
        let mut current = self.root;
        while let NodeState::Branch((_, right)) = self.nodes[current.0].state {
            depth += 1;
            current = right;
        }
        depth
    }

    /// Handle of the root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by handle
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode<T> {
        &self.nodes[id.0]
    }

    /// Element with the given sorted index
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(&self.nodes[index].value)
        }
        else {
            None
        }
    }

    /// Whether split annotations are currently attached
    pub fn is_split(&self) -> bool {
        self.nodes[self.root.0].split != SplitState::Unsplit
    }

    /// Iterate over the elements in sorted order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

/// Build the branches over the leaves `begin..end`
///
/// The range is cut at its right-biased midpoint so that the right half holds
/// the extra element of an odd range.
fn build<T, C>(nodes: &mut Vec<TreeNode<T>>, begin: usize, end: usize, combiner: &C) -> NodeId
    where C: Fn(&T, &T) -> T,
{
    if end - begin == 1 {
        return NodeId(begin);
    }
    let mid = (begin + end) / 2;
    let left = build(nodes, begin, mid, combiner);
    let right = build(nodes, mid, end, combiner);
    let value = combiner(&nodes[mid - 1].value, &nodes[mid].value);
    let count = nodes[left.0].count + nodes[right.0].count;
    nodes.push(TreeNode {
        value,
        state: NodeState::Branch((left, right)),
        count,
        first: begin,
        split: SplitState::Unsplit,
    });
    NodeId(nodes.len() - 1)
}

impl<T> Node for SplitTree<T> {
    type Value = T;

    fn state(&self) -> NodeState<usize, (NodeId, NodeId)> {
        self.nodes[self.root.0].state
    }

    fn value(&self) -> &T {
        &self.nodes[self.root.0].value
    }

    fn count(&self) -> usize {
        self.len
    }
}

impl<'a, T> IntoIterator for &'a SplitTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        Iter::new(self)
    }
}
