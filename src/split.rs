//! Splitting a tree along a search path, and undoing it.
//!
//! A split partitions the elements into a left side `{x : !leq(q, x)}` and a
//! right side `{x : leq(q, x)}`. Only the nodes on the search path for `q`
//! straddle the two sides, so only they get annotated with per-side counts.
//! Every other node lies entirely on one side and is described by its static
//! count.

use crate::error::{Error, Result};
use crate::path::{Direction, SearchPath};
use crate::traits::NodeState;
use crate::tree::{NodeId, SplitTree, TreeNode};


/// One side of a split
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Side {
    /// Elements before the query value
    Left,
    /// Elements at or after the query value
    Right,
}

impl Side {
    /// The other side
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}


/// Number of a node's elements on either side of a split
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct SplitCounts {
    /// Elements on the left side
    pub left: usize,
    /// Elements on the right side
    pub right: usize,
}

impl SplitCounts {
    /// Count on the given side
    pub fn on(self, side: Side) -> usize {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn set(&mut self, side: Side, count: usize) {
        match side {
            Side::Left => self.left = count,
            Side::Right => self.right = count,
        }
    }
}


/// Transient split annotation of a node
///
/// `Unsplit` is the resting state of every node. A node on the current search
/// path records the direction taken there together with its split counts.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum SplitState {
    /// Not on the path of an active split
    #[default]
    Unsplit,
    /// On the path, the search continued left
    SplitLeft(SplitCounts),
    /// On the path, the search continued right
    SplitRight(SplitCounts),
}

impl SplitState {
    fn tagged(direction: Direction) -> SplitState {
        match direction {
            Direction::Left => SplitState::SplitLeft(SplitCounts::default()),
            Direction::Right => SplitState::SplitRight(SplitCounts::default()),
        }
    }

    /// Direction recorded for the active split, if any
    pub fn direction(&self) -> Option<Direction> {
        match *self {
            SplitState::Unsplit => None,
            SplitState::SplitLeft(_) => Some(Direction::Left),
            SplitState::SplitRight(_) => Some(Direction::Right),
        }
    }

    /// Split counts, if the node is split
    pub fn counts(&self) -> Option<SplitCounts> {
        match *self {
            SplitState::Unsplit => None,
            SplitState::SplitLeft(counts) | SplitState::SplitRight(counts) => Some(counts),
        }
    }

    fn counts_mut(&mut self) -> Option<&mut SplitCounts> {
        match *self {
            SplitState::Unsplit => None,
            SplitState::SplitLeft(ref mut counts) | SplitState::SplitRight(ref mut counts) => Some(counts),
        }
    }
}


/// Saved copies of the nodes on a search path
///
/// Restoring writes the copies back in reverse path order. This undoes a
/// split without relying on the `Unsplit` sentinel.
#[derive(Clone, Debug)]
pub struct Snapshot<T> {
    saved: Vec<(NodeId, TreeNode<T>)>,
}

impl<T> Snapshot<T> {
    /// Number of saved nodes
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    /// Whether nothing was saved
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}


impl<T> SplitTree<T> {
    /// Annotate the nodes of a search path with split counts
    ///
    /// Every path node is first tagged with its direction. Two bottom-up
    /// passes then compute the left and the right counts. Nodes off the path
    /// are only read.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the path was not produced by this tree.
    /// - `InconsistentState` if a previous split has not been reset.
    pub fn set_tree_counts(&mut self, path: &SearchPath) -> Result<()> {
        self.validate_path(path)?;
        if self.is_split() {
            tracing::warn!("split requested while a previous split is still active");
            return Err(Error::InconsistentState(
                "tree is already split, reset the previous split first".to_string()
            ));
        }
        for entry in path {
            self.nodes[entry.node.0].split = SplitState::tagged(entry.direction);
        }
        self.count_pass(path, Side::Left);
        self.count_pass(path, Side::Right);
        Ok(())
    }

    /// Compute the counts of one side from the leaf up to the root
    ///
    /// A node's count on `side` is the count of its child on that side plus,
    /// if the search went the other way, the count of the other child. A
    /// leaf belongs to `side` exactly when the search turned away from it.
    fn count_pass(&mut self, path: &SearchPath, side: Side) {
        for entry in path.iter().rev() {
            let away = entry.direction.side() != side;
            let count = match self.nodes[entry.node.0].state {
                NodeState::Leaf(_) => usize::from(away),
                NodeState::Branch((left, right)) => {
                    let (near, far) = match side {
                        Side::Left => (left, right),
                        Side::Right => (right, left),
                    };
                    let far_count = if away { self.split_or_full(far, side) } else { 0 };
                    self.split_or_full(near, side) + far_count
                },
            };
            if let Some(counts) = self.nodes[entry.node.0].split.counts_mut() {
                counts.set(side, count);
            }
        }
    }

    /// Count on `side` of a node that is split, or of one wholly on `side`
    pub(crate) fn split_or_full(&self, id: NodeId, side: Side) -> usize {
        let node = &self.nodes[id.0];
        node.split.counts().map_or(node.count, |counts| counts.on(side))
    }

    /// Return every node of a search path to the `Unsplit` state
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the path was not produced by this tree.
    /// - `InconsistentState` if the tree is not split along this path. The
    ///   tree is left untouched in that case.
    pub fn reset_tree_counts(&mut self, path: &SearchPath) -> Result<()> {
        self.validate_path(path)?;
        if !self.is_split() {
            tracing::warn!("reset requested on an unsplit tree");
            return Err(Error::InconsistentState("tree is not split".to_string()));
        }
        let stray = path.iter()
            .find(|entry| self.nodes[entry.node.0].split.direction() != Some(entry.direction));
        if let Some(entry) = stray {
            tracing::warn!(node = entry.node.index(), "reset path differs from the split path");
            return Err(Error::InconsistentState(format!(
                "node {} is not split along this path", entry.node.index()
            )));
        }
        for entry in path {
            self.nodes[entry.node.0].split = SplitState::Unsplit;
        }
        Ok(())
    }
}

impl<T: Clone> SplitTree<T> {
    /// Copy every node of a search path before it gets split
    pub fn snapshot(&self, path: &SearchPath) -> Snapshot<T> {
        Snapshot {
            saved: path.iter()
                .map(|entry| (entry.node, self.nodes[entry.node.0].clone()))
                .collect(),
        }
    }

    /// Write the nodes of a snapshot back into the tree
    ///
    /// The snapshot must have been taken from this tree.
    pub fn restore(&mut self, snapshot: Snapshot<T>) {
        for (id, node) in snapshot.saved.into_iter().rev() {
            self.nodes[id.0] = node;
        }
    }
}
