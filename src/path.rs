//! Search paths through a split tree.

use std::slice;

use crate::error::{Error, Result};
use crate::split::Side;
use crate::traits::NodeState;
use crate::tree::{NodeId, SplitTree};


/// Branch taken at a node while searching for a query value
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Direction {
    /// The query value is at most the node value
    Left,
    /// The query value exceeds the node value
    Right,
}

impl Direction {
    /// The side of a split this direction points to
    pub fn side(self) -> Side {
        match self {
            Direction::Left => Side::Left,
            Direction::Right => Side::Right,
        }
    }
}


/// A visited node together with the direction taken there
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct SearchPathEntry {
    /// The visited node
    pub node: NodeId,
    /// Direction taken when visiting it
    pub direction: Direction,
}


/// Root-to-leaf sequence of nodes visited for one query value
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct SearchPath {
    entries: Vec<SearchPathEntry>,
}

impl SearchPath {
    /// Number of visited nodes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no node was visited
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries from root to leaf
    pub fn entries(&self) -> &[SearchPathEntry] {
        &self.entries
    }

    /// The terminal leaf entry
    pub fn leaf(&self) -> Option<&SearchPathEntry> {
        self.entries.last()
    }

    /// Iterate over the entries from root to leaf
    pub fn iter(&self) -> slice::Iter<'_, SearchPathEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a SearchPathEntry;
    type IntoIter = slice::Iter<'a, SearchPathEntry>;

    fn into_iter(self) -> slice::Iter<'a, SearchPathEntry> {
        self.entries.iter()
    }
}


impl<T> SplitTree<T> {
    /// Descend the tree for a query value
    ///
    /// At every node, including the terminal leaf, `leq(q, value)` picks the
    /// `Left` direction and its negation the `Right` one. This only reads the
    /// tree.
    pub fn query_tree<L>(&self, q: &T, leq: L) -> SearchPath
        where L: Fn(&T, &T) -> bool,
    {
        let mut entries = Vec::with_capacity(self.depth());
        let mut current = self.root;
        loop {
            let node = &self.nodes[current.0];
            let direction = if leq(q, &node.value) { Direction::Left } else { Direction::Right };
            entries.push(SearchPathEntry { node: current, direction });
            match node.state {
                NodeState::Leaf(_) => break,
                NodeState::Branch((left, right)) => current = match direction {
                    Direction::Left => left,
                    Direction::Right => right,
                },
            }
        }
        SearchPath { entries }
    }

    /// Check that a path is a root-to-leaf descent through this tree
    pub(crate) fn validate_path(&self, path: &SearchPath) -> Result<()> {
        let mismatch = || Error::InvalidArgument(
            "search path does not belong to this tree".to_string()
        );
        let mut expected = Some(self.root);
        for entry in path {
            if expected != Some(entry.node) || entry.node.0 >= self.nodes.len() {
                return Err(mismatch());
            }
            expected = match self.nodes[entry.node.0].state {
                NodeState::Leaf(_) => None,
                NodeState::Branch((left, right)) => Some(match entry.direction {
                    Direction::Left => left,
                    Direction::Right => right,
                }),
            };
        }
        match expected {
            None => Ok(()),
            Some(_) => Err(mismatch()),
        }
    }
}
