//! k-th nearest element queries.
//!
//! Once a tree is split for `q`, its left side read from right to left and
//! its right side read from left to right are both sorted by distance to
//! `q`. The k-th nearest element is therefore the k-th element of the merge
//! of two sorted sequences. Instead of materialising them, two cursors walk
//! down the tree, one per side, and use the split counts to discard a whole
//! branch of one of them in every step.

use std::cmp::Ordering;
use std::mem;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::path::Direction;
use crate::split::Side;
use crate::traits::NodeState;
use crate::tree::{NodeId, SplitTree};


/// How a query undoes its split
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum RestoreStrategy {
    /// Reset the split annotations along the path
    #[default]
    Sweep,
    /// Copy the path nodes beforehand and write the copies back
    Snapshot,
}


/// Options for `query_k_nearest_with`
#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    /// Strategy used to return the tree to its unsplit state
    pub restore: RestoreStrategy,
}


/// Result of a k-th nearest query
#[derive(PartialEq, Clone, Debug)]
pub struct Nearest<T> {
    /// The element
    pub value: T,
    /// Its index in the sorted input
    pub index: usize,
    /// The side of the split it lies on
    pub side: Side,
}

impl<T> Nearest<T> {
    /// Sorted indices of all `k` nearest elements
    ///
    /// The `k` nearest elements of a sorted sequence are contiguous and the
    /// k-th one sits at the end of that range facing away from the query.
    /// `k` must be the rank this result was queried with.
    pub fn window(&self, k: usize) -> Range<usize> {
        match self.side {
            Side::Left => self.index..self.index + k,
            Side::Right => (self.index + 1).saturating_sub(k)..self.index + 1,
        }
    }
}


/// A node restricted to the elements on one side of the split
#[derive(Clone, Copy, Debug)]
struct Cursor {
    node: NodeId,
    side: Side,
}

/// A child of a cursor node together with its element count on that side
#[derive(Clone, Copy, Debug)]
struct Branch {
    node: NodeId,
    count: usize,
}


impl<T> SplitTree<T> {
    /// Find the k-th nearest element on a split tree
    ///
    /// `k` starts at 1 for the nearest element. Two elements at the same
    /// distance are ordered by value, so the left side wins a tie. This only
    /// reads the tree.
    ///
    /// # Parameters
    ///
    /// - `q` must be the value the tree is currently split for.
    /// - `distance` must grow with the number of elements between its
    ///   arguments, like `util::abs_distance` does for numbers.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `k` is not in `[1, len]`.
    /// - `InconsistentState` if the tree is not split.
    pub fn get_k_nearest<D, N>(&self, k: usize, q: &T, distance: D) -> Result<Nearest<T>>
        where T: Clone,
              D: Fn(&T, &T) -> N,
              N: PartialOrd,
    {
        self.check_rank(k)?;
        let counts = match self.nodes[self.root.0].split.counts() {
            Some(counts) => counts,
            None => {
                tracing::warn!("k-nearest query on an unsplit tree");
                return Err(Error::InconsistentState(
                    "tree must be split before querying".to_string()
                ));
            },
        };

        let start = |side| if counts.on(side) > 0 {
            Some(self.settle(Cursor { node: self.root, side }))
        }
        else {
            None
        };
        let mut blue = start(Side::Left);
        let mut red = start(Side::Right);
        let mut k = k;

        while let (Some(mut b), Some(mut r)) = (blue, red) {
            if self.closer(r, b, q, &distance) {
                mem::swap(&mut b, &mut r);
            }
            let blue_branches = self.branches(b);
            let blue_closer = blue_branches.map_or(1, |[closer, _]| closer.count);
            let blue_farther = |branches: Option<[Branch; 2]>| {
                branches.map(|[_, farther]| self.settle(Cursor { node: farther.node, side: b.side }))
            };
            match self.branches(r) {
                // A lone red element: either blue's closer branch holds the
                // answer and red is too far, or that branch comes first.
                None => if blue_closer < k {
                    k -= blue_closer;
                    blue = blue_farther(blue_branches);
                    red = Some(r);
                }
                else {
                    blue = Some(b);
                    red = None;
                },
                Some([red_closer, _]) => if blue_closer + red_closer.count < k {
                    k -= blue_closer;
                    blue = blue_farther(blue_branches);
                    red = Some(r);
                }
                else {
                    blue = Some(b);
                    red = Some(self.settle(Cursor { node: red_closer.node, side: r.side }));
                },
            }
        }

        let cursor = match blue.or(red) {
            Some(cursor) => cursor,
            None => return Err(Error::InconsistentState(
                "split counts do not cover the requested rank".to_string()
            )),
        };
        let index = self.select(cursor, k);
        Ok(Nearest {
            value: self.nodes[index].value.clone(),
            index,
            side: cursor.side,
        })
    }

    /// Split, query and restore in one step
    ///
    /// The tree is observably unchanged afterwards, whether the query
    /// succeeded or not.
    ///
    /// ```
    /// use splitree::SplitTree;
    /// use splitree::util::{abs_distance, left_separator, leq};
    ///
    /// let mut tree = SplitTree::generate_tree(vec![1, 4, 7, 8, 10], left_separator).unwrap();
    /// let nearest = tree.query_k_nearest(2, &5, leq, abs_distance).unwrap();
    /// assert_eq!(nearest.value, 7);
    /// assert!(!tree.is_split());
    /// ```
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `k` is not in `[1, len]`.
    /// - `InconsistentState` if a split from an earlier manual
    ///   `set_tree_counts` is still active.
    pub fn query_k_nearest<L, D, N>(&mut self, k: usize, q: &T, leq: L, distance: D) -> Result<Nearest<T>>
        where T: Clone,
              L: Fn(&T, &T) -> bool,
              D: Fn(&T, &T) -> N,
              N: PartialOrd,
    {
        self.query_k_nearest_with(k, q, leq, distance, &QueryOptions::default())
    }

    /// Like `query_k_nearest`, with an explicit restore strategy
    pub fn query_k_nearest_with<L, D, N>(
            &mut self,
            k: usize,
            q: &T,
            leq: L,
            distance: D,
            options: &QueryOptions,
        ) -> Result<Nearest<T>>
        where T: Clone,
              L: Fn(&T, &T) -> bool,
              D: Fn(&T, &T) -> N,
              N: PartialOrd,
    {
        self.check_rank(k)?;
        let path = self.query_tree(q, leq);
        let found = match options.restore {
            RestoreStrategy::Sweep => {
                self.set_tree_counts(&path)?;
                let found = self.get_k_nearest(k, q, &distance);
                self.reset_tree_counts(&path)?;
                found
            },
            RestoreStrategy::Snapshot => {
                let snapshot = self.snapshot(&path);
                self.set_tree_counts(&path)?;
                let found = self.get_k_nearest(k, q, &distance);
                self.restore(snapshot);
                found
            },
        };
        if let Ok(ref nearest) = found {
            tracing::trace!(k, path = path.len(), index = nearest.index, "k-nearest query");
        }
        found
    }

    fn check_rank(&self, k: usize) -> Result<()> {
        if k == 0 || k > self.len() {
            return Err(Error::OutOfRange { k, len: self.len() });
        }
        Ok(())
    }

    /// Closer and farther branch of a cursor, `None` for a leaf
    ///
    /// Counts are restricted to the cursor's side. A branch lying wholly on
    /// the other side has count zero.
    fn branches(&self, cursor: Cursor) -> Option<[Branch; 2]> {
        let node = &self.nodes[cursor.node.0];
        let (left, right) = match node.state {
            NodeState::Leaf(_) => return None,
            NodeState::Branch(children) => children,
        };
        let side = cursor.side;
        let whole = |id: NodeId, on: Side| if side == on { self.nodes[id.0].count } else { 0 };
        let (left_count, right_count) = match node.split.direction() {
            // off the path the whole node lies on the cursor's side
            None => (self.nodes[left.0].count, self.nodes[right.0].count),
            Some(Direction::Left) =>
                (self.split_or_full(left, side), whole(right, Side::Right)),
            Some(Direction::Right) =>
                (whole(left, Side::Left), self.split_or_full(right, side)),
        };
        let left = Branch { node: left, count: left_count };
        let right = Branch { node: right, count: right_count };
        Some(match side {
            Side::Left => [right, left],
            Side::Right => [left, right],
        })
    }

    /// Descend past branches holding no element of the cursor's side
    fn settle(&self, cursor: Cursor) -> Cursor {
        let mut cursor = cursor;
        while let Some([closer, farther]) = self.branches(cursor) {
            if closer.count == 0 {
                cursor.node = farther.node;
            }
            else if farther.count == 0 {
                cursor.node = closer.node;
            }
            else {
                break;
            }
        }
        cursor
    }

    /// Sorted index of the farthest element in a cursor's closer branch
    ///
    /// For a settled cursor this is the element next to the node's cut on
    /// the cursor's side, or the element itself for a leaf.
    fn frontier(&self, cursor: Cursor) -> usize {
        let node = &self.nodes[cursor.node.0];
        match node.state {
            NodeState::Leaf(index) => index,
            NodeState::Branch((left, _)) => {
                let cut = node.first + self.nodes[left.0].count;
                match cursor.side {
                    Side::Left => cut,
                    Side::Right => cut - 1,
                }
            },
        }
    }

    /// Whether the frontier of `a` comes before the frontier of `b`
    fn closer<D, N>(&self, a: Cursor, b: Cursor, q: &T, distance: &D) -> bool
        where D: Fn(&T, &T) -> N,
              N: PartialOrd,
    {
        let da = distance(q, &self.nodes[self.frontier(a)].value);
        let db = distance(q, &self.nodes[self.frontier(b)].value);
        match da.partial_cmp(&db) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => a.side == Side::Left,
            _ => false,
        }
    }

    /// k-th element of a single cursor, as a sorted index
    fn select(&self, cursor: Cursor, k: usize) -> usize {
        let mut cursor = cursor;
        let mut k = k;
        while let Some([closer, farther]) = self.branches(cursor) {
            if closer.count >= k {
                cursor.node = closer.node;
            }
            else {
                k -= closer.count;
                cursor.node = farther.node;
            }
        }
        self.frontier(cursor)
    }
}
