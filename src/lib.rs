//! An order-statistic split tree
//!
//! A `SplitTree` is a static balanced binary tree over a sorted sequence. It
//! answers "which element is the k-th nearest to `q`" in `O(log n)` steps by
//! splitting itself logically along the search path for `q`, walking the two
//! halves like two sorted sequences being merged, and then undoing the split.
//!
//! ```
//! use splitree::SplitTree;
//! use splitree::util::{abs_distance, left_separator, leq};
//!
//! let mut tree = SplitTree::generate_tree(vec![1.0, 2.0, 3.0, 4.0, 5.0], left_separator).unwrap();
//! let nearest = tree.query_k_nearest(1, &3.5, leq, abs_distance).unwrap();
//! assert_eq!(nearest.value, 3.0);
//! ```
//!
//! Queries mutate transient annotations on the tree and therefore take
//! `&mut self`. Share a tree between threads behind a `Mutex`, or give every
//! thread its own clone.

#![warn(missing_docs)]

pub mod error;
pub mod iter;
pub mod naive;
pub mod nearest;
pub mod path;
pub mod split;
pub mod traits;
pub mod tree;
pub mod util;

pub use error::{Error, Result};
pub use nearest::{Nearest, QueryOptions, RestoreStrategy};
pub use path::{Direction, SearchPath, SearchPathEntry};
pub use split::{Side, Snapshot, SplitCounts, SplitState};
pub use traits::{Node, NodeState};
pub use tree::{NodeId, SplitTree, TreeNode};
