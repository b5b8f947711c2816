//! Generic tree iterators.

use crate::traits::{Node, NodeState};
use crate::tree::{NodeId, SplitTree};


/// An iterator over the elements of a tree in sorted order.
pub struct Iter<'a, T: 'a> {
    tree: &'a SplitTree<T>,
    nodes: Vec<NodeId>,
}

impl<'a, T> Iter<'a, T> {
    /// Create a new iterator.
    pub fn new(tree: &'a SplitTree<T>) -> Iter<'a, T> {
        let mut nodes = Vec::with_capacity(tree.depth());
        nodes.push(tree.root());
        Iter { tree, nodes }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(id) = self.nodes.pop() {
            let node = self.tree.node(id);
            match node.state() {
                NodeState::Leaf(_) => return Some(node.value()),
                NodeState::Branch((left, right)) => {
                    self.nodes.push(right);
                    self.nodes.push(left);
                },
            }
        }
        None
    }
}


#[cfg(test)]
mod test {
    use quickcheck::{quickcheck, TestResult};

    use crate::tree::SplitTree;
    use crate::util::left_separator;
    use super::*;

    #[test]
    fn iter_single() {
        let tree = SplitTree::generate_tree(vec!['x'], left_separator).unwrap();
        let all: Vec<_> = Iter::new(&tree).collect();
        assert_eq!(all, vec![&'x']);
    }

    #[test]
    fn iter_yields_input_order() {
        fn iter_yields_input_order(data: Vec<i64>) -> TestResult {
            if data.is_empty() {
                return TestResult::discard();
            }
            let mut data = data;
            data.sort();
            let tree = SplitTree::generate_tree(data.clone(), left_separator).unwrap();
            let all: Vec<i64> = tree.iter().cloned().collect();
            TestResult::from_bool(all == data)
        }
        quickcheck(iter_yields_input_order as fn(Vec<i64>) -> TestResult);
    }

    #[test]
    fn iter_by_ref() {
        let tree = SplitTree::generate_tree(vec![1, 2, 3, 4, 5], left_separator).unwrap();
        let mut sum = 0;
        for value in &tree {
            sum += *value;
        }
        assert_eq!(sum, 15);
    }
}
