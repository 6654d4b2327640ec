use std::iter::FusedIterator;

use super::{node::NodeId, rbtree::RBTree, rbtree_traits::KeyOfValue};

/// In-order traversal that follows parent links to find each successor,
/// so it needs no stack and borrows the tree only for reading.
#[derive(Clone)]
pub struct InOrderIter<'a, V: KeyOfValue> {
    tree: &'a RBTree<V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, V: KeyOfValue> InOrderIter<'a, V> {
    pub(crate) fn new(tree: &'a RBTree<V>) -> Self {
        Self {
            tree,
            next: tree.root().map(|root| tree.leftmost(root)),
            remaining: tree.len(),
        }
    }

    fn successor(&self, id: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        if let Some(right) = tree.node(id).right {
            return Some(tree.leftmost(right));
        }

        // climb until we come up from a left subtree
        let mut child = id;
        let mut parent = tree.node(id).parent;
        while let Some(p) = parent {
            if tree.node(p).left == Some(child) {
                break;
            }
            child = p;
            parent = tree.node(p).parent;
        }
        parent
    }
}

impl<'a, V: KeyOfValue> Iterator for InOrderIter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let curr = self.next?;
        self.next = self.successor(curr);
        self.remaining -= 1;
        Some(&self.tree.node(curr).value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V: KeyOfValue> ExactSizeIterator for InOrderIter<'a, V> {}

impl<'a, V: KeyOfValue> FusedIterator for InOrderIter<'a, V> {}

#[cfg(test)]
#[test]
fn test_iter_restarts() {
    let mut tree = RBTree::new();
    for k in [5u32, 3, 8, 1, 4, 9] {
        tree.insert((k, ())).unwrap();
    }
    let first: Vec<u32> = tree.iter().map(|v| v.0).collect();
    let second: Vec<u32> = tree.iter().map(|v| v.0).collect();
    assert_eq!(first, vec![1, 3, 4, 5, 8, 9]);
    assert_eq!(first, second);
    assert_eq!(tree.iter().len(), 6);
}
