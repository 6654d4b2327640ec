use bitmask_enum::bitmask;

use super::{
    node::NodeId,
    rbtree::RBTree,
    rbtree_traits::{KeyOf, KeyOfValue},
};

/// Invariants found broken by [`RBTree::verify`]. An empty mask means the
/// tree is a valid red-black tree.
#[bitmask(u8)]
pub enum VerifyFlags {
    Ok = 0,
    RedRoot = 1,
    RedRedEdge = 2,
    BlackHeightMismatch = 4,
    OrderViolation = 8,
    StaleParentLink = 16,
}

struct Walk<'a, V: KeyOfValue> {
    tree: &'a RBTree<V>,
    flags: VerifyFlags,
}

impl<'a, V: KeyOfValue> Walk<'a, V> {
    fn flag(&mut self, flag: VerifyFlags) {
        self.flags = self.flags | flag;
    }

    /// Checks the subtree at `id` whose keys must lie strictly between `lo`
    /// and `hi`. Returns the number of black nodes on its leftmost path to a
    /// null position, counting `id` itself.
    fn check(
        &mut self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
        lo: Option<&'a KeyOf<V>>,
        hi: Option<&'a KeyOf<V>>,
    ) -> usize {
        let Some(id) = id else {
            return 0;
        };
        let tree = self.tree;
        let n = tree.node(id);
        let key = n.value.key();

        if n.parent != parent {
            self.flag(VerifyFlags::StaleParentLink);
        }
        if lo.map_or(false, |lo| key <= lo) || hi.map_or(false, |hi| key >= hi) {
            self.flag(VerifyFlags::OrderViolation);
        }
        if n.is_red() {
            let red_child = [n.left, n.right]
                .into_iter()
                .flatten()
                .any(|c| tree.node(c).is_red());
            if red_child {
                self.flag(VerifyFlags::RedRedEdge);
            }
        }

        let left = self.check(n.left, Some(id), lo, Some(key));
        let right = self.check(n.right, Some(id), Some(key), hi);
        if left != right {
            self.flag(VerifyFlags::BlackHeightMismatch);
        }

        left + usize::from(n.is_black())
    }
}

impl<V: KeyOfValue> RBTree<V> {
    /// Walk the whole tree and report every broken red-black or search tree
    /// invariant, including parent links that do not match the child links.
    pub fn verify(&self) -> VerifyFlags {
        self.walk().0
    }

    /// Black nodes on any path from the root down to a null position, not
    /// counting the root. `None` if paths disagree.
    pub fn black_height(&self) -> Option<usize> {
        let (flags, with_root) = self.walk();
        if flags.contains(VerifyFlags::BlackHeightMismatch) {
            return None;
        }
        let root_black = self.root().map_or(0, |r| usize::from(self.node(r).is_black()));
        Some(with_root - root_black)
    }

    fn walk(&self) -> (VerifyFlags, usize) {
        let mut walk = Walk {
            tree: self,
            flags: VerifyFlags::Ok,
        };
        let height = walk.check(self.root(), None, None, None);
        if let Some(root) = self.root() {
            if self.node(root).is_red() {
                walk.flag(VerifyFlags::RedRoot);
            }
        }
        (walk.flags, height)
    }
}
