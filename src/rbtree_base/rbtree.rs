use std::{borrow::Borrow, cmp::Ordering};

use super::{
    iter::InOrderIter,
    node::{Color, Node, NodeId, Side},
    rbtree_traits::{KeyOf, KeyOfValue},
    tree_stats::TreeStats,
};
use crate::error::TreeError;

/// Red-black tree over values carrying their own key. Nodes are kept in an
/// arena and linked by [`NodeId`]; nothing is ever removed from the arena.
pub struct RBTree<V: KeyOfValue> {
    pub(super) root_: Option<NodeId>,
    nodes_: Vec<Node<V>>,
    stats_: TreeStats,
}

impl<V: KeyOfValue> RBTree<V> {
    pub fn new() -> Self {
        Self {
            root_: None,
            nodes_: Vec::new(),
            stats_: TreeStats::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root_: None,
            nodes_: Vec::with_capacity(capacity),
            stats_: TreeStats::new(),
        }
    }
}

impl<V: KeyOfValue> Default for RBTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Node access
impl<V: KeyOfValue> RBTree<V> {
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root_
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes_[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes_[id.index()]
    }

    #[inline]
    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Which child slot of `parent` holds `child`.
    fn side_of(&self, child: NodeId, parent: NodeId) -> Side {
        let p = self.node(parent);
        if p.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(p.right, Some(child), "{:?} is not a child of {:?}", child, parent);
            Side::Right
        }
    }

    fn recolor(&mut self, id: NodeId, color: Color) {
        let node = self.node_mut(id);
        if node.color != color {
            node.color = color;
            self.stats_.recolors += 1;
        }
    }

    pub(crate) fn alloc_node(&mut self, value: V) -> NodeId {
        debug_assert!(self.nodes_.len() < u32::MAX as usize);
        let id = NodeId(self.nodes_.len() as u32);
        self.nodes_.push(Node::new(value));
        id
    }
}

/// Access functions to the item count
impl<V: KeyOfValue> RBTree<V> {
    pub fn len(&self) -> usize {
        self.stats_.size
    }

    pub fn is_empty(&self) -> bool {
        self.root_.is_none()
    }

    pub fn get_stats(&self) -> &TreeStats {
        &self.stats_
    }
}

/// Lookup and traversal
impl<V: KeyOfValue> RBTree<V> {
    /// Descends from the root comparing `key` against each visited node.
    /// Returns `None` once a null child position is reached.
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        KeyOf<V>: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|id| &self.node(id).value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        KeyOf<V>: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        KeyOf<V>: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root_;
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match key.cmp(node.value.key().borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// In-order iterator over the stored values. Calling it again restarts
    /// the traversal from the smallest key.
    pub fn iter(&self) -> InOrderIter<'_, V> {
        InOrderIter::new(self)
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    /// Number of nodes on the longest root to leaf path.
    pub fn height(&self) -> usize {
        fn height_of<V: KeyOfValue>(tree: &RBTree<V>, id: Option<NodeId>) -> usize {
            match id {
                None => 0,
                Some(id) => {
                    let n = tree.node(id);
                    1 + height_of(tree, n.left).max(height_of(tree, n.right))
                }
            }
        }
        height_of(self, self.root_)
    }
}

impl<'a, V: KeyOfValue> IntoIterator for &'a RBTree<V> {
    type Item = &'a V;
    type IntoIter = InOrderIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Insertion
impl<V: KeyOfValue> RBTree<V> {
    /// Insert a value. The descent visits one child per level and remembers
    /// the last node it passed, so the new node is linked without a second
    /// walk. A value whose key is already present is rejected and the tree
    /// is left untouched.
    pub fn insert(&mut self, value: V) -> Result<NodeId, TreeError<KeyOf<V>>> {
        let mut parent: Option<(NodeId, Side)> = None;
        let mut cursor = self.root_;

        while let Some(id) = cursor {
            let node = self.node(id);
            let side = match value.key().cmp(node.value.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    log::debug!("RBTree::insert rejected duplicate key {:?}", value.key());
                    return Err(TreeError::DuplicateKey(value.key().clone()));
                }
            };
            parent = Some((id, side));
            cursor = node.child(side);
        }

        log::debug!("RBTree::insert key {:?} under {:?}", value.key(), parent);

        let z = self.alloc_node(value);
        match parent {
            None => self.root_ = Some(z),
            Some((p, side)) => {
                self.node_mut(p).set_child(side, Some(z));
                self.node_mut(z).parent = Some(p);
            }
        }
        self.stats_.size += 1;

        self.insert_fixup(z);
        Ok(z)
    }

    /// Restore the red-black properties after `z` was linked in red.
    ///
    /// While `z` and its parent are both red: a red uncle is resolved by
    /// recoloring and moving the violation two levels up; otherwise an inner
    /// grandchild is first rotated to the outside, then the grandparent is
    /// rotated toward the uncle, which ends the loop.
    fn insert_fixup(&mut self, mut z: NodeId) {
        while let Some(parent) = self.parent_of(z) {
            if !self.node(parent).is_red() {
                break;
            }
            self.stats_.fixup_iterations += 1;

            let Some(grandparent) = self.parent_of(parent) else {
                // a red parent is never the root
                debug_assert!(false, "red root {:?} during fixup", parent);
                break;
            };

            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.node(grandparent).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.node(u).is_red()) {
                log::debug!("RBTree::insert_fixup recolor at {:?}", grandparent);
                self.recolor(parent, Color::Black);
                self.recolor(uncle, Color::Black);
                self.recolor(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(z, parent) != parent_side {
                log::debug!("RBTree::insert_fixup inner grandchild {:?}", z);
                self.rotate_down(parent, parent_side);
                z = parent;
                parent = match self.parent_of(z) {
                    Some(p) => p,
                    None => break,
                };
            }

            debug_assert_eq!(self.parent_of(parent), Some(grandparent));
            self.recolor(parent, Color::Black);
            self.recolor(grandparent, Color::Red);
            self.rotate_down(grandparent, parent_side.opposite());
        }

        if let Some(root) = self.root_ {
            self.recolor(root, Color::Black);
        }
    }
}

/// Rotation
impl<V: KeyOfValue> RBTree<V> {
    /// Move `x` down to its `dir` side.
    fn rotate_down(&mut self, x: NodeId, dir: Side) {
        match dir {
            Side::Left => self.rotate_left(x),
            Side::Right => self.rotate_right(x),
        }
    }

    /// Lift the right child of `x` into its place; `x` becomes its left child.
    pub(crate) fn rotate_left(&mut self, x: NodeId) {
        self.rotate(x, Side::Left);
    }

    /// Lift the left child of `x` into its place; `x` becomes its right child.
    pub(crate) fn rotate_right(&mut self, x: NodeId) {
        self.rotate(x, Side::Right);
    }

    /// Rotate at `x` so that `x` moves down to the `dir` side. The child on
    /// the other side (`y`) takes over `x`'s slot and `y`'s inner subtree is
    /// handed to `x`. All old links are read before any is written.
    fn rotate(&mut self, x: NodeId, dir: Side) {
        let lifted = dir.opposite();
        let Some(y) = self.node(x).child(lifted) else {
            debug_assert!(false, "rotate {:?} at {:?} without a {:?} child", dir, x, lifted);
            return;
        };
        let inner = self.node(y).child(dir);
        let x_parent = self.parent_of(x);
        let x_slot = x_parent.map(|p| (p, self.side_of(x, p)));

        log::debug!("RBTree::rotate {:?} at {:?}, lifting {:?}", dir, x, y);

        self.node_mut(x).set_child(lifted, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        self.node_mut(y).parent = x_parent;
        match x_slot {
            Some((p, side)) => self.node_mut(p).set_child(side, Some(y)),
            None => self.root_ = Some(y),
        }

        self.node_mut(y).set_child(dir, Some(x));
        self.node_mut(x).parent = Some(y);

        self.stats_.rotations += 1;
    }
}

/// Debug
impl<V: KeyOfValue> RBTree<V> {
    fn print_node(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        id: NodeId,
        depth: usize,
    ) -> std::fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }

        let n = self.node(id);
        writeln!(f, "node {} key {:?} ({})", id.0, n.value.key(), n.color)?;

        for child in [n.left, n.right].into_iter().flatten() {
            self.print_node(f, child, depth + 1)?;
        }

        Ok(())
    }
}

/// Display
impl<V: KeyOfValue> std::fmt::Debug for RBTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "size {} height {} rotations {}",
            self.len(),
            self.height(),
            self.stats_.rotations
        )?;
        if let Some(root) = self.root_ {
            self.print_node(f, root, 0)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbtree_base::verify::VerifyFlags;

    type Tree = RBTree<(u32, &'static str)>;

    fn link(tree: &mut Tree, parent: NodeId, side: Side, child: NodeId) {
        tree.node_mut(parent).set_child(side, Some(child));
        tree.node_mut(child).parent = Some(parent);
    }

    fn key(tree: &Tree, id: Option<NodeId>) -> Option<u32> {
        id.map(|id| tree.node(id).value.0)
    }

    /// x(20) with right child y(30), which has left child beta(25).
    fn right_leaning() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let x = tree.alloc_node((20, "x"));
        let y = tree.alloc_node((30, "y"));
        let beta = tree.alloc_node((25, "beta"));
        link(&mut tree, x, Side::Right, y);
        link(&mut tree, y, Side::Left, beta);
        tree.root_ = Some(x);
        (tree, x, y, beta)
    }

    #[test]
    fn rotate_left_at_root() {
        let (mut tree, x, y, beta) = right_leaning();
        tree.rotate_left(x);

        assert_eq!(tree.root(), Some(y));
        assert_eq!(tree.node(y).parent, None);
        assert_eq!(tree.node(y).left, Some(x));
        assert_eq!(tree.node(y).right, None);
        assert_eq!(tree.node(x).parent, Some(y));
        assert_eq!(tree.node(x).left, None);
        assert_eq!(tree.node(x).right, Some(beta));
        assert_eq!(tree.node(beta).parent, Some(x));
        assert_eq!(tree.get_stats().rotations, 1);
    }

    #[test]
    fn rotate_right_at_root() {
        // x(30) with left child y(20), which has right child beta(25)
        let mut tree = Tree::new();
        let x = tree.alloc_node((30, "x"));
        let y = tree.alloc_node((20, "y"));
        let beta = tree.alloc_node((25, "beta"));
        link(&mut tree, x, Side::Left, y);
        link(&mut tree, y, Side::Right, beta);
        tree.root_ = Some(x);

        tree.rotate_right(x);

        assert_eq!(tree.root(), Some(y));
        assert_eq!(tree.node(y).parent, None);
        assert_eq!(tree.node(y).right, Some(x));
        assert_eq!(tree.node(y).left, None);
        assert_eq!(tree.node(x).parent, Some(y));
        assert_eq!(tree.node(x).left, Some(beta));
        assert_eq!(tree.node(x).right, None);
        assert_eq!(tree.node(beta).parent, Some(x));
    }

    #[test]
    fn rotate_below_parent_repoints_grandparent() {
        let (mut tree, x, y, beta) = right_leaning();
        let top = tree.alloc_node((10, "top"));
        link(&mut tree, top, Side::Right, x);
        tree.root_ = Some(top);

        tree.rotate_left(x);

        assert_eq!(tree.root(), Some(top));
        assert_eq!(tree.node(top).right, Some(y));
        assert_eq!(tree.node(y).parent, Some(top));
        assert_eq!(tree.node(x).parent, Some(y));
        assert_eq!(tree.node(beta).parent, Some(x));

        tree.rotate_right(y);

        assert_eq!(tree.node(top).right, Some(x));
        assert_eq!(tree.node(x).parent, Some(top));
        assert_eq!(tree.node(x).right, Some(y));
        assert_eq!(tree.node(y).parent, Some(x));
        assert_eq!(tree.node(y).left, Some(beta));
        assert_eq!(tree.node(beta).parent, Some(y));
        let flags = tree.verify();
        assert!(!flags.contains(VerifyFlags::StaleParentLink));
        assert!(!flags.contains(VerifyFlags::OrderViolation));
    }

    #[test]
    fn rotate_without_inner_subtree() {
        let mut tree = Tree::new();
        let x = tree.alloc_node((1, "x"));
        let y = tree.alloc_node((2, "y"));
        link(&mut tree, x, Side::Right, y);
        tree.root_ = Some(x);

        tree.rotate_left(x);

        assert_eq!(tree.root(), Some(y));
        assert_eq!(tree.node(x).right, None);
        assert_eq!(tree.node(x).parent, Some(y));
    }

    #[test]
    fn ascending_triple_rotates_once() {
        let mut tree = Tree::new();
        for k in [1, 2, 3] {
            tree.insert((k, "")).unwrap();
        }
        assert_eq!(key(&tree, tree.root()), Some(2));
        let root = tree.node(tree.root().unwrap());
        assert!(root.is_black());
        assert_eq!(key(&tree, root.left), Some(1));
        assert_eq!(key(&tree, root.right), Some(3));
        assert!(tree.node(root.left.unwrap()).is_red());
        assert!(tree.node(root.right.unwrap()).is_red());
        assert_eq!(tree.get_stats().rotations, 1);
    }

    #[test]
    fn inner_grandchild_rotates_twice() {
        let mut tree = Tree::new();
        for k in [30, 10, 20] {
            tree.insert((k, "")).unwrap();
        }
        assert_eq!(key(&tree, tree.root()), Some(20));
        assert_eq!(tree.get_stats().rotations, 2);
        assert!(tree.verify().is_none());

        let mut mirrored = Tree::new();
        for k in [10, 30, 20] {
            mirrored.insert((k, "")).unwrap();
        }
        assert_eq!(key(&mirrored, mirrored.root()), Some(20));
        assert_eq!(mirrored.get_stats().rotations, 2);
    }

    #[test]
    fn red_uncle_only_recolors() {
        let mut tree = Tree::new();
        for k in [20, 10, 30, 40] {
            tree.insert((k, "")).unwrap();
        }
        let root = tree.root().unwrap();
        assert_eq!(key(&tree, Some(root)), Some(20));
        assert_eq!(tree.get_stats().rotations, 0);
        let r = tree.node(root);
        assert!(tree.node(r.left.unwrap()).is_black());
        assert!(tree.node(r.right.unwrap()).is_black());
        let forty = tree.node(r.right.unwrap()).right.unwrap();
        assert!(tree.node(forty).is_red());
        assert_eq!(tree.node(forty).parent, r.right);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut tree = Tree::new();
        tree.insert((7, "first")).unwrap();
        tree.insert((3, "other")).unwrap();

        let err = tree.insert((7, "second")).unwrap_err();
        assert_eq!(err, TreeError::DuplicateKey(7));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.search(&7), Some(&(7, "first")));
        assert!(tree.verify().is_none());
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.black_height(), Some(0));
    }

    #[test]
    fn debug_dump_lists_colors() {
        let mut tree = Tree::new();
        for k in [2, 1, 3] {
            tree.insert((k, "")).unwrap();
        }
        let dump = format!("{:?}", tree);
        assert!(dump.contains("key 2 (Black)"));
        assert!(dump.contains("  node"));
        assert!(dump.contains("key 1 (Red)"));
    }
}
