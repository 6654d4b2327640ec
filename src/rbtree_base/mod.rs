pub mod iter;
pub mod node;
pub mod rbtree;
pub mod rbtree_traits;
mod tree_stats;
pub mod verify;

pub use self::{
    iter::InOrderIter,
    node::{Color, Node, NodeId},
    rbtree::RBTree,
    rbtree_traits::{KeyOf, KeyOfValue},
    tree_stats::TreeStats,
    verify::VerifyFlags,
};

/// Tree keyed by the first element of `(K, V)` pairs.
pub type DefaultRBTree<K, V> = RBTree<(K, V)>;
