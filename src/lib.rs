pub mod catalog;
pub mod error;
pub mod generator;
pub mod loader;
pub mod rbtree_base;

pub use catalog::{Course, CourseCatalog};
pub use error::{CatalogError, TreeError};
pub use rbtree_base::{DefaultRBTree, RBTree};
