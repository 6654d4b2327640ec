use std::fmt;

use crate::{
    error::CatalogError,
    rbtree_base::{InOrderIter, KeyOfValue, RBTree},
};

/// A catalog record: the course number is the unique key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Course {
    pub number: String,
    pub title: String,
    pub prerequisites: Vec<String>,
}

impl Course {
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
            prerequisites: Vec::new(),
        }
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites
            .extend(prerequisites.into_iter().map(Into::into));
        self
    }

    pub fn add_prerequisite(&mut self, prerequisite: impl Into<String>) {
        self.prerequisites.push(prerequisite.into());
    }

    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }
}

impl KeyOfValue for Course {
    type KeyType = String;

    fn key(&self) -> &String {
        &self.number
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.number, self.title)
    }
}

/// Course catalog indexed by course number.
#[derive(Debug, Default)]
pub struct CourseCatalog {
    _tree: RBTree<Course>,
}

impl CourseCatalog {
    pub fn new() -> Self {
        Self {
            _tree: RBTree::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self._tree.is_empty()
    }

    pub fn len(&self) -> usize {
        self._tree.len()
    }

    /// Add a course. A course number that is already cataloged is rejected
    /// and the existing record is kept.
    pub fn insert(&mut self, course: Course) -> Result<(), CatalogError> {
        self._tree.insert(course)?;
        Ok(())
    }

    pub fn search(&self, number: &str) -> Option<&Course> {
        self._tree.search(number)
    }

    pub fn contains(&self, number: &str) -> bool {
        self._tree.contains_key(number)
    }

    /// All courses in increasing course-number order.
    pub fn enumerate(&self) -> InOrderIter<'_, Course> {
        self._tree.iter()
    }

    pub fn tree(&self) -> &RBTree<Course> {
        &self._tree
    }
}
