use std::fmt::Debug;

// Traits bound
/// Extracts the ordering key from a value stored in the tree.
pub trait KeyOfValue {
    type KeyType: Ord + Clone + Debug;
    fn key(&self) -> &Self::KeyType;
}

impl<K: Ord + Clone + Debug, V> KeyOfValue for (K, V) {
    type KeyType = K;

    fn key(&self) -> &K {
        &self.0
    }
}

/// Key type of the values stored in a tree.
pub type KeyOf<V> = <V as KeyOfValue>::KeyType;

#[cfg(test)]
#[test]
fn test_tuple_key_of_value() {
    let pair = ("CS101".to_string(), 3);
    assert_eq!(pair.key(), "CS101");
}
