//! Collection types used across Ferrule.
//!
//! Re-exports of the AHash-backed hash collections so every crate hashes the
//! same way.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert(7u64, "handle");
        assert_eq!(map.get(&7), Some(&"handle"));
        assert_eq!(map.remove(&7), Some("handle"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert("Button");
        assert!(set.contains("Button"));
        assert!(!set.contains("Label"));
    }
}
