use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::StoreResult;
use crate::traits::{KvStore, Namespace};

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and embedding. Each namespace is its own ordered map,
/// so prefix scans walk keys in byte order and namespaces cannot collide.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct InMemoryKvStore {
    spaces: BTreeMap<Namespace, BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all namespaces.
    pub fn len(&self) -> usize {
        self.spaces.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no namespace holds any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries in one namespace.
    pub fn namespace_len(&self, namespace: Namespace) -> usize {
        self.spaces.get(&namespace).map_or(0, BTreeMap::len)
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, namespace: Namespace, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self
            .spaces
            .get(&namespace)
            .and_then(|space| space.get(key))
            .cloned())
    }

    fn set(&mut self, namespace: Namespace, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        self.spaces
            .entry(namespace)
            .or_default()
            .insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, namespace: Namespace, key: &[u8]) -> StoreResult<bool> {
        Ok(self
            .spaces
            .get_mut(&namespace)
            .map_or(false, |space| space.remove(key).is_some()))
    }

    fn scan_prefix(
        &self,
        namespace: Namespace,
        prefix: &[u8],
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let Some(space) = self.spaces.get(&namespace) else {
            return Ok(Vec::new());
        };
        Ok(space
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("InMemoryKvStore");
        for namespace in Namespace::ALL {
            dbg.field(namespace.as_str(), &self.namespace_len(namespace));
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let mut store = InMemoryKvStore::new();
        store.set(Namespace::Listings, b"foo", b"bar".to_vec()).unwrap();
        assert_eq!(
            store.get(Namespace::Listings, b"foo").unwrap(),
            Some(b"bar".to_vec())
        );
        assert!(store.contains(Namespace::Listings, b"foo").unwrap());
    }

    #[test]
    fn missing_key_is_none() {
        let store = InMemoryKvStore::new();
        assert!(store.get(Namespace::Ballots, b"nope").unwrap().is_none());
    }

    #[test]
    fn set_overwrites() {
        let mut store = InMemoryKvStore::new();
        store.set(Namespace::Commitments, b"k", vec![1]).unwrap();
        store.set(Namespace::Commitments, b"k", vec![2]).unwrap();
        assert_eq!(store.get(Namespace::Commitments, b"k").unwrap(), Some(vec![2]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn namespaces_are_isolated() {
        let mut store = InMemoryKvStore::new();
        store.set(Namespace::Listings, b"same", vec![1]).unwrap();
        store.set(Namespace::Ballots, b"same", vec![2]).unwrap();
        assert_eq!(store.get(Namespace::Listings, b"same").unwrap(), Some(vec![1]));
        assert_eq!(store.get(Namespace::Ballots, b"same").unwrap(), Some(vec![2]));
        assert!(store.get(Namespace::Reveals, b"same").unwrap().is_none());
    }

    #[test]
    fn delete_reports_existence() {
        let mut store = InMemoryKvStore::new();
        store.set(Namespace::Reveals, b"k", vec![1]).unwrap();
        assert!(store.delete(Namespace::Reveals, b"k").unwrap());
        assert!(!store.delete(Namespace::Reveals, b"k").unwrap());
        assert!(!store.delete(Namespace::Accounts, b"k").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn scan_prefix_is_ordered_and_bounded() {
        let mut store = InMemoryKvStore::new();
        store.set(Namespace::Reveals, b"ab2", vec![2]).unwrap();
        store.set(Namespace::Reveals, b"ab1", vec![1]).unwrap();
        store.set(Namespace::Reveals, b"ac", vec![3]).unwrap();
        store.set(Namespace::Reveals, b"a", vec![0]).unwrap();
        store.set(Namespace::Commitments, b"ab0", vec![9]).unwrap();

        let hits = store.scan_prefix(Namespace::Reveals, b"ab").unwrap();
        let keys: Vec<&[u8]> = hits.iter().map(|(k, _)| k.as_slice()).collect();
        assert_eq!(keys, vec![&b"ab1"[..], &b"ab2"[..]]);

        assert_eq!(store.scan_prefix(Namespace::Reveals, b"").unwrap().len(), 4);
        assert!(store.scan_prefix(Namespace::Listings, b"").unwrap().is_empty());
    }

    #[test]
    fn debug_shows_namespace_counts() {
        let mut store = InMemoryKvStore::new();
        store.set(Namespace::Listings, b"x", vec![]).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("listings: 1"));
    }
}
