use std::collections::BTreeMap;

use crate::error::StoreResult;
use crate::traits::{KvStore, Namespace};

/// Buffered writes and deletes, keyed by `(namespace, key)`.
///
/// `None` marks a deletion. Entries are kept in key order so applying a
/// change set is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: BTreeMap<(Namespace, Vec<u8>), Option<Vec<u8>>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a write (`Some`) or a deletion (`None`).
    pub fn record(&mut self, namespace: Namespace, key: &[u8], value: Option<Vec<u8>>) {
        self.entries.insert((namespace, key.to_vec()), value);
    }

    pub fn into_entries(self) -> impl Iterator<Item = ((Namespace, Vec<u8>), Option<Vec<u8>>)> {
        self.entries.into_iter()
    }
}

/// Transaction-scoped write buffer over a read-only parent store.
///
/// Reads see the buffered writes first and fall through to the parent.
/// Nothing reaches the parent until the caller takes the [`ChangeSet`] with
/// [`CacheKvStore::into_changeset`] and applies it; dropping the cache
/// discards every write made through it.
pub struct CacheKvStore<'a> {
    parent: &'a dyn KvStore,
    changes: ChangeSet,
}

impl<'a> CacheKvStore<'a> {
    pub fn new(parent: &'a dyn KvStore) -> Self {
        Self {
            parent,
            changes: ChangeSet::new(),
        }
    }

    /// Returns `true` if any write or delete has been buffered.
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Consume the cache and return its buffered changes.
    pub fn into_changeset(self) -> ChangeSet {
        self.changes
    }

    fn buffered(&self, namespace: Namespace, key: &[u8]) -> Option<&Option<Vec<u8>>> {
        self.changes.entries.get(&(namespace, key.to_vec()))
    }
}

impl KvStore for CacheKvStore<'_> {
    fn get(&self, namespace: Namespace, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        match self.buffered(namespace, key) {
            Some(value) => Ok(value.clone()),
            None => self.parent.get(namespace, key),
        }
    }

    fn set(&mut self, namespace: Namespace, key: &[u8], value: Vec<u8>) -> StoreResult<()> {
        self.changes.record(namespace, key, Some(value));
        Ok(())
    }

    fn delete(&mut self, namespace: Namespace, key: &[u8]) -> StoreResult<bool> {
        let existed = self.get(namespace, key)?.is_some();
        self.changes.record(namespace, key, None);
        Ok(existed)
    }

    fn scan_prefix(
        &self,
        namespace: Namespace,
        prefix: &[u8],
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .parent
            .scan_prefix(namespace, prefix)?
            .into_iter()
            .collect();

        let overlay = self
            .changes
            .entries
            .range((namespace, prefix.to_vec())..)
            .take_while(|((ns, key), _)| *ns == namespace && key.starts_with(prefix));
        for ((_, key), value) in overlay {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

impl std::fmt::Debug for CacheKvStore<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheKvStore")
            .field("buffered", &self.changes.len())
            .finish()
    }
}
