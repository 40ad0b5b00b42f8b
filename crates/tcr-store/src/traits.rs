use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cache::ChangeSet;
use crate::error::StoreResult;

/// Isolated key spaces of the registry store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Namespace {
    /// Listing records keyed by identifier.
    Listings,
    /// Vote commitments keyed by voter.
    Commitments,
    /// Revealed votes keyed by voter.
    Reveals,
    /// Ballots keyed by identifier.
    Ballots,
    /// Account balances keyed by address.
    Accounts,
}

impl Namespace {
    /// Every namespace, in a fixed order.
    pub const ALL: [Namespace; 5] = [
        Namespace::Listings,
        Namespace::Commitments,
        Namespace::Reveals,
        Namespace::Ballots,
        Namespace::Accounts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listings => "listings",
            Self::Commitments => "commits",
            Self::Reveals => "reveals",
            Self::Ballots => "ballots",
            Self::Accounts => "accounts",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, namespaced key-value store.
///
/// All implementations must satisfy these invariants:
/// - Namespaces are isolated: a write in one is never visible in another.
/// - `scan_prefix` returns entries in ascending key byte order.
/// - The store never interprets keys or values.
/// - All backend errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, namespace: Namespace, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, namespace: Namespace, key: &[u8], value: Vec<u8>) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    fn delete(&mut self, namespace: Namespace, key: &[u8]) -> StoreResult<bool>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    ///
    /// Pass `&[]` to list the whole namespace.
    fn scan_prefix(&self, namespace: Namespace, prefix: &[u8])
        -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Check whether `key` exists.
    fn contains(&self, namespace: Namespace, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(namespace, key)?.is_some())
    }

    /// Apply a buffered change set in key order.
    ///
    /// Default implementation calls `set()`/`delete()` per entry. Backends
    /// may override to commit the whole set at once.
    fn apply(&mut self, changes: ChangeSet) -> StoreResult<()> {
        for ((namespace, key), value) in changes.into_entries() {
            match value {
                Some(value) => self.set(namespace, &key, value)?,
                None => {
                    self.delete(namespace, &key)?;
                }
            }
        }
        Ok(())
    }
}
