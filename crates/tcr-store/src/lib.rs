//! Namespaced key-value storage for the token curated registry.
//!
//! The registry persists every record as opaque bytes under a deterministic
//! key encoding. Keys live in isolated [`Namespace`]s, so the same key bytes
//! in two namespaces never collide.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryKvStore`] -- ordered `BTreeMap` store for tests and embedding
//! - [`CacheKvStore`] -- write buffer over a parent store; flushed on success,
//!   dropped on failure
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- it is a pure key-value store.
//! 2. Iteration order is the byte order of keys, identical on every replica.
//! 3. Writes take `&mut self`: exactly one mutator at a time.
//! 4. A transaction writes only into a [`CacheKvStore`]; its [`ChangeSet`]
//!    reaches the parent store only when the transaction succeeds.

pub mod cache;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use cache::{CacheKvStore, ChangeSet};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use traits::{KvStore, Namespace};
