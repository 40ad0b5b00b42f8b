use crate::traits::Namespace;

/// Errors from key-value store operations.
///
/// The in-memory and cache stores never fail; this is the error a
/// persistent [`KvStore`](crate::KvStore) backend reports.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A key in the given namespace could not be read or written.
    #[error("backend failure in {namespace} namespace: {reason}")]
    Backend { namespace: Namespace, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
