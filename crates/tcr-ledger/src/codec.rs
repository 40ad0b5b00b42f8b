//! Deterministic key and record encodings.
//!
//! Keys and records are bincode-encoded (fixed-width little-endian integers,
//! length-prefixed strings), which is identical on every replica. A listing
//! key is the encoding of its identifier; a voter key is the encoding of
//! [`Voter`], which starts with that same identifier encoding. All voters on
//! one listing therefore share the listing key as a prefix.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tcr_store::Namespace;
use tcr_types::Voter;

use crate::error::{RegistryError, RegistryResult};

/// Key of a listing or ballot.
pub fn listing_key(identifier: &str) -> RegistryResult<Vec<u8>> {
    encode(&identifier)
}

/// Key of a commitment or revealed vote.
pub fn voter_key(voter: &Voter) -> RegistryResult<Vec<u8>> {
    encode(voter)
}

/// Common key prefix of every voter on `identifier`.
pub fn voter_prefix(identifier: &str) -> RegistryResult<Vec<u8>> {
    listing_key(identifier)
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> RegistryResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| RegistryError::Serialization(e.to_string()))
}

/// Decode a stored key or record. Failure means the store is corrupt.
pub fn decode<T: DeserializeOwned>(namespace: Namespace, bytes: &[u8]) -> RegistryResult<T> {
    bincode::deserialize(bytes).map_err(|e| RegistryError::Corrupt {
        namespace,
        reason: e.to_string(),
    })
}
