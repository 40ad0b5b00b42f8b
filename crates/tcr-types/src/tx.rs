use serde::{Deserialize, Serialize};

use crate::msg::RegistryMsg;

/// One signature attached to a transaction.
///
/// Keys and signatures travel as raw bytes; the authentication gate checks
/// that they have the expected shape before verifying anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    /// Raw Ed25519 public key of the signer.
    pub pub_key: Vec<u8>,
    /// Raw Ed25519 signature over [`RegistryMsg::sign_bytes`].
    pub signature: Vec<u8>,
}

/// Signed transaction envelope: one message plus its signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: RegistryMsg,
    pub signatures: Vec<StdSignature>,
}

impl StdTx {
    pub fn new(msg: RegistryMsg, signatures: Vec<StdSignature>) -> Self {
        Self { msg, signatures }
    }

    /// An envelope with no signatures attached.
    pub fn unsigned(msg: RegistryMsg) -> Self {
        Self::new(msg, Vec::new())
    }
}
