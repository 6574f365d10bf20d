use core::fmt;
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Registry key identifying a key generation and signing implementation.
///
/// Derived from the `(alg, crv)` pair found in key metadata, see
/// [`CryptoRegistry::algorithm_id_for`](crate::CryptoRegistry::algorithm_id_for).
/// New algorithms only need a new identifier and a registered implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlgorithmId(Cow<'static, str>);

impl AlgorithmId {
    /// ECDSA over secp256k1 (ES256K).
    pub const SECP256K1: Self = Self(Cow::Borrowed("secp256k1"));

    /// EdDSA over Ed25519.
    pub const ED25519: Self = Self(Cow::Borrowed("Ed25519"));

    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for AlgorithmId {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for AlgorithmId {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
