//! Canonicalization and content hashing.
//!
//! Everything that ends up in a DID (suffix data, deltas, commitments) is
//! hashed from its [JCS] form, so identical logical values always produce
//! identical hashes.
//!
//! [JCS]: https://identity.foundation/sidetree/spec/v1.0.0/#json-canonicalization-scheme
use core::fmt;

use base64::Engine;
use didsuite_crypto::hashes::sha256;
use serde::{Deserialize, Serialize};

const MULTIHASH_SHA2_256_PREFIX: u8 = 0x12;
const MULTIHASH_SHA2_256_SIZE: u8 = 0x20;

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("JSON canonicalization failed: {0}")]
    Canonicalization(#[source] serde_json::Error),

    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("invalid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("expected a sha2-256 multihash")]
    InvalidMultihash,
}

/// [`JSON_CANONICALIZATION_SCHEME`](https://identity.foundation/sidetree/spec/v1.0.0/#json-canonicalization-scheme)
///
/// Fails on `NaN` and infinite numbers, which have no JSON representation.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodingError> {
    super::finite::ensure_finite(value).map_err(EncodingError::Canonicalization)?;
    serde_jcs::to_vec(value).map_err(EncodingError::Canonicalization)
}

/// [`HASH_PROTOCOL`](https://identity.foundation/sidetree/spec/v1.0.0/#hash-protocol):
/// SHA-256 in a multihash envelope.
pub fn hash(data: &[u8]) -> Multihash {
    Multihash::sha2_256(sha256(data))
}

/// Hash of the raw digest of [`hash`], as used for commitments.
pub fn double_hash(data: &[u8]) -> Multihash {
    hash(hash(data).digest())
}

/// Base64url without padding ([`DATA_ENCODING_SCHEME`](https://identity.foundation/sidetree/spec/v1.0.0/#data-encoding-scheme)).
pub fn encode(data: &[u8]) -> String {
    base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(data)
}

pub fn decode(data: &str) -> Result<Vec<u8>, EncodingError> {
    Ok(base64::prelude::BASE64_URL_SAFE_NO_PAD.decode(data)?)
}

/// Self-describing `sha2-256` digest: `0x12 0x20 <digest>`.
///
/// Serialized as an unpadded base64url string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Multihash(Vec<u8>);

impl Multihash {
    /// Encoded length in bytes.
    pub const LENGTH: usize = 34;

    pub fn sha2_256(digest: [u8; 32]) -> Self {
        let mut bytes = Vec::with_capacity(Self::LENGTH);
        bytes.push(MULTIHASH_SHA2_256_PREFIX);
        bytes.push(MULTIHASH_SHA2_256_SIZE);
        bytes.extend_from_slice(&digest);
        Self(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, EncodingError> {
        match bytes.as_slice() {
            [MULTIHASH_SHA2_256_PREFIX, MULTIHASH_SHA2_256_SIZE, digest @ ..]
                if digest.len() == MULTIHASH_SHA2_256_SIZE as usize =>
            {
                Ok(Self(bytes))
            }
            _ => Err(EncodingError::InvalidMultihash),
        }
    }

    /// Envelope and digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Digest without the envelope.
    pub fn digest(&self) -> &[u8] {
        &self.0[2..]
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Display for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.0))
    }
}

impl fmt::Debug for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multihash({self})")
    }
}

impl TryFrom<String> for Multihash {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_bytes(decode(&value)?)
    }
}

impl From<Multihash> for String {
    fn from(value: Multihash) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[test]
    fn canonical_form_ignores_insertion_order() {
        let a = json!({"b": 1, "a": [true, null], "c": {"y": "1", "x": 2.5}});
        let b = json!({"c": {"x": 2.5, "y": "1"}, "a": [true, null], "b": 1});
        assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
        assert_eq!(
            canonicalize(&a).unwrap(),
            br#"{"a":[true,null],"b":1,"c":{"x":2.5,"y":"1"}}"#
        );
    }

    #[test]
    fn unserializable_value_is_encoding_error() {
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), 3u8);
        assert!(matches!(
            canonicalize(&map),
            Err(EncodingError::Canonicalization(_))
        ));
    }

    #[test]
    fn non_finite_numbers_are_encoding_errors() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                canonicalize(&value),
                Err(EncodingError::Canonicalization(_))
            ));
            assert!(matches!(
                canonicalize(&vec![1.0, value]),
                Err(EncodingError::Canonicalization(_))
            ));
        }
        let mut endpoint = BTreeMap::new();
        endpoint.insert("weight", Some(f32::NAN));
        assert!(canonicalize(&endpoint).is_err());
        assert_eq!(canonicalize(&vec![1.5f64]).unwrap(), b"[1.5]");
    }

    #[test]
    fn multihash_envelope() {
        let h = hash(b"");
        assert_eq!(h.as_bytes().len(), 34);
        assert_eq!(&h.as_bytes()[..2], &[0x12, 0x20]);
        assert_eq!(h.digest(), sha256(b""));
        // Every sha2-256 multihash starts with "Ei" in base64url.
        assert!(h.to_string().starts_with("Ei"));
        let parsed: Multihash = serde_json::from_value(json!(h.to_string())).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn double_hash_strips_envelope() {
        let data = b"sidetree";
        assert_eq!(double_hash(data), hash(&sha256(data)));
        assert_ne!(double_hash(data), hash(hash(data).as_bytes()));
    }

    #[test]
    fn rejects_other_multihashes() {
        assert!(Multihash::from_bytes(vec![0x12, 0x20, 0x00]).is_err());
        let mut bytes = hash(b"x").into_bytes();
        bytes[0] = 0x13;
        assert!(matches!(
            Multihash::from_bytes(bytes),
            Err(EncodingError::InvalidMultihash)
        ));
    }
}
