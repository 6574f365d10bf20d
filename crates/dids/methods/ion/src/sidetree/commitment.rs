//! [Public Key Commitment Scheme][pkcs].
//!
//! A commitment publishes `H(H(key))` now so that the key itself can be
//! revealed, as `H(key)`, by the next operation. The reveal keeps its
//! multihash envelope; the commitment hashes the raw inner digest. The
//! anchoring network byte-compares both, so neither step may change.
//!
//! [pkcs]: https://identity.foundation/sidetree/spec/v1.0.0/#public-key-commitment-scheme
use didsuite_jwk::{Base64urlUInt, JWK};
use serde::{Deserialize, Serialize};

use super::{
    hash::{self, EncodingError, Multihash},
    SidetreeError, ValidationError,
};

/// Double hash of a canonicalized public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(pub Multihash);

/// Single hash of a canonicalized public key, published when the key is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reveal(pub Multihash);

impl Commitment {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Reveal {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Key as it appears in operations: a public JWK plus an optional
/// [`nonce`](https://identity.foundation/sidetree/spec/#jwk-nonce).
///
/// Members are kept as received, so reveal values and commitments hash the
/// exact JSON the signer committed to. A `d` member fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UncheckedPublicKeyJwk")]
pub struct PublicKeyJwk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Base64urlUInt>,
    #[serde(flatten)]
    jwk: serde_json::Value,
}

#[derive(Deserialize)]
struct UncheckedPublicKeyJwk {
    nonce: Option<Base64urlUInt>,
    #[serde(flatten)]
    jwk: serde_json::Value,
}

impl TryFrom<UncheckedPublicKeyJwk> for PublicKeyJwk {
    type Error = ValidationError;

    fn try_from(value: UncheckedPublicKeyJwk) -> Result<Self, Self::Error> {
        if value.jwk.get("d").is_some() {
            return Err(ValidationError::PrivateKey);
        }
        Ok(Self {
            nonce: value.nonce,
            jwk: value.jwk,
        })
    }
}

impl TryFrom<&JWK> for PublicKeyJwk {
    type Error = SidetreeKeyError;

    fn try_from(jwk: &JWK) -> Result<Self, Self::Error> {
        if !jwk.is_public() {
            return Err(SidetreeKeyError::Validation(ValidationError::PrivateKey));
        }
        let jwk = serde_json::to_value(jwk).map_err(SidetreeKeyError::Serialize)?;
        Ok(Self { jwk, nonce: None })
    }
}

impl TryFrom<JWK> for PublicKeyJwk {
    type Error = SidetreeKeyError;

    fn try_from(jwk: JWK) -> Result<Self, Self::Error> {
        Self::try_from(&jwk)
    }
}

/// Error converting a [JWK] into a [PublicKeyJwk].
#[derive(Debug, thiserror::Error)]
pub enum SidetreeKeyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unable to serialize JWK: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Error converting a [PublicKeyJwk] back into a [JWK].
#[derive(Debug, thiserror::Error)]
#[error("unable to convert public key JWK: {0}")]
pub struct JWKFromPublicKeyJwkError(#[from] serde_json::Error);

/// Drops the nonce.
impl TryFrom<&PublicKeyJwk> for JWK {
    type Error = JWKFromPublicKeyJwkError;

    fn try_from(pkjwk: &PublicKeyJwk) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(pkjwk.jwk.clone())?)
    }
}

impl PublicKeyJwk {
    /// JSON value of the key, without the nonce.
    pub fn jwk(&self) -> &serde_json::Value {
        &self.jwk
    }

    /// `H(JCS(key))`, published when the key is used.
    pub fn reveal(&self) -> Result<Reveal, EncodingError> {
        Ok(Reveal(hash::hash(&hash::canonicalize(self)?)))
    }

    /// `H(digest(H(JCS(key))))`, published one operation ahead of the reveal.
    pub fn commitment(&self) -> Result<Commitment, EncodingError> {
        Ok(Commitment(hash::double_hash(&hash::canonicalize(self)?)))
    }
}

/// Commitment to a public key.
///
/// Fails with [`ValidationError::PrivateKey`] if `key` holds private key
/// material.
pub fn commitment(key: &JWK) -> Result<Commitment, SidetreeError> {
    Ok(PublicKeyJwk::try_from(key)?.commitment()?)
}

/// Reveal value of a public key.
///
/// Fails with [`ValidationError::PrivateKey`] if `key` holds private key
/// material.
pub fn reveal(key: &JWK) -> Result<Reveal, SidetreeError> {
    Ok(PublicKeyJwk::try_from(key)?.reveal()?)
}

#[cfg(test)]
mod tests {
    use didsuite_crypto::{AlgorithmId, CryptoRegistry, KeyGenOptions};
    use serde_json::json;

    use super::*;

    fn keys() -> Vec<JWK> {
        let registry = CryptoRegistry::with_defaults();
        [AlgorithmId::SECP256K1, AlgorithmId::ED25519]
            .iter()
            .map(|id| {
                registry
                    .key_generator(id)
                    .unwrap()
                    .generate_private_key(&KeyGenOptions::default())
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn commitment_is_deterministic_and_order_independent() {
        let a: JWK = serde_json::from_value(json!({
            "kty": "EC",
            "crv": "secp256k1",
            "x": "tXSKB_rubXS7sCjXqupVJEzTcW3MsjmEvq1YpXn96Zg",
            "y": "dOicXqbjFxoGJ-K0-GJ1kHYJqic_D_OMuUwkQ7Ol6nk"
        }))
        .unwrap();
        let b: PublicKeyJwk = serde_json::from_value(json!({
            "y": "dOicXqbjFxoGJ-K0-GJ1kHYJqic_D_OMuUwkQ7Ol6nk",
            "x": "tXSKB_rubXS7sCjXqupVJEzTcW3MsjmEvq1YpXn96Zg",
            "crv": "secp256k1",
            "kty": "EC"
        }))
        .unwrap();
        let commitment_a = commitment(&a).unwrap();
        assert_eq!(commitment_a, commitment(&a).unwrap());
        assert_eq!(commitment_a, b.commitment().unwrap());
    }

    #[test]
    fn commitment_differs_from_reveal() {
        for key in keys() {
            let public = key.to_public();
            let c = commitment(&public).unwrap();
            let r = reveal(&public).unwrap();
            assert_ne!(c.as_bytes(), r.as_bytes());
            // The commitment is the hash of the reveal's raw digest.
            assert_eq!(c.0, hash::hash(r.0.digest()));
        }
    }

    #[test]
    fn private_keys_are_rejected() {
        for key in keys() {
            assert!(matches!(
                commitment(&key),
                Err(SidetreeError::Validation(ValidationError::PrivateKey))
            ));
            assert!(matches!(
                reveal(&key),
                Err(SidetreeError::Validation(ValidationError::PrivateKey))
            ));
        }
    }

    #[test]
    fn deserializing_private_jwk_fails() {
        let result: Result<PublicKeyJwk, _> = serde_json::from_value(json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo",
            "d": "nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A"
        }));
        assert!(result.is_err());
    }
}
