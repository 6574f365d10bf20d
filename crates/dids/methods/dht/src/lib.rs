//! The did:dht Method.
//!
//! The method-specific identifier is the z-base-32 encoded Ed25519 identity
//! key. Publishing and resolving the DNS packet stored in the DHT is left to
//! the caller.
//!
//! See: <https://did-dht.com>
use didsuite_crypto::{AlgorithmId, CryptoError, CryptoRegistry, KeyManager};
use didsuite_jwk::JWK;

pub mod zbase32;

pub const METHOD: &str = "dht";

const PREFIX: &str = "did:dht:";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("did:dht identity keys must be Ed25519, found `{0}`")]
    UnsupportedAlgorithm(AlgorithmId),

    #[error("not a did:dht DID: `{0}`")]
    InvalidMethod(String),

    #[error("invalid method-specific id: {0}")]
    InvalidMethodSpecificId(#[from] zbase32::DecodeError),

    #[error("identity key must be 32 bytes, found {0}")]
    InvalidKeyLength(usize),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// The did:dht Method.
pub struct DIDDHT;

impl DIDDHT {
    /// DID identified by the given Ed25519 public key.
    pub fn generate(registry: &CryptoRegistry, jwk: &JWK) -> Result<String, Error> {
        let algorithm_id = registry.algorithm_id_for_jwk(jwk)?;
        if algorithm_id != AlgorithmId::ED25519 {
            return Err(Error::UnsupportedAlgorithm(algorithm_id));
        }
        let bytes = registry
            .key_generator(&algorithm_id)?
            .public_key_bytes(jwk)?;
        Ok(format!("{PREFIX}{}", zbase32::encode(&bytes)))
    }

    /// Generate a new identity key and return its alias with the DID.
    pub fn generate_with(
        registry: &CryptoRegistry,
        key_manager: &dyn KeyManager,
    ) -> Result<(String, String), Error> {
        let alias = key_manager.generate_private_key(&AlgorithmId::ED25519, &Default::default())?;
        let did = Self::generate(registry, &key_manager.get_public_key(&alias)?)?;
        log::debug!("generated {did}");
        Ok((alias, did))
    }

    /// Identity key of a did:dht DID.
    pub fn identity_key(registry: &CryptoRegistry, did: &str) -> Result<JWK, Error> {
        let id = did
            .strip_prefix(PREFIX)
            .ok_or_else(|| Error::InvalidMethod(did.to_owned()))?;
        let bytes = zbase32::decode(id)?;
        if bytes.len() != 32 {
            return Err(Error::InvalidKeyLength(bytes.len()));
        }
        Ok(registry
            .key_generator(&AlgorithmId::ED25519)?
            .public_key_from_bytes(&bytes)?)
    }
}
