use didsuite_jwk::{Algorithm, JWK};

use crate::{AlgorithmId, CryptoError};

/// Key generation options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyGenOptions {
    /// Derive the private key from these bytes instead of the OS random number
    /// generator.
    pub seed: Option<[u8; 32]>,
}

impl KeyGenOptions {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { seed: Some(seed) }
    }
}

/// Key generation capability of one algorithm/curve pair.
pub trait KeyGenerator: Send + Sync {
    fn algorithm_id(&self) -> AlgorithmId;

    /// Curve name as found in the `crv` JWK parameter.
    fn curve(&self) -> &'static str;

    /// Multicodec code tagging raw public key bytes of this type.
    fn multicodec(&self) -> u64;

    fn generate_private_key(&self, options: &KeyGenOptions) -> Result<JWK, CryptoError>;

    fn compute_public_key(&self, private_key: &JWK) -> Result<JWK, CryptoError>;

    /// Raw public key bytes, as used in multicodec encodings.
    fn public_key_bytes(&self, public_key: &JWK) -> Result<Vec<u8>, CryptoError>;

    /// Inverse of [`Self::public_key_bytes`].
    fn public_key_from_bytes(&self, bytes: &[u8]) -> Result<JWK, CryptoError>;
}

/// Signing capability of one algorithm/curve pair.
pub trait Signer: Send + Sync {
    /// JWS algorithm produced by [`Self::sign`].
    fn algorithm(&self) -> Algorithm;

    fn sign(&self, private_key: &JWK, payload: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Fails with [`CryptoError::SignatureInvalid`] if the signature does not
    /// match.
    fn verify(&self, public_key: &JWK, payload: &[u8], signature: &[u8])
        -> Result<(), CryptoError>;
}
