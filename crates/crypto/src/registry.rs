use std::{collections::HashMap, sync::Arc};

use didsuite_jwk::{Algorithm, JWK};

use crate::{
    key::{KeyGenerator, Signer},
    multicodec::MultiEncodedBuf,
    AlgorithmId, CryptoError,
};

struct Entry {
    generator: Arc<dyn KeyGenerator>,
    signer: Arc<dyn Signer>,
}

/// Capability table mapping algorithm identifiers to key generation and
/// signing implementations.
///
/// Built once and passed by reference to everything that dispatches on key
/// type. Tests can construct a registry with only the implementations they
/// need.
#[derive(Default)]
pub struct CryptoRegistry {
    entries: HashMap<AlgorithmId, Entry>,
    by_curve: HashMap<&'static str, AlgorithmId>,
    by_multicodec: HashMap<u64, AlgorithmId>,
}

impl CryptoRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every implementation enabled by crate features.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "secp256k1")]
        registry.register(crate::Secp256k1);
        #[cfg(feature = "ed25519")]
        registry.register(crate::Ed25519);
        registry
    }

    /// Register an implementation providing both capabilities.
    pub fn register<T: KeyGenerator + Signer + 'static>(&mut self, implementation: T) {
        let implementation = Arc::new(implementation);
        self.register_parts(implementation.clone(), implementation);
    }

    /// Register a key generator and a signer under the generator's
    /// [`AlgorithmId`]. A previous registration under the same identifier is
    /// replaced.
    pub fn register_parts(&mut self, generator: Arc<dyn KeyGenerator>, signer: Arc<dyn Signer>) {
        let id = generator.algorithm_id();
        self.by_curve.insert(generator.curve(), id.clone());
        self.by_multicodec.insert(generator.multicodec(), id.clone());
        self.entries.insert(id, Entry { generator, signer });
    }

    pub fn contains(&self, id: &AlgorithmId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn key_generator(&self, id: &AlgorithmId) -> Result<&dyn KeyGenerator, CryptoError> {
        self.entries
            .get(id)
            .map(|entry| entry.generator.as_ref())
            .ok_or_else(|| CryptoError::unsupported(id))
    }

    pub fn signer(&self, id: &AlgorithmId) -> Result<&dyn Signer, CryptoError> {
        self.entries
            .get(id)
            .map(|entry| entry.signer.as_ref())
            .ok_or_else(|| CryptoError::unsupported(id))
    }

    /// Derive the [`AlgorithmId`] from stored key metadata.
    ///
    /// `algorithm` is the optional JWS `alg`; when present it must be the one
    /// produced by the signer registered for `curve`.
    pub fn algorithm_id_for(
        &self,
        algorithm: Option<Algorithm>,
        curve: &str,
    ) -> Result<AlgorithmId, CryptoError> {
        let unsupported = || match algorithm {
            Some(alg) => CryptoError::UnsupportedAlgorithm(format!("{alg}:{curve}")),
            None => CryptoError::UnsupportedAlgorithm(curve.to_owned()),
        };
        let id = self.by_curve.get(curve).ok_or_else(unsupported)?;
        if let Some(alg) = algorithm {
            if self.signer(id)?.algorithm() != alg {
                return Err(unsupported());
            }
        }
        Ok(id.clone())
    }

    pub fn algorithm_id_for_jwk(&self, jwk: &JWK) -> Result<AlgorithmId, CryptoError> {
        self.algorithm_id_for(jwk.algorithm, jwk.curve())
    }

    /// Find the generator understanding a multicodec-tagged public key.
    ///
    /// Returns the generator and the untagged key bytes.
    pub fn generator_for_multicodec<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Result<(&dyn KeyGenerator, &'a [u8]), CryptoError> {
        let (codec, data) = MultiEncodedBuf::parts(bytes)?;
        let id = self
            .by_multicodec
            .get(&codec)
            .ok_or(CryptoError::UnsupportedMulticodec(codec))?;
        Ok((self.key_generator(id)?, data))
    }

    /// Decode a multicodec-tagged public key into a JWK.
    pub fn decode_multicodec(&self, bytes: &[u8]) -> Result<JWK, CryptoError> {
        let (generator, data) = self.generator_for_multicodec(bytes)?;
        generator.public_key_from_bytes(data)
    }

    /// Encode a public key as multicodec-tagged bytes.
    pub fn encode_multicodec(&self, public_key: &JWK) -> Result<MultiEncodedBuf, CryptoError> {
        let generator = self.key_generator(&self.algorithm_id_for_jwk(public_key)?)?;
        let bytes = generator.public_key_bytes(public_key)?;
        Ok(MultiEncodedBuf::encode_bytes(generator.multicodec(), &bytes))
    }
}
