use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use didsuite_jwk::JWK;

use crate::{AlgorithmId, CryptoError, CryptoRegistry, KeyGenOptions};

/// Key store owning private key material.
///
/// Callers only see aliases and public keys.
pub trait KeyManager: Send + Sync {
    /// Generate a key and return its alias.
    fn generate_private_key(
        &self,
        algorithm_id: &AlgorithmId,
        options: &KeyGenOptions,
    ) -> Result<String, CryptoError>;

    /// Fails with [`CryptoError::KeyNotFound`] for an unknown alias.
    fn get_public_key(&self, alias: &str) -> Result<JWK, CryptoError>;

    /// Fails with [`CryptoError::KeyNotFound`] for an unknown alias.
    fn sign(&self, alias: &str, payload: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// [`KeyManager`] keeping keys in process memory, keyed by JWK thumbprint.
pub struct InMemoryKeyManager {
    registry: Arc<CryptoRegistry>,
    keys: RwLock<HashMap<String, JWK>>,
}

impl InMemoryKeyManager {
    pub fn new(registry: Arc<CryptoRegistry>) -> Self {
        Self {
            registry,
            keys: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &CryptoRegistry {
        &self.registry
    }

    /// Store an existing private key and return its alias.
    pub fn import_private_key(&self, key: JWK) -> Result<String, CryptoError> {
        if key.is_public() {
            return Err(CryptoError::MissingPrivateKey);
        }
        // Reject keys no registered implementation can use.
        self.registry.algorithm_id_for_jwk(&key)?;
        let alias = key.thumbprint()?;
        self.keys
            .write()
            .map_err(|_| CryptoError::KeyStorePoisoned)?
            .insert(alias.clone(), key);
        Ok(alias)
    }

    fn with_key<T>(
        &self,
        alias: &str,
        f: impl FnOnce(&JWK) -> Result<T, CryptoError>,
    ) -> Result<T, CryptoError> {
        let keys = self.keys.read().map_err(|_| CryptoError::KeyStorePoisoned)?;
        let key = keys
            .get(alias)
            .ok_or_else(|| CryptoError::KeyNotFound(alias.to_owned()))?;
        f(key)
    }
}

impl KeyManager for InMemoryKeyManager {
    fn generate_private_key(
        &self,
        algorithm_id: &AlgorithmId,
        options: &KeyGenOptions,
    ) -> Result<String, CryptoError> {
        let key = self
            .registry
            .key_generator(algorithm_id)?
            .generate_private_key(options)?;
        self.import_private_key(key)
    }

    fn get_public_key(&self, alias: &str) -> Result<JWK, CryptoError> {
        self.with_key(alias, |key| {
            let id = self.registry.algorithm_id_for_jwk(key)?;
            self.registry.key_generator(&id)?.compute_public_key(key)
        })
    }

    fn sign(&self, alias: &str, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.with_key(alias, |key| {
            let id = self.registry.algorithm_id_for_jwk(key)?;
            self.registry.signer(&id)?.sign(key, payload)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_manager() -> InMemoryKeyManager {
        InMemoryKeyManager::new(Arc::new(CryptoRegistry::with_defaults()))
    }

    #[test]
    fn alias_is_thumbprint() {
        let km = key_manager();
        let alias = km
            .generate_private_key(&AlgorithmId::ED25519, &KeyGenOptions::default())
            .unwrap();
        let public = km.get_public_key(&alias).unwrap();
        assert!(public.is_public());
        assert_eq!(public.thumbprint().unwrap(), alias);
    }

    #[test]
    fn unknown_alias() {
        let km = key_manager();
        assert!(matches!(
            km.get_public_key("missing"),
            Err(CryptoError::KeyNotFound(alias)) if alias == "missing"
        ));
        assert!(matches!(
            km.sign("missing", b"data"),
            Err(CryptoError::KeyNotFound(_))
        ));
    }

    #[test]
    fn sign_dispatches_on_key_type() {
        let km = key_manager();
        let registry = CryptoRegistry::with_defaults();
        for id in [AlgorithmId::SECP256K1, AlgorithmId::ED25519] {
            let alias = km
                .generate_private_key(&id, &KeyGenOptions::default())
                .unwrap();
            let sig = km.sign(&alias, b"message").unwrap();
            let public = km.get_public_key(&alias).unwrap();
            registry
                .signer(&id)
                .unwrap()
                .verify(&public, b"message", &sig)
                .unwrap();
        }
    }

    #[test]
    fn import_rejects_public_key() {
        let km = key_manager();
        let key = km
            .registry()
            .key_generator(&AlgorithmId::ED25519)
            .unwrap()
            .generate_private_key(&KeyGenOptions::default())
            .unwrap();
        assert!(matches!(
            km.import_private_key(key.to_public()),
            Err(CryptoError::MissingPrivateKey)
        ));
        let alias = km.import_private_key(key.clone()).unwrap();
        assert!(km.get_public_key(&alias).unwrap().equals_public(&key));
    }
}
