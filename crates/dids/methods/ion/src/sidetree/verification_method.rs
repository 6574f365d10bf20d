use std::collections::HashSet;

use didsuite_crypto::{AlgorithmId, CryptoRegistry, KeyGenOptions, KeyManager};
use didsuite_jwk::JWK;
use serde::{Deserialize, Serialize};

use super::{
    validate_id, validate_purposes, ProofPurpose, PublicKeyEntry, PublicKeyJwk, SidetreeError,
    ValidationError, VERIFICATION_METHOD_TYPE,
};

/// Verification method to put in a DID document.
///
/// Either a key the key manager generates, or a public key supplied by the
/// caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VerificationMethodSpec {
    #[serde(rename_all = "camelCase")]
    Generated {
        algorithm_id: AlgorithmId,
        #[serde(skip)]
        options: KeyGenOptions,
        /// Defaults to the key alias.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        purposes: Vec<ProofPurpose>,
    },
    #[serde(rename_all = "camelCase")]
    External {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        controller: Option<String>,
        jwk: JWK,
        purposes: Vec<ProofPurpose>,
        /// Defaults to [`VERIFICATION_METHOD_TYPE`].
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        type_: Option<String>,
    },
}

impl VerificationMethodSpec {
    /// Key generated with `algorithm_id`, identified by its alias.
    pub fn generated(algorithm_id: AlgorithmId, purposes: Vec<ProofPurpose>) -> Self {
        Self::Generated {
            algorithm_id,
            options: KeyGenOptions::default(),
            id: None,
            purposes,
        }
    }

    pub fn external(id: impl Into<String>, jwk: JWK, purposes: Vec<ProofPurpose>) -> Self {
        Self::External {
            id: id.into(),
            controller: None,
            jwk,
            purposes,
            type_: None,
        }
    }

    /// Id given by the caller. Generated keys without one take their alias.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Generated { id, .. } => id.as_deref(),
            Self::External { id, .. } => Some(id),
        }
    }

    /// Everything that can be checked without generating a key.
    pub fn check(&self, registry: &CryptoRegistry) -> Result<(), SidetreeError> {
        if let Some(id) = self.id() {
            validate_id("public key", id)?;
        }
        match self {
            Self::Generated {
                algorithm_id,
                purposes,
                ..
            } => {
                registry.key_generator(algorithm_id)?;
                validate_purposes(self.id().unwrap_or_default(), purposes)?;
            }
            Self::External {
                id, jwk, purposes, ..
            } => {
                if !jwk.is_public() {
                    return Err(ValidationError::PrivateKey.into());
                }
                validate_purposes(id, purposes)?;
            }
        }
        Ok(())
    }
}

/// [`VerificationMethodSpec::check`] each spec and reject repeated ids.
pub fn check_verification_methods(
    specs: &[VerificationMethodSpec],
    registry: &CryptoRegistry,
) -> Result<(), SidetreeError> {
    let mut ids = HashSet::new();
    for spec in specs {
        spec.check(registry)?;
        if let Some(id) = spec.id() {
            if !ids.insert(id) {
                return Err(ValidationError::DuplicatePublicKeyId(id.to_owned()).into());
            }
        }
    }
    Ok(())
}

/// Turn a [`VerificationMethodSpec`] into a public key entry.
///
/// Generated keys are created through `key_manager`; their alias is returned
/// alongside the entry. External keys return no alias.
pub fn resolve_to_public_key(
    spec: VerificationMethodSpec,
    key_manager: &dyn KeyManager,
) -> Result<(Option<String>, PublicKeyEntry), SidetreeError> {
    match spec {
        VerificationMethodSpec::Generated {
            algorithm_id,
            options,
            id,
            purposes,
        } => {
            let alias = key_manager.generate_private_key(&algorithm_id, &options)?;
            let public_key = key_manager.get_public_key(&alias)?;
            let id = id.unwrap_or_else(|| alias.clone());
            validate_id("public key", &id)?;
            let entry = PublicKeyEntry {
                id,
                r#type: VERIFICATION_METHOD_TYPE.to_owned(),
                controller: None,
                public_key_jwk: PublicKeyJwk::try_from(public_key)?,
                purposes,
            };
            Ok((Some(alias), entry))
        }
        VerificationMethodSpec::External {
            id,
            controller,
            jwk,
            purposes,
            type_,
        } => {
            validate_id("public key", &id)?;
            let entry = PublicKeyEntry {
                id,
                r#type: type_.unwrap_or_else(|| VERIFICATION_METHOD_TYPE.to_owned()),
                controller,
                public_key_jwk: PublicKeyJwk::try_from(jwk)?,
                purposes,
            };
            Ok((None, entry))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use didsuite_crypto::InMemoryKeyManager;

    use super::*;

    fn key_manager() -> InMemoryKeyManager {
        InMemoryKeyManager::new(Arc::new(CryptoRegistry::with_defaults()))
    }

    fn private_key(km: &InMemoryKeyManager) -> JWK {
        km.registry()
            .key_generator(&AlgorithmId::SECP256K1)
            .unwrap()
            .generate_private_key(&KeyGenOptions::default())
            .unwrap()
    }

    #[test]
    fn generated_key_id_defaults_to_alias() {
        let km = key_manager();
        let spec = VerificationMethodSpec::generated(
            AlgorithmId::ED25519,
            vec![ProofPurpose::Authentication],
        );
        let (alias, entry) = resolve_to_public_key(spec, &km).unwrap();
        let alias = alias.unwrap();
        assert_eq!(entry.id, alias);
        assert_eq!(entry.r#type, VERIFICATION_METHOD_TYPE);
        let jwk = JWK::try_from(&entry.public_key_jwk).unwrap();
        assert!(jwk.equals_public(&km.get_public_key(&alias).unwrap()));
    }

    #[test]
    fn external_private_key_rejected() {
        let km = key_manager();
        let spec = VerificationMethodSpec::external("key-1", private_key(&km), vec![]);
        assert!(matches!(
            spec.check(km.registry()),
            Err(SidetreeError::Validation(ValidationError::PrivateKey))
        ));
        assert!(matches!(
            resolve_to_public_key(spec, &km),
            Err(SidetreeError::Validation(ValidationError::PrivateKey))
        ));
    }

    #[test]
    fn unsupported_algorithm() {
        let km = key_manager();
        let spec = VerificationMethodSpec::generated(AlgorithmId::new("P-256"), vec![]);
        assert!(matches!(
            spec.check(km.registry()),
            Err(SidetreeError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            resolve_to_public_key(spec, &km),
            Err(SidetreeError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn batch_check_rejects_repeated_ids() {
        let km = key_manager();
        let public = private_key(&km).to_public();
        let specs = [
            VerificationMethodSpec::external("key-1", public.clone(), vec![]),
            VerificationMethodSpec::Generated {
                algorithm_id: AlgorithmId::ED25519,
                options: KeyGenOptions::default(),
                id: Some("key-1".to_owned()),
                purposes: vec![],
            },
        ];
        assert!(matches!(
            check_verification_methods(&specs, km.registry()),
            Err(SidetreeError::Validation(ValidationError::DuplicatePublicKeyId(id))) if id == "key-1"
        ));
        let purposes = vec![ProofPurpose::KeyAgreement, ProofPurpose::KeyAgreement];
        let spec = VerificationMethodSpec::external("key-2", public, purposes);
        assert!(matches!(
            spec.check(km.registry()),
            Err(SidetreeError::Validation(ValidationError::DuplicatePurpose { .. }))
        ));
    }
}
