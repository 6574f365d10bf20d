//! Construction of signed Sidetree operations.
//!
//! Each DID carries two hash chains: updates reveal the key behind the last
//! update commitment, recover and deactivate reveal the key behind the last
//! recovery commitment. The builder is stateless; the caller keeps the
//! [`KeyAliases`] returned by each operation and passes them to the next one.
//!
//! Caller input is validated before any key is generated, so a rejected
//! call leaves the key manager untouched.
use std::marker::PhantomData;

use didsuite_crypto::{jws, CryptoRegistry, KeyGenOptions, KeyManager};
use didsuite_jwk::JWK;
use serde::{Deserialize, Serialize};

use super::{
    check_verification_methods, commitment, resolve_to_public_key, reveal, validate_document,
    validate_id, validate_patch, validate_services, CreateOperation, DIDStatePatch, DIDSuffix,
    DeactivateClaims, DeactivateOperation, Delta, DocumentState, Operation, ProofPurpose,
    PublicKeyEntry, PublicKeyJwk, RecoverOperation, RecoveryClaims, ServiceEndpointEntry,
    Sidetree, SidetreeDID, SidetreeError, SuffixData, UpdateClaims, UpdateOperation,
    ValidationError, VerificationMethodSpec,
};

/// Aliases of the keys generated for an operation.
///
/// The update and recovery aliases are needed to build the next operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAliases {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_key_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_key_alias: Option<String>,
    pub verification_key_aliases: Vec<String>,
}

/// Result of [`OperationBuilder::create`].
#[derive(Debug, Clone)]
pub struct CreateOutput {
    pub operation: Operation,
    pub short_form_did: String,
    pub long_form_did: String,
    pub key_aliases: KeyAliases,
}

/// Result of update, recover and deactivate.
#[derive(Debug, Clone)]
pub struct OperationOutput {
    pub operation: Operation,
    pub key_aliases: KeyAliases,
}

/// Document changes carried by an update.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub services_to_add: Vec<ServiceEndpointEntry>,
    pub service_ids_to_remove: Vec<String>,
    pub verification_methods_to_add: Vec<VerificationMethodSpec>,
    pub key_ids_to_remove: Vec<String>,
}

/// Builds Sidetree operations for the DID method `S`.
///
/// New keys are generated with [`Sidetree::KEY_ALGORITHM`] through the key
/// manager. Private keys never leave it; signing goes through
/// [`KeyManager::sign`].
pub struct OperationBuilder<'a, S: Sidetree> {
    registry: &'a CryptoRegistry,
    key_manager: &'a dyn KeyManager,
    _marker: PhantomData<S>,
}

impl<'a, S: Sidetree> OperationBuilder<'a, S> {
    pub fn new(registry: &'a CryptoRegistry, key_manager: &'a dyn KeyManager) -> Self {
        Self {
            registry,
            key_manager,
            _marker: PhantomData,
        }
    }

    /// Generate a key pair for the update or recovery chain.
    fn generate_key(&self) -> Result<(String, JWK), SidetreeError> {
        let alias = self
            .key_manager
            .generate_private_key(&S::KEY_ALGORITHM, &KeyGenOptions::default())?;
        let public_key = self.current_key(&alias)?;
        Ok((alias, public_key))
    }

    /// Public key behind `alias`, checked against the method's key type.
    fn current_key(&self, alias: &str) -> Result<JWK, SidetreeError> {
        let public_key = self.key_manager.get_public_key(alias)?;
        if !S::validate_key(&public_key) {
            return Err(ValidationError::InvalidKeyType.into());
        }
        Ok(public_key)
    }

    fn resolve_verification_methods(
        &self,
        specs: Vec<VerificationMethodSpec>,
        key_aliases: &mut KeyAliases,
    ) -> Result<Vec<PublicKeyEntry>, SidetreeError> {
        specs
            .into_iter()
            .map(|spec| {
                let (alias, entry) = resolve_to_public_key(spec, self.key_manager)?;
                key_aliases.verification_key_aliases.extend(alias);
                Ok(entry)
            })
            .collect()
    }

    fn sign<T: Serialize>(&self, alias: &str, claims: &T) -> Result<String, SidetreeError> {
        Ok(jws::encode_sign(
            self.registry,
            self.key_manager,
            alias,
            claims,
        )?)
    }

    /// Build a [Create][create] operation.
    ///
    /// Without verification methods, one key with the `authentication` and
    /// `assertionMethod` purposes is generated.
    ///
    /// [create]: https://identity.foundation/sidetree/spec/v1.0.0/#create
    pub fn create(
        &self,
        verification_methods: Vec<VerificationMethodSpec>,
        services: Vec<ServiceEndpointEntry>,
    ) -> Result<CreateOutput, SidetreeError> {
        let verification_methods = if verification_methods.is_empty() {
            vec![VerificationMethodSpec::generated(
                S::KEY_ALGORITHM,
                vec![ProofPurpose::Authentication, ProofPurpose::Assertion],
            )]
        } else {
            verification_methods
        };
        check_verification_methods(&verification_methods, self.registry)?;
        validate_services(&services)?;

        let (update_alias, update_key) = self.generate_key()?;
        let (recovery_alias, recovery_key) = self.generate_key()?;
        let mut key_aliases = KeyAliases {
            update_key_alias: Some(update_alias),
            recovery_key_alias: Some(recovery_alias),
            verification_key_aliases: Vec::new(),
        };
        let public_keys =
            self.resolve_verification_methods(verification_methods, &mut key_aliases)?;
        let document = DocumentState {
            public_keys: Some(public_keys),
            services: Some(services),
        };
        validate_document(&document)?;

        let delta = Delta {
            patches: vec![DIDStatePatch::Replace { document }],
            update_commitment: commitment(&update_key)?,
        };
        let suffix_data = SuffixData {
            delta_hash: delta.hash()?,
            recovery_commitment: commitment(&recovery_key)?,
        };
        let create_operation = CreateOperation { suffix_data, delta };
        let long_form_did = SidetreeDID::<S>::long(&create_operation)?;
        let short_form_did = long_form_did.to_short();
        log::debug!("built create operation for {short_form_did}");

        Ok(CreateOutput {
            operation: Operation::Create(create_operation),
            short_form_did: short_form_did.to_string(),
            long_form_did: long_form_did.to_string(),
            key_aliases,
        })
    }

    /// Build an [Update][update] operation signed with the key behind
    /// `update_key_alias`.
    ///
    /// Patches appear in the order add-services, remove-services,
    /// add-public-keys, remove-public-keys; empty lists produce no patch.
    ///
    /// [update]: https://identity.foundation/sidetree/spec/v1.0.0/#update
    pub fn update(
        &self,
        did_suffix: DIDSuffix,
        update_key_alias: &str,
        request: UpdateRequest,
    ) -> Result<OperationOutput, SidetreeError> {
        let UpdateRequest {
            services_to_add,
            service_ids_to_remove,
            verification_methods_to_add,
            key_ids_to_remove,
        } = request;

        check_verification_methods(&verification_methods_to_add, self.registry)?;
        validate_services(&services_to_add)?;
        service_ids_to_remove
            .iter()
            .try_for_each(|id| validate_id("service", id))?;
        key_ids_to_remove
            .iter()
            .try_for_each(|id| validate_id("public key", id))?;

        let update_key = self.current_key(update_key_alias)?;
        let reveal_value = reveal(&update_key)?;
        let (new_update_alias, new_update_key) = self.generate_key()?;
        let mut key_aliases = KeyAliases {
            update_key_alias: Some(new_update_alias),
            ..Default::default()
        };

        let mut patches = Vec::new();
        if !services_to_add.is_empty() {
            patches.push(DIDStatePatch::AddServices {
                services: services_to_add,
            });
        }
        if !service_ids_to_remove.is_empty() {
            patches.push(DIDStatePatch::RemoveServices {
                ids: service_ids_to_remove,
            });
        }
        if !verification_methods_to_add.is_empty() {
            let public_keys =
                self.resolve_verification_methods(verification_methods_to_add, &mut key_aliases)?;
            patches.push(DIDStatePatch::AddPublicKeys { public_keys });
        }
        if !key_ids_to_remove.is_empty() {
            patches.push(DIDStatePatch::RemovePublicKeys {
                ids: key_ids_to_remove,
            });
        }
        patches.iter().try_for_each(validate_patch)?;

        let delta = Delta {
            patches,
            update_commitment: commitment(&new_update_key)?,
        };
        let claims = UpdateClaims {
            update_key: PublicKeyJwk::try_from(&update_key)?,
            delta_hash: delta.hash()?,
        };
        let signed_data = self.sign(update_key_alias, &claims)?;
        log::debug!(
            "built update operation for {did_suffix} with {} patches",
            delta.patches.len()
        );

        Ok(OperationOutput {
            operation: Operation::Update(UpdateOperation {
                did_suffix,
                reveal_value,
                delta,
                signed_data,
            }),
            key_aliases,
        })
    }

    /// Build a [Recover][recover] operation signed with the key behind
    /// `recovery_key_alias`.
    ///
    /// The document is replaced by the given verification methods and
    /// services. Both the update and recovery keys are rotated.
    ///
    /// [recover]: https://identity.foundation/sidetree/spec/v1.0.0/#recover
    pub fn recover(
        &self,
        did_suffix: DIDSuffix,
        recovery_key_alias: &str,
        verification_methods: Vec<VerificationMethodSpec>,
        services: Vec<ServiceEndpointEntry>,
    ) -> Result<OperationOutput, SidetreeError> {
        check_verification_methods(&verification_methods, self.registry)?;
        validate_services(&services)?;

        let recovery_key = self.current_key(recovery_key_alias)?;
        let reveal_value = reveal(&recovery_key)?;
        let (new_update_alias, new_update_key) = self.generate_key()?;
        let (new_recovery_alias, new_recovery_key) = self.generate_key()?;
        let mut key_aliases = KeyAliases {
            update_key_alias: Some(new_update_alias),
            recovery_key_alias: Some(new_recovery_alias),
            verification_key_aliases: Vec::new(),
        };

        let public_keys =
            self.resolve_verification_methods(verification_methods, &mut key_aliases)?;
        let document = DocumentState {
            public_keys: Some(public_keys),
            services: Some(services),
        };
        validate_document(&document)?;

        let delta = Delta {
            patches: vec![DIDStatePatch::Replace { document }],
            update_commitment: commitment(&new_update_key)?,
        };
        let claims = RecoveryClaims {
            recovery_commitment: commitment(&new_recovery_key)?,
            recovery_key: PublicKeyJwk::try_from(&recovery_key)?,
            delta_hash: delta.hash()?,
        };
        let signed_data = self.sign(recovery_key_alias, &claims)?;
        log::debug!("built recover operation for {did_suffix}");

        Ok(OperationOutput {
            operation: Operation::Recover(RecoverOperation {
                did_suffix,
                reveal_value,
                delta,
                signed_data,
            }),
            key_aliases,
        })
    }

    /// Build a [Deactivate][deactivate] operation signed with the key behind
    /// `recovery_key_alias`.
    ///
    /// [deactivate]: https://identity.foundation/sidetree/spec/v1.0.0/#deactivate
    pub fn deactivate(
        &self,
        did_suffix: DIDSuffix,
        recovery_key_alias: &str,
    ) -> Result<OperationOutput, SidetreeError> {
        let recovery_key = self.current_key(recovery_key_alias)?;
        let reveal_value = reveal(&recovery_key)?;
        let claims = DeactivateClaims {
            did_suffix: did_suffix.clone(),
            recovery_key: PublicKeyJwk::try_from(&recovery_key)?,
        };
        let signed_data = self.sign(recovery_key_alias, &claims)?;
        log::debug!("built deactivate operation for {did_suffix}");

        Ok(OperationOutput {
            operation: Operation::Deactivate(DeactivateOperation {
                did_suffix,
                reveal_value,
                signed_data,
            }),
            key_aliases: KeyAliases::default(),
        })
    }
}
