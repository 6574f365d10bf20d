//! [Operation verification][ov].
//!
//! Verifying an operation on its own checks its hashes, its signature and
//! that the signing key matches the published reveal value. Whether that key
//! is the one committed to by the previous operation is checked separately by
//! [`VerifiedOperation::follows`].
//!
//! [ov]: https://identity.foundation/sidetree/spec/v1.0.0/#operation-verification
use didsuite_crypto::{jws, CryptoError, CryptoRegistry};
use didsuite_jwk::JWK;
use serde::de::DeserializeOwned;

use crate::sidetree::{
    hash::{EncodingError, Multihash},
    Commitment, DIDSuffix, Delta, JWKFromPublicKeyJwkError, PublicKeyJwk, Reveal, Sidetree,
};

use super::{DeactivateClaims, Operation, RecoveryClaims, UpdateClaims};

/// Commitment chain an operation reveals a key from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    /// Update operations.
    Update,
    /// Recover and deactivate operations.
    Recovery,
}

/// Integrity-checked content of an [`Operation`].
#[derive(Debug, Clone)]
pub struct VerifiedOperation {
    /// Set when it is computed (create) or signed (deactivate). Update and
    /// recover do not sign over the suffix.
    pub did_suffix: Option<DIDSuffix>,

    /// Revealed key, absent for create.
    pub revealed: Option<(Chain, PublicKeyJwk)>,

    pub update_commitment: Option<Commitment>,

    pub recovery_commitment: Option<Commitment>,

    pub delta: Option<Delta>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid signature algorithm")]
    InvalidSignatureAlgorithm,

    #[error("reveal value mismatch (computed: {computed:?}, found: {found:?})")]
    RevealValueMismatch { computed: Reveal, found: Reveal },

    #[error("delta hash mismatch")]
    DeltaHashMismatch,

    #[error("DID suffix mismatch")]
    DIDSuffixMismatch,

    #[error("invalid JWS: {0}")]
    Jws(#[source] CryptoError),

    #[error("invalid signed data: {0}")]
    Claims(#[source] serde_json::Error),

    #[error(transparent)]
    Key(#[from] JWKFromPublicKeyJwkError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[derive(Debug, thiserror::Error)]
pub enum FollowsError {
    #[error("create cannot follow")]
    CreateCannotFollow,

    #[error("missing update commitment")]
    MissingUpdateCommitment,

    #[error("missing recovery commitment")]
    MissingRecoveryCommitment,

    #[error("DID suffix mismatch (expected {expected:?}, found {actual:?})")]
    DIDSuffixMismatch {
        expected: DIDSuffix,
        actual: DIDSuffix,
    },

    #[error("commitment mismatch")]
    CommitmentMismatch,

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Payload of an operation's `signedData`.
trait SignedClaims: DeserializeOwned {
    const CHAIN: Chain;

    fn revealed_key(&self) -> &PublicKeyJwk;
}

impl SignedClaims for UpdateClaims {
    const CHAIN: Chain = Chain::Update;

    fn revealed_key(&self) -> &PublicKeyJwk {
        &self.update_key
    }
}

impl SignedClaims for RecoveryClaims {
    const CHAIN: Chain = Chain::Recovery;

    fn revealed_key(&self) -> &PublicKeyJwk {
        &self.recovery_key
    }
}

impl SignedClaims for DeactivateClaims {
    const CHAIN: Chain = Chain::Recovery;

    fn revealed_key(&self) -> &PublicKeyJwk {
        &self.recovery_key
    }
}

/// Decode `signed_data`, check the revealed key against `reveal_value` and
/// verify the signature with it.
fn verify_signed<S: Sidetree, C: SignedClaims>(
    registry: &CryptoRegistry,
    signed_data: &str,
    reveal_value: &Reveal,
) -> Result<C, VerificationError> {
    let jws = jws::decode_unverified(signed_data).map_err(VerificationError::Jws)?;
    if jws.header.algorithm != S::SIGNATURE_ALGORITHM {
        return Err(VerificationError::InvalidSignatureAlgorithm);
    }
    let claims: C = serde_json::from_slice(&jws.payload).map_err(VerificationError::Claims)?;

    let key = claims.revealed_key();
    let computed = key.reveal()?;
    if &computed != reveal_value {
        return Err(VerificationError::RevealValueMismatch {
            computed,
            found: reveal_value.clone(),
        });
    }
    jws.verify(registry, &JWK::try_from(key)?)
        .map_err(VerificationError::Jws)?;
    Ok(claims)
}

fn check_delta(delta: &Delta, delta_hash: &Multihash) -> Result<(), VerificationError> {
    if &delta.hash()? != delta_hash {
        return Err(VerificationError::DeltaHashMismatch);
    }
    Ok(())
}

impl Operation {
    /// Check the operation's internal consistency.
    ///
    /// Signatures are verified with the implementation `registry` holds for
    /// the revealed key's type.
    pub fn verify<S: Sidetree>(
        &self,
        registry: &CryptoRegistry,
    ) -> Result<VerifiedOperation, VerificationError> {
        let verified = match self {
            Self::Create(op) => {
                check_delta(&op.delta, &op.suffix_data.delta_hash)?;
                VerifiedOperation {
                    did_suffix: Some(op.suffix_data.did_suffix()?),
                    revealed: None,
                    update_commitment: Some(op.delta.update_commitment.clone()),
                    recovery_commitment: Some(op.suffix_data.recovery_commitment.clone()),
                    delta: Some(op.delta.clone()),
                }
            }
            Self::Update(op) => {
                let claims: UpdateClaims =
                    verify_signed::<S, _>(registry, &op.signed_data, &op.reveal_value)?;
                check_delta(&op.delta, &claims.delta_hash)?;
                VerifiedOperation {
                    did_suffix: None,
                    revealed: Some((UpdateClaims::CHAIN, claims.update_key)),
                    update_commitment: Some(op.delta.update_commitment.clone()),
                    recovery_commitment: None,
                    delta: Some(op.delta.clone()),
                }
            }
            Self::Recover(op) => {
                let claims: RecoveryClaims =
                    verify_signed::<S, _>(registry, &op.signed_data, &op.reveal_value)?;
                check_delta(&op.delta, &claims.delta_hash)?;
                VerifiedOperation {
                    did_suffix: None,
                    revealed: Some((RecoveryClaims::CHAIN, claims.recovery_key)),
                    update_commitment: Some(op.delta.update_commitment.clone()),
                    recovery_commitment: Some(claims.recovery_commitment),
                    delta: Some(op.delta.clone()),
                }
            }
            Self::Deactivate(op) => {
                let claims: DeactivateClaims =
                    verify_signed::<S, _>(registry, &op.signed_data, &op.reveal_value)?;
                if claims.did_suffix != op.did_suffix {
                    return Err(VerificationError::DIDSuffixMismatch);
                }
                VerifiedOperation {
                    did_suffix: Some(claims.did_suffix),
                    revealed: Some((DeactivateClaims::CHAIN, claims.recovery_key)),
                    update_commitment: None,
                    recovery_commitment: None,
                    delta: None,
                }
            }
        };
        Ok(verified)
    }
}

impl VerifiedOperation {
    /// Check that this operation reveals the key `previous` committed to.
    ///
    /// Suffixes are compared only when both operations carry one; after a
    /// recover the caller has to match the suffix itself.
    pub fn follows(&self, previous: &VerifiedOperation) -> Result<(), FollowsError> {
        let (chain, key) = self
            .revealed
            .as_ref()
            .ok_or(FollowsError::CreateCannotFollow)?;
        if let (Some(expected), Some(actual)) = (&previous.did_suffix, &self.did_suffix) {
            if expected != actual {
                return Err(FollowsError::DIDSuffixMismatch {
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }
        let commitment = match chain {
            Chain::Update => previous
                .update_commitment
                .as_ref()
                .ok_or(FollowsError::MissingUpdateCommitment)?,
            Chain::Recovery => previous
                .recovery_commitment
                .as_ref()
                .ok_or(FollowsError::MissingRecoveryCommitment)?,
        };
        if &key.commitment()? != commitment {
            return Err(FollowsError::CommitmentMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use didsuite_crypto::{InMemoryKeyManager, KeyManager};

    use super::*;
    use crate::{
        sidetree::{hash, DeactivateOperation, OperationBuilder, UpdateRequest},
        ION,
    };

    fn setup() -> (Arc<CryptoRegistry>, InMemoryKeyManager) {
        let registry = Arc::new(CryptoRegistry::with_defaults());
        let km = InMemoryKeyManager::new(registry.clone());
        (registry, km)
    }

    #[test]
    fn tampered_delta_is_rejected() {
        let (registry, km) = setup();
        let builder = OperationBuilder::<ION>::new(&registry, &km);
        let create = builder.create(vec![], vec![]).unwrap();
        let update_alias = create.key_aliases.update_key_alias.as_deref().unwrap();
        let mut update = builder
            .update(
                create.operation.did_suffix().unwrap(),
                update_alias,
                UpdateRequest::default(),
            )
            .unwrap()
            .operation;
        let Operation::Update(op) = &mut update else {
            panic!("expected update operation");
        };
        op.delta.update_commitment = Commitment(hash::hash(b"other key"));
        assert!(matches!(
            update.verify::<ION>(&registry),
            Err(VerificationError::DeltaHashMismatch)
        ));

        let mut create_op = create.operation.clone();
        let Operation::Create(op) = &mut create_op else {
            panic!("expected create operation");
        };
        op.delta.patches.clear();
        assert!(matches!(
            create_op.verify::<ION>(&registry),
            Err(VerificationError::DeltaHashMismatch)
        ));
    }

    #[test]
    fn reveal_value_must_match_signing_key() {
        let (registry, km) = setup();
        let builder = OperationBuilder::<ION>::new(&registry, &km);
        let create = builder.create(vec![], vec![]).unwrap();
        let recovery_alias = create.key_aliases.recovery_key_alias.as_deref().unwrap();
        let mut deactivate = builder
            .deactivate(create.operation.did_suffix().unwrap(), recovery_alias)
            .unwrap()
            .operation;
        let Operation::Deactivate(op) = &mut deactivate else {
            panic!("expected deactivate operation");
        };
        op.reveal_value = Reveal(hash::hash(b"other key"));
        assert!(matches!(
            deactivate.verify::<ION>(&registry),
            Err(VerificationError::RevealValueMismatch { .. })
        ));
    }

    #[test]
    fn deactivate_suffix_must_be_signed() {
        let (registry, km) = setup();
        let builder = OperationBuilder::<ION>::new(&registry, &km);
        let create = builder.create(vec![], vec![]).unwrap();
        let other = builder.create(vec![], vec![]).unwrap();
        let recovery_alias = create.key_aliases.recovery_key_alias.as_deref().unwrap();
        let mut deactivate = builder
            .deactivate(create.operation.did_suffix().unwrap(), recovery_alias)
            .unwrap()
            .operation;
        let Operation::Deactivate(op) = &mut deactivate else {
            panic!("expected deactivate operation");
        };
        op.did_suffix = other.operation.did_suffix().unwrap();
        assert!(matches!(
            deactivate.verify::<ION>(&registry),
            Err(VerificationError::DIDSuffixMismatch)
        ));
    }

    #[test]
    fn deactivate_of_another_did_does_not_follow_its_create() {
        let (registry, km) = setup();
        let builder = OperationBuilder::<ION>::new(&registry, &km);
        let create = builder.create(vec![], vec![]).unwrap();
        let other = builder.create(vec![], vec![]).unwrap();
        let recovery_alias = create.key_aliases.recovery_key_alias.as_deref().unwrap();
        let deactivate = builder
            .deactivate(other.operation.did_suffix().unwrap(), recovery_alias)
            .unwrap()
            .operation
            .verify::<ION>(&registry)
            .unwrap();
        let create = create.operation.verify::<ION>(&registry).unwrap();
        assert!(matches!(
            deactivate.follows(&create),
            Err(FollowsError::DIDSuffixMismatch { .. })
        ));
        assert!(matches!(
            create.follows(&create),
            Err(FollowsError::CreateCannotFollow)
        ));
    }

    #[test]
    fn signature_algorithm_must_be_the_methods() {
        let (registry, km) = setup();
        let builder = OperationBuilder::<ION>::new(&registry, &km);
        let create = builder.create(vec![], vec![]).unwrap();
        let alias = km
            .generate_private_key(&didsuite_crypto::AlgorithmId::ED25519, &Default::default())
            .unwrap();
        let claims = DeactivateClaims {
            did_suffix: create.operation.did_suffix().unwrap(),
            recovery_key: PublicKeyJwk::try_from(km.get_public_key(&alias).unwrap()).unwrap(),
        };
        let deactivate = Operation::Deactivate(DeactivateOperation {
            did_suffix: claims.did_suffix.clone(),
            reveal_value: claims.recovery_key.reveal().unwrap(),
            signed_data: jws::encode_sign(&registry, &km, &alias, &claims).unwrap(),
        });
        assert!(matches!(
            deactivate.verify::<ION>(&registry),
            Err(VerificationError::InvalidSignatureAlgorithm)
        ));
    }
}
