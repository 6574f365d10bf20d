//! Sidetree operations as submitted to the [REST API](https://identity.foundation/sidetree/api/#sidetree-operations).
use serde::{Deserialize, Serialize};

use super::{
    hash::{self, EncodingError, Multihash},
    Commitment, DIDSuffix, Delta, PublicKeyJwk, Reveal,
};

mod verify;
pub use verify::*;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    Create(CreateOperation),
    Update(UpdateOperation),
    Recover(RecoverOperation),
    Deactivate(DeactivateOperation),
}

#[derive(Debug, thiserror::Error)]
pub enum OperationFromTransactionError {
    #[error("missing `sidetreeOperation` property")]
    MissingSidetreeOperation,

    #[error("invalid `sidetreeOperation` value")]
    InvalidSidetreeOperation,
}

impl Operation {
    /// Operation in the `sidetreeOperation` member of a ledger transaction.
    pub fn from_transaction(
        mut transaction: serde_json::Value,
    ) -> Result<Self, OperationFromTransactionError> {
        let value = transaction
            .as_object_mut()
            .and_then(|tx| tx.remove("sidetreeOperation"))
            .ok_or(OperationFromTransactionError::MissingSidetreeOperation)?;
        serde_json::from_value(value)
            .map_err(|_| OperationFromTransactionError::InvalidSidetreeOperation)
    }

    pub fn into_transaction(self) -> Result<serde_json::Value, EncodingError> {
        let value = serde_json::to_value(self).map_err(EncodingError::Json)?;
        Ok(serde_json::json!({ "sidetreeOperation": value }))
    }

    /// DID suffix the operation applies to.
    ///
    /// Computed from the suffix data for a create operation.
    pub fn did_suffix(&self) -> Result<DIDSuffix, EncodingError> {
        match self {
            Self::Create(op) => op.suffix_data.did_suffix(),
            Self::Update(UpdateOperation { did_suffix, .. })
            | Self::Recover(RecoverOperation { did_suffix, .. })
            | Self::Deactivate(DeactivateOperation { did_suffix, .. }) => Ok(did_suffix.clone()),
        }
    }
}

/// [Create](https://identity.foundation/sidetree/spec/v1.0.0/#create).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOperation {
    pub suffix_data: SuffixData,
    pub delta: Delta,
}

/// [Create suffix data](https://identity.foundation/sidetree/spec/v1.0.0/#create-suffix-data-object).
///
/// Unknown members are rejected: they would be dropped on re-serialization
/// and change the DID suffix.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SuffixData {
    /// Hash of the create delta.
    pub delta_hash: Multihash,

    pub recovery_commitment: Commitment,
}

impl SuffixData {
    pub fn did_suffix(&self) -> Result<DIDSuffix, EncodingError> {
        let digest = hash::hash(&hash::canonicalize(self)?);
        Ok(DIDSuffix(hash::encode(digest.as_bytes())))
    }
}

/// [Update](https://identity.foundation/sidetree/spec/v1.0.0/#update), signed
/// with the key behind the last update commitment.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOperation {
    pub did_suffix: DIDSuffix,
    pub reveal_value: Reveal,
    pub delta: Delta,
    /// Compact JWS over [`UpdateClaims`].
    pub signed_data: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaims {
    pub update_key: PublicKeyJwk,
    pub delta_hash: Multihash,
}

/// [Recover](https://identity.foundation/sidetree/spec/v1.0.0/#recover),
/// signed with the key behind the last recovery commitment.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecoverOperation {
    pub did_suffix: DIDSuffix,
    pub reveal_value: Reveal,
    pub delta: Delta,
    /// Compact JWS over [`RecoveryClaims`].
    pub signed_data: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryClaims {
    /// Commitment to the next recovery key.
    pub recovery_commitment: Commitment,
    pub recovery_key: PublicKeyJwk,
    pub delta_hash: Multihash,
}

/// [Deactivate](https://identity.foundation/sidetree/spec/v1.0.0/#deactivate).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeactivateOperation {
    pub did_suffix: DIDSuffix,
    pub reveal_value: Reveal,
    /// Compact JWS over [`DeactivateClaims`].
    pub signed_data: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeactivateClaims {
    pub did_suffix: DIDSuffix,
    pub recovery_key: PublicKeyJwk,
}
