//! DID state carried in operation deltas: public keys, services and the
//! patches that change them.
use core::fmt;

use serde::{Deserialize, Serialize};

use super::{
    hash::{self, EncodingError, Multihash},
    Commitment, PublicKeyJwk,
};

/// `type` of verification methods this crate adds.
pub const VERIFICATION_METHOD_TYPE: &str = "JsonWebSignature2020";

/// Verification relationship a public key is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    Authentication,
    #[serde(rename = "assertionMethod")]
    Assertion,
    KeyAgreement,
    CapabilityInvocation,
    CapabilityDelegation,
}

impl ProofPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Assertion => "assertionMethod",
            Self::KeyAgreement => "keyAgreement",
            Self::CapabilityInvocation => "capabilityInvocation",
            Self::CapabilityDelegation => "capabilityDelegation",
        }
    }
}

impl fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of `publicKeys` in a `replace` or `add-public-keys` patch.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyEntry {
    /// At most 50 base64url characters.
    pub id: String,

    pub r#type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    pub public_key_jwk: PublicKeyJwk,

    pub purposes: Vec<ProofPurpose>,
}

/// Service endpoint URI or map.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ServiceEndpoint {
    Uri(String),
    Map(serde_json::Value),
}

/// Entry of `services` in a `replace` or `add-services` patch.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpointEntry {
    /// At most 50 base64url characters.
    pub id: String,

    /// Fewer than 30 characters.
    pub r#type: String,

    pub service_endpoint: ServiceEndpoint,
}

/// Full document state set by a `replace` patch.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<PublicKeyEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceEndpointEntry>>,
}

/// [Standard patch action](https://identity.foundation/sidetree/spec/v1.0.0/#standard-patch-actions).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum DIDStatePatch {
    /// Adds keys, overwriting existing keys with the same id.
    AddPublicKeys {
        #[serde(rename = "publicKeys")]
        public_keys: Vec<PublicKeyEntry>,
    },

    RemovePublicKeys { ids: Vec<String> },

    AddServices { services: Vec<ServiceEndpointEntry> },

    RemoveServices { ids: Vec<String> },

    Replace { document: DocumentState },
}

/// Patches of a create, update or recover operation, with the commitment to
/// the next update key.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub patches: Vec<DIDStatePatch>,

    pub update_commitment: Commitment,
}

impl Delta {
    /// Hash of the canonical form, signed over as `deltaHash`.
    pub fn hash(&self) -> Result<Multihash, EncodingError> {
        Ok(hash::hash(&hash::canonicalize(self)?))
    }
}
