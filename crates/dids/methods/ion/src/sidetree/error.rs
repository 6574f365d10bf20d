use core::fmt;

use didsuite_crypto::CryptoError;
use serde::{Deserialize, Serialize};

use super::{hash::EncodingError, InvalidSidetreeDID, SidetreeKeyError};

/// Rejected operation input.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} id `{id}` is longer than 50 characters")]
    IdTooLong { kind: &'static str, id: String },

    #[error("{kind} id `{id}` must only contain base64url characters")]
    IdCharset { kind: &'static str, id: String },

    #[error("service type `{0}` must be shorter than 30 characters")]
    ServiceTypeTooLong(String),

    #[error("service endpoint `{0}` is not a valid URI")]
    InvalidServiceEndpoint(String),

    #[error("duplicate public key id `{0}`")]
    DuplicatePublicKeyId(String),

    #[error("duplicate service id `{0}`")]
    DuplicateServiceId(String),

    #[error("duplicate purpose `{purpose}` in public key `{id}`")]
    DuplicatePurpose { id: String, purpose: String },

    #[error("public key JWK must not contain private key parameters")]
    PrivateKey,

    #[error("key type not supported by this DID method")]
    InvalidKeyType,
}

/// Error building, verifying or submitting a Sidetree operation.
#[derive(Debug, thiserror::Error)]
pub enum SidetreeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unsupported algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("key not found: `{0}`")]
    KeyNotFound(String),

    #[error("server returned HTTP status {status}: {body}")]
    InvalidStatus { status: u16, body: String },

    #[error("resolution failed: {0}")]
    ResolutionFailure(String),

    #[error(transparent)]
    Crypto(CryptoError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid endpoint `{0}`")]
    InvalidEndpoint(String),

    #[error(transparent)]
    InvalidDID(#[from] InvalidSidetreeDID),
}

impl SidetreeError {
    /// Sidetree API error carried by an [`SidetreeError::InvalidStatus`] body,
    /// if the body is one.
    pub fn api_error(&self) -> Option<SidetreeAPIError> {
        match self {
            Self::InvalidStatus { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

impl From<CryptoError> for SidetreeError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::UnsupportedAlgorithm(alg) => Self::UnsupportedAlgorithm(alg),
            CryptoError::KeyNotFound(alias) => Self::KeyNotFound(alias),
            e => Self::Crypto(e),
        }
    }
}

impl From<SidetreeKeyError> for SidetreeError {
    fn from(e: SidetreeKeyError) -> Self {
        match e {
            SidetreeKeyError::Validation(e) => Self::Validation(e),
            SidetreeKeyError::Serialize(e) => Self::Encoding(EncodingError::Canonicalization(e)),
        }
    }
}

/// Error body of a rejected request.
///
/// Codes are listed in the reference implementation's
/// [`ErrorCode.ts`](https://github.com/decentralized-identity/sidetree/blob/v1.0.0/lib/core/versions/1.0/ErrorCode.ts).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SidetreeAPIError {
    pub code: String,
    pub message: Option<String>,
}

impl fmt::Display for SidetreeAPIError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "Sidetree error {}: {message}", self.code),
            None => write!(f, "Sidetree error {}", self.code),
        }
    }
}
