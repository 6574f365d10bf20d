use crate::AlgorithmId;

/// Key management, signature or verification error.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("unsupported algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    #[error("unsupported multicodec 0x{0:x}")]
    UnsupportedMulticodec(u64),

    #[error("key not found: `{0}`")]
    KeyNotFound(String),

    #[error("invalid key: {0}")]
    InvalidKey(&'static str),

    #[error("private key required")]
    MissingPrivateKey,

    #[error("signature invalid")]
    SignatureInvalid,

    #[error("signing failed")]
    SigningFailed,

    #[error("invalid JWS")]
    InvalidJWS,

    #[error("key store lock poisoned")]
    KeyStorePoisoned,

    #[error(transparent)]
    Jwk(#[from] didsuite_jwk::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error("invalid varint: {0}")]
    Varint(#[from] unsigned_varint::decode::Error),
}

impl CryptoError {
    pub fn unsupported(algorithm: &AlgorithmId) -> Self {
        Self::UnsupportedAlgorithm(algorithm.to_string())
    }
}
