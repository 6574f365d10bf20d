//! Compact JSON Web Signatures (RFC 7515) signed through a [`KeyManager`].
use base64::Engine;
use didsuite_jwk::{Algorithm, JWK};
use serde::{Deserialize, Serialize};

use crate::{CryptoError, CryptoRegistry, KeyManager};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "alg")]
    pub algorithm: Algorithm,

    #[serde(rename = "kid")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    #[serde(rename = "typ")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

impl Header {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            key_id: None,
            type_: None,
        }
    }
}

fn b64(data: &[u8]) -> String {
    base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(data)
}

/// `base64url(header).base64url(payload)`, the bytes covered by the signature.
pub fn encode_signing_bytes(header: &Header, payload: &[u8]) -> Result<String, CryptoError> {
    let header_json = serde_jcs::to_vec(header)?;
    Ok([b64(&header_json), b64(payload)].join("."))
}

/// Sign the canonical JSON form of `payload` with the key behind `alias`.
///
/// The `alg` header is the one produced by the registered signer for the key's
/// type.
pub fn encode_sign<T: Serialize + ?Sized>(
    registry: &CryptoRegistry,
    key_manager: &dyn KeyManager,
    alias: &str,
    payload: &T,
) -> Result<String, CryptoError> {
    let public_key = key_manager.get_public_key(alias)?;
    let algorithm_id = registry.algorithm_id_for_jwk(&public_key)?;
    let header = Header::new(registry.signer(&algorithm_id)?.algorithm());
    let payload = serde_jcs::to_vec(payload)?;
    let signing_input = encode_signing_bytes(&header, &payload)?;
    let signature = key_manager.sign(alias, signing_input.as_bytes())?;
    Ok([signing_input, b64(&signature)].join("."))
}

pub fn split_jws(jws: &str) -> Result<(&str, &str, &str), CryptoError> {
    let mut parts = jws.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), Some(c), None) => Ok((a, b, c)),
        _ => Err(CryptoError::InvalidJWS),
    }
}

/// Decoded JWS, not yet verified.
#[derive(Debug, Clone)]
pub struct DecodedJws {
    pub header: Header,
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
    pub signing_bytes: Vec<u8>,
}

pub fn decode_unverified(jws: &str) -> Result<DecodedJws, CryptoError> {
    let (header_b64, payload_b64, signature_b64) = split_jws(jws)?;
    let engine = base64::prelude::BASE64_URL_SAFE_NO_PAD;
    let header: Header = serde_json::from_slice(&engine.decode(header_b64)?)?;
    Ok(DecodedJws {
        header,
        payload: engine.decode(payload_b64)?,
        signature: engine.decode(signature_b64)?,
        signing_bytes: [header_b64, ".", payload_b64].concat().into_bytes(),
    })
}

impl DecodedJws {
    /// Verify the signature against `public_key`, dispatching on the key type.
    ///
    /// The header algorithm must match the algorithm of the key's signer.
    pub fn verify(&self, registry: &CryptoRegistry, public_key: &JWK) -> Result<(), CryptoError> {
        let algorithm_id = registry.algorithm_id_for_jwk(public_key)?;
        let signer = registry.signer(&algorithm_id)?;
        if signer.algorithm() != self.header.algorithm {
            return Err(CryptoError::UnsupportedAlgorithm(format!(
                "{} with {} key",
                self.header.algorithm, algorithm_id
            )));
        }
        signer.verify(public_key, &self.signing_bytes, &self.signature)
    }
}

/// Decode and verify a compact JWS. Returns the header and payload.
pub fn decode_verify(
    registry: &CryptoRegistry,
    jws: &str,
    public_key: &JWK,
) -> Result<(Header, Vec<u8>), CryptoError> {
    let decoded = decode_unverified(jws)?;
    decoded.verify(registry, public_key)?;
    Ok((decoded.header, decoded.payload))
}
