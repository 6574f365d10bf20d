//! ECDSA over secp256k1 (`ES256K`).
use didsuite_jwk::{ec::SECP_256K1, Algorithm, Base64urlUInt, EcParams, Params, JWK};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::{
    key::{KeyGenOptions, KeyGenerator, Signer},
    multicodec, AlgorithmId, CryptoError,
};

/// secp256k1 key generation and `ES256K` signatures.
///
/// Signatures are 64-byte `r || s` values with low `s`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1;

fn ec_params(jwk: &JWK) -> Result<&EcParams, CryptoError> {
    match &jwk.params {
        Params::EC(params) if params.crv == SECP_256K1 => Ok(params),
        _ => Err(CryptoError::InvalidKey("expected a secp256k1 EC key")),
    }
}

fn public_params(key: &k256::PublicKey) -> EcParams {
    let point = key.to_encoded_point(false);
    let coordinate =
        |c: Option<&k256::FieldBytes>| Base64urlUInt(c.map_or_else(Vec::new, |c| c.to_vec()));
    EcParams::public(SECP_256K1, coordinate(point.x()), coordinate(point.y()))
}

fn jwk_from_public(key: &k256::PublicKey) -> JWK {
    public_params(key).into()
}

fn jwk_from_secret(key: &k256::SecretKey) -> JWK {
    let mut params = public_params(&key.public_key());
    params.d = Some(Base64urlUInt(key.to_bytes().to_vec()));
    params.into()
}

/// Rebuilds the uncompressed SEC1 point from the JWK coordinates.
fn to_public(params: &EcParams) -> Result<k256::PublicKey, CryptoError> {
    let sec1 = [&[0x04][..], params.x.as_bytes(), params.y.as_bytes()].concat();
    k256::PublicKey::from_sec1_bytes(&sec1)
        .map_err(|_| CryptoError::InvalidKey("invalid secp256k1 point"))
}

fn to_secret(params: &EcParams) -> Result<k256::SecretKey, CryptoError> {
    let d = params.d.as_ref().ok_or(CryptoError::MissingPrivateKey)?;
    k256::SecretKey::from_slice(d.as_bytes())
        .map_err(|_| CryptoError::InvalidKey("invalid secp256k1 scalar"))
}

impl KeyGenerator for Secp256k1 {
    fn algorithm_id(&self) -> AlgorithmId {
        AlgorithmId::SECP256K1
    }

    fn curve(&self) -> &'static str {
        SECP_256K1
    }

    fn multicodec(&self) -> u64 {
        multicodec::SECP256K1_PUB
    }

    fn generate_private_key(&self, options: &KeyGenOptions) -> Result<JWK, CryptoError> {
        let secret = match &options.seed {
            Some(seed) => k256::SecretKey::from_slice(seed)
                .map_err(|_| CryptoError::InvalidKey("seed is not a valid secp256k1 scalar"))?,
            None => k256::SecretKey::random(&mut rand::rngs::OsRng),
        };
        Ok(jwk_from_secret(&secret))
    }

    fn compute_public_key(&self, private_key: &JWK) -> Result<JWK, CryptoError> {
        let secret = to_secret(ec_params(private_key)?)?;
        Ok(jwk_from_public(&secret.public_key()))
    }

    /// Compressed SEC1 point (33 bytes).
    fn public_key_bytes(&self, public_key: &JWK) -> Result<Vec<u8>, CryptoError> {
        let pk = to_public(ec_params(public_key)?)?;
        Ok(pk.to_encoded_point(true).as_bytes().to_vec())
    }

    fn public_key_from_bytes(&self, bytes: &[u8]) -> Result<JWK, CryptoError> {
        let pk = k256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| CryptoError::InvalidKey("invalid secp256k1 point"))?;
        Ok(jwk_from_public(&pk))
    }
}

impl Signer for Secp256k1 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ES256K
    }

    fn sign(&self, private_key: &JWK, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
        use k256::ecdsa::signature::Signer as _;
        let secret = to_secret(ec_params(private_key)?)?;
        let signing_key = k256::ecdsa::SigningKey::from(secret);
        let sig: k256::ecdsa::Signature = signing_key
            .try_sign(payload)
            .map_err(|_| CryptoError::SigningFailed)?;
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(sig.to_bytes().to_vec())
    }

    fn verify(
        &self,
        public_key: &JWK,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        use k256::ecdsa::signature::Verifier as _;
        let pk = to_public(ec_params(public_key)?)?;
        let verifying_key = k256::ecdsa::VerifyingKey::from(pk);
        let sig = k256::ecdsa::Signature::from_slice(signature)
            .map_err(|_| CryptoError::SignatureInvalid)?;
        let normalized_sig = match sig.normalize_s() {
            Some(s) => {
                log::warn!("non-normalized ES256K signature accepted after normalization");
                s
            }
            None => sig,
        };
        verifying_key
            .verify(payload, &normalized_sig)
            .map_err(|_| CryptoError::SignatureInvalid)
    }
}
