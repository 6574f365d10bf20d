//! EdDSA over Ed25519.
use didsuite_jwk::{okp::ED25519, Algorithm, Base64urlUInt, OkpParams, Params, JWK};
use zeroize::Zeroizing;

use crate::{
    key::{KeyGenOptions, KeyGenerator, Signer},
    multicodec, AlgorithmId, CryptoError,
};

/// Ed25519 key generation and `EdDSA` signatures.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519;

fn okp_params(jwk: &JWK) -> Result<&OkpParams, CryptoError> {
    match &jwk.params {
        Params::OKP(params) if params.crv == ED25519 => Ok(params),
        _ => Err(CryptoError::InvalidKey("expected an Ed25519 OKP key")),
    }
}

fn jwk_from_signing_key(key: &ed25519_dalek::SigningKey) -> JWK {
    let x = Base64urlUInt(key.verifying_key().to_bytes().to_vec());
    let mut params = OkpParams::public(ED25519, x);
    params.d = Some(Base64urlUInt(key.to_bytes().to_vec()));
    params.into()
}

fn jwk_from_verifying_key(key: &ed25519_dalek::VerifyingKey) -> JWK {
    OkpParams::public(ED25519, Base64urlUInt(key.to_bytes().to_vec())).into()
}

fn to_signing_key(params: &OkpParams) -> Result<ed25519_dalek::SigningKey, CryptoError> {
    let d = params.d.as_ref().ok_or(CryptoError::MissingPrivateKey)?;
    let bytes: Zeroizing<[u8; 32]> = Zeroizing::new(
        d.as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("Ed25519 private key must be 32 bytes"))?,
    );
    Ok(ed25519_dalek::SigningKey::from_bytes(&bytes))
}

fn to_verifying_key(bytes: &[u8]) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKey("Ed25519 public key must be 32 bytes"))?;
    ed25519_dalek::VerifyingKey::from_bytes(&bytes)
        .map_err(|_| CryptoError::InvalidKey("invalid Ed25519 point"))
}

impl KeyGenerator for Ed25519 {
    fn algorithm_id(&self) -> AlgorithmId {
        AlgorithmId::ED25519
    }

    fn curve(&self) -> &'static str {
        ED25519
    }

    fn multicodec(&self) -> u64 {
        multicodec::ED25519_PUB
    }

    fn generate_private_key(&self, options: &KeyGenOptions) -> Result<JWK, CryptoError> {
        let secret = match &options.seed {
            Some(seed) => ed25519_dalek::SigningKey::from_bytes(seed),
            None => ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng),
        };
        Ok(jwk_from_signing_key(&secret))
    }

    fn compute_public_key(&self, private_key: &JWK) -> Result<JWK, CryptoError> {
        let secret = to_signing_key(okp_params(private_key)?)?;
        Ok(jwk_from_verifying_key(&secret.verifying_key()))
    }

    fn public_key_bytes(&self, public_key: &JWK) -> Result<Vec<u8>, CryptoError> {
        let params = okp_params(public_key)?;
        Ok(to_verifying_key(params.x.as_bytes())?.as_bytes().to_vec())
    }

    fn public_key_from_bytes(&self, bytes: &[u8]) -> Result<JWK, CryptoError> {
        Ok(jwk_from_verifying_key(&to_verifying_key(bytes)?))
    }
}

impl Signer for Ed25519 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    fn sign(&self, private_key: &JWK, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
        use ed25519_dalek::Signer as _;
        let secret = to_signing_key(okp_params(private_key)?)?;
        Ok(secret.sign(payload).to_bytes().to_vec())
    }

    fn verify(
        &self,
        public_key: &JWK,
        payload: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        use ed25519_dalek::Verifier as _;
        let params = okp_params(public_key)?;
        let verifying_key = to_verifying_key(params.x.as_bytes())?;
        let sig = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| CryptoError::SignatureInvalid)?;
        verifying_key
            .verify(payload, &sig)
            .map_err(|_| CryptoError::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032 §7.1, TEST 1
    const SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    fn hex(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16).unwrap();
        }
        out
    }

    #[test]
    fn seeded_key_matches_rfc8032() {
        let key = Ed25519
            .generate_private_key(&KeyGenOptions::from_seed(hex(SECRET)))
            .unwrap();
        let public = Ed25519.compute_public_key(&key).unwrap();
        assert_eq!(Ed25519.public_key_bytes(&public).unwrap(), hex(PUBLIC));
    }

    #[test]
    fn sign_verify() {
        let key = Ed25519
            .generate_private_key(&KeyGenOptions::default())
            .unwrap();
        let sig = Ed25519.sign(&key, b"payload").unwrap();
        assert_eq!(sig.len(), 64);
        Ed25519.verify(&key.to_public(), b"payload", &sig).unwrap();
        assert!(Ed25519.verify(&key.to_public(), b"tampered", &sig).is_err());
    }
}
