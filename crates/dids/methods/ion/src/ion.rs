use didsuite_crypto::AlgorithmId;
use didsuite_jwk::{ec::SECP_256K1, Algorithm, Params, JWK};

use crate::sidetree::Sidetree;

#[derive(Debug, Default, Clone)]
pub struct ION;

impl Sidetree for ION {
    const KEY_ALGORITHM: AlgorithmId = AlgorithmId::SECP256K1;
    const SIGNATURE_ALGORITHM: Algorithm = Algorithm::ES256K;
    const METHOD: &'static str = "ion";
    const NETWORK: Option<&'static str> = None;

    fn validate_key(key: &JWK) -> bool {
        is_secp256k1(key)
    }
}

/// Check that a JWK is Secp256k1
pub fn is_secp256k1(jwk: &JWK) -> bool {
    matches!(&jwk.params, Params::EC(params) if params.crv == SECP_256K1)
}
