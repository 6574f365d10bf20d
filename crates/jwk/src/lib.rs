//! JSON Web Key ([RFC 7517]) model for the key types didsuite signs with:
//! elliptic curve keys (`EC`, secp256k1) and octet key pairs (`OKP`,
//! Ed25519).
//!
//! [RFC 7517]: https://www.rfc-editor.org/rfc/rfc7517
use core::fmt;

use serde::{Deserialize, Serialize};

mod base64url;
pub use base64url::Base64urlUInt;

pub mod algorithm;
pub use algorithm::Algorithm;

mod error;
pub use error::Error;

mod params;
pub use params::{ec, okp, EcParams, OkpParams, Params};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JWK {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub public_key_use: Option<String>,

    #[serde(rename = "key_ops", skip_serializing_if = "Option::is_none")]
    pub key_operations: Option<Vec<String>>,

    #[serde(rename = "alg", skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,

    #[serde(rename = "kid", skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    #[serde(flatten)]
    pub params: Params,
}

impl From<Params> for JWK {
    fn from(params: Params) -> Self {
        Self {
            public_key_use: None,
            key_operations: None,
            algorithm: None,
            key_id: None,
            params,
        }
    }
}

impl From<EcParams> for JWK {
    fn from(params: EcParams) -> Self {
        Params::EC(params).into()
    }
}

impl From<OkpParams> for JWK {
    fn from(params: OkpParams) -> Self {
        Params::OKP(params).into()
    }
}

/// Canonical (JCS) JSON.
impl fmt::Display for JWK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serde_jcs::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// Members hashed by [`JWK::thumbprint`].
#[derive(Serialize)]
#[serde(tag = "kty")]
enum RequiredMembers<'a> {
    EC {
        crv: &'a str,
        x: &'a Base64urlUInt,
        y: &'a Base64urlUInt,
    },
    OKP {
        crv: &'a str,
        x: &'a Base64urlUInt,
    },
}

impl JWK {
    pub fn curve(&self) -> &str {
        self.params.curve()
    }

    pub fn is_public(&self) -> bool {
        self.params.private_key().is_none()
    }

    /// Copy without private key material or metadata.
    pub fn to_public(&self) -> Self {
        let mut public = self.clone();
        public.params = self.params.to_public();
        public
    }

    /// Whether both keys have the same public key, ignoring metadata and
    /// private parameters.
    pub fn equals_public(&self, other: &JWK) -> bool {
        self.required_members() == other.required_members()
    }

    fn required_members(&self) -> (&str, &str, &Base64urlUInt, Option<&Base64urlUInt>) {
        match &self.params {
            Params::EC(p) => ("EC", &p.crv, &p.x, Some(&p.y)),
            Params::OKP(p) => ("OKP", &p.crv, &p.x, None),
        }
    }

    /// [RFC 7638] thumbprint: base64url SHA-256 of the required members in
    /// canonical form.
    ///
    /// [RFC 7638]: https://www.rfc-editor.org/rfc/rfc7638
    pub fn thumbprint(&self) -> Result<String, Error> {
        use sha2::{Digest, Sha256};
        let members = match &self.params {
            Params::EC(p) => RequiredMembers::EC {
                crv: &p.crv,
                x: &p.x,
                y: &p.y,
            },
            Params::OKP(p) => RequiredMembers::OKP {
                crv: &p.crv,
                x: &p.x,
            },
        };
        let digest = Sha256::digest(serde_jcs::to_vec(&members)?);
        Ok(Base64urlUInt(digest.to_vec()).to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn jwk(value: serde_json::Value) -> JWK {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn rfc8037_okp_thumbprint() {
        // RFC 8037 appendix A.3
        let key = jwk(json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"
        }));
        assert_eq!(
            key.thumbprint().unwrap(),
            "kPrK_qmxVWaYVA9wwBF6Iuo3vVzz7TxHCTwXBygrS4k"
        );
    }

    #[test]
    fn ec_thumbprint_ignores_private_and_metadata() {
        // Key from RFC 7518 appendix C.
        let public = jwk(json!({
            "kty": "EC",
            "crv": "P-256",
            "x": "weNJy2HscCSM6AEDTDg04biOvhFhyyWvOHQfeF_PxMQ",
            "y": "e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck"
        }));
        let private = jwk(json!({
            "kid": "alice",
            "kty": "EC",
            "crv": "P-256",
            "x": "weNJy2HscCSM6AEDTDg04biOvhFhyyWvOHQfeF_PxMQ",
            "y": "e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck",
            "d": "0_NxaRPUMQoAJt50Gz8YiTr8gRTwyEaCumd-MToTmIo"
        }));
        assert_eq!(
            public.thumbprint().unwrap(),
            "Vy57XrArUrW0NbpI12tEzDHABxMwrTh6HHXRenSpnCo"
        );
        assert_eq!(public.thumbprint().unwrap(), private.thumbprint().unwrap());
        assert!(private.equals_public(&public));
    }

    #[test]
    fn to_public_drops_d() {
        let key = jwk(json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo",
            "d": "nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A"
        }));
        assert!(!key.is_public());
        let public = key.to_public();
        assert!(public.is_public());
        assert!(serde_json::to_value(&public).unwrap().get("d").is_none());
    }

    #[test]
    fn ec_key_requires_both_coordinates() {
        let result: Result<JWK, _> = serde_json::from_value(json!({
            "kty": "EC",
            "crv": "secp256k1",
            "x": "tXSKB_rubXS7sCjXqupVJEzTcW3MsjmEvq1YpXn96Zg"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn display_sorts_members() {
        let key = jwk(json!({
            "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo",
            "kty": "OKP",
            "crv": "Ed25519"
        }));
        assert_eq!(
            key.to_string(),
            r#"{"crv":"Ed25519","kty":"OKP","x":"11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo"}"#
        );
    }
}
