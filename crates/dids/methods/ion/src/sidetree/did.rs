use core::fmt;
use std::{marker::PhantomData, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    hash::{self, EncodingError, Multihash},
    CreateOperation, Sidetree,
};

/// Sidetree DID in [short or long form][uri].
///
/// The long form appends the encoded create operation, so the DID can be
/// resolved before it is anchored.
///
/// [uri]: https://identity.foundation/sidetree/spec/v1.0.0/#did-uri-composition
pub struct SidetreeDID<S: Sidetree> {
    did_suffix: DIDSuffix,
    initial_state: Option<String>,
    _marker: PhantomData<S>,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidSidetreeDID {
    #[error("invalid URI scheme")]
    InvalidURIScheme,

    #[error("DID method mismatch")]
    DIDMethodMismatch,

    #[error("Sidetree network mismatch")]
    SidetreeNetworkMismatch,

    #[error("missing sidetree DID suffix")]
    MissingSidetreeDIDSuffix,

    #[error(transparent)]
    InvalidSidetreeDIDSuffix(#[from] InvalidSidetreeDIDSuffix),

    #[error("unexpected data after Sidetree Long-Form DID")]
    UnexpectedData,
}

impl<S: Sidetree> SidetreeDID<S> {
    pub fn short(did_suffix: DIDSuffix) -> Self {
        Self {
            did_suffix,
            initial_state: None,
            _marker: PhantomData,
        }
    }

    /// Long-form DID embedding `create`.
    pub fn long(create: &CreateOperation) -> Result<Self, EncodingError> {
        Ok(Self {
            did_suffix: create.suffix_data.did_suffix()?,
            initial_state: Some(hash::encode(&hash::canonicalize(create)?)),
            _marker: PhantomData,
        })
    }

    pub fn did_suffix(&self) -> &DIDSuffix {
        &self.did_suffix
    }

    pub fn is_long_form(&self) -> bool {
        self.initial_state.is_some()
    }

    pub fn to_short(&self) -> Self {
        Self::short(self.did_suffix.clone())
    }

    /// Create operation embedded in a long-form DID, `None` for the short
    /// form.
    pub fn create_operation(&self) -> Result<Option<CreateOperation>, EncodingError> {
        let Some(initial_state) = &self.initial_state else {
            return Ok(None);
        };
        let bytes = hash::decode(initial_state)?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(EncodingError::Json)
    }
}

impl<S: Sidetree> Clone for SidetreeDID<S> {
    fn clone(&self) -> Self {
        Self {
            did_suffix: self.did_suffix.clone(),
            initial_state: self.initial_state.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S: Sidetree> PartialEq for SidetreeDID<S> {
    fn eq(&self, other: &Self) -> bool {
        self.did_suffix == other.did_suffix && self.initial_state == other.initial_state
    }
}

impl<S: Sidetree> fmt::Debug for SidetreeDID<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SidetreeDID({self})")
    }
}

impl<S: Sidetree> FromStr for SidetreeDID<S> {
    type Err = InvalidSidetreeDID;

    fn from_str(did: &str) -> Result<Self, Self::Err> {
        let rest = did
            .strip_prefix("did:")
            .ok_or(InvalidSidetreeDID::InvalidURIScheme)?;
        let rest = rest
            .strip_prefix(S::METHOD)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or(InvalidSidetreeDID::DIDMethodMismatch)?;
        let rest = match S::NETWORK {
            Some(network) => rest
                .strip_prefix(network)
                .and_then(|rest| rest.strip_prefix(':'))
                .ok_or(InvalidSidetreeDID::SidetreeNetworkMismatch)?,
            None => rest,
        };

        let (suffix, initial_state) = match rest.split_once(':') {
            Some((_, state)) if state.contains(':') => {
                return Err(InvalidSidetreeDID::UnexpectedData)
            }
            Some((suffix, state)) => (suffix, Some(state.to_owned())),
            None => (rest, None),
        };
        if suffix.is_empty() {
            return Err(InvalidSidetreeDID::MissingSidetreeDIDSuffix);
        }
        Ok(Self {
            did_suffix: suffix.parse()?,
            initial_state,
            _marker: PhantomData,
        })
    }
}

impl<S: Sidetree> fmt::Display for SidetreeDID<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "did:{}:", S::METHOD)?;
        if let Some(network) = S::NETWORK {
            write!(f, "{network}:")?;
        }
        f.write_str(&self.did_suffix.0)?;
        if let Some(initial_state) = &self.initial_state {
            write!(f, ":{initial_state}")?;
        }
        Ok(())
    }
}

impl<S: Sidetree> From<SidetreeDID<S>> for DIDSuffix {
    fn from(did: SidetreeDID<S>) -> DIDSuffix {
        did.did_suffix
    }
}

/// [DID suffix](https://identity.foundation/sidetree/spec/v1.0.0/#did-suffix):
/// the encoded hash of the create operation's suffix data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct DIDSuffix(pub String);

#[derive(Debug, thiserror::Error)]
pub enum InvalidSidetreeDIDSuffix {
    #[error("invalid base64")]
    Base64,

    #[error("unexpected DID suffix length ({0})")]
    Length(usize),

    #[error("unexpected DID suffix prefix")]
    Prefix,
}

impl DIDSuffix {
    /// Check that the suffix is an encoded sha2-256 multihash.
    pub fn validate(&self) -> Result<(), InvalidSidetreeDIDSuffix> {
        let bytes = hash::decode(&self.0).map_err(|_| InvalidSidetreeDIDSuffix::Base64)?;
        if bytes.len() != Multihash::LENGTH {
            return Err(InvalidSidetreeDIDSuffix::Length(bytes.len()));
        }
        Multihash::from_bytes(bytes).map_err(|_| InvalidSidetreeDIDSuffix::Prefix)?;
        Ok(())
    }
}

impl FromStr for DIDSuffix {
    type Err = InvalidSidetreeDIDSuffix;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = Self(s.to_owned());
        suffix.validate()?;
        Ok(suffix)
    }
}

impl fmt::Display for DIDSuffix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use didsuite_crypto::AlgorithmId;
    use didsuite_jwk::{Algorithm, JWK};

    use super::*;
    use crate::ION;

    struct Testnet;

    impl Sidetree for Testnet {
        const KEY_ALGORITHM: AlgorithmId = AlgorithmId::SECP256K1;
        const SIGNATURE_ALGORITHM: Algorithm = Algorithm::ES256K;
        const METHOD: &'static str = "ion";
        const NETWORK: Option<&'static str> = Some("test");

        fn validate_key(_key: &JWK) -> bool {
            true
        }
    }

    const SUFFIX: &str = "EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg";

    #[test]
    fn network_segment() {
        let did: SidetreeDID<Testnet> = format!("did:ion:test:{SUFFIX}").parse().unwrap();
        assert_eq!(did.did_suffix().0, SUFFIX);
        assert!(!did.is_long_form());
        assert_eq!(did.to_string(), format!("did:ion:test:{SUFFIX}"));
        assert!(matches!(
            format!("did:ion:{SUFFIX}").parse::<SidetreeDID<Testnet>>(),
            Err(InvalidSidetreeDID::SidetreeNetworkMismatch)
        ));
    }

    #[test]
    fn method_prefix_must_be_whole_segment() {
        assert!(matches!(
            format!("did:ionx:{SUFFIX}").parse::<SidetreeDID<ION>>(),
            Err(InvalidSidetreeDID::DIDMethodMismatch)
        ));
        assert!(matches!(
            format!("web:ion:{SUFFIX}").parse::<SidetreeDID<ION>>(),
            Err(InvalidSidetreeDID::InvalidURIScheme)
        ));
        assert!(matches!(
            "did:ion:".parse::<SidetreeDID<ION>>(),
            Err(InvalidSidetreeDID::MissingSidetreeDIDSuffix)
        ));
    }

    #[test]
    fn long_form_has_one_state_segment() {
        let did: SidetreeDID<ION> = format!("did:ion:{SUFFIX}:e30").parse().unwrap();
        assert!(did.is_long_form());
        assert_eq!(did.to_short().to_string(), format!("did:ion:{SUFFIX}"));
        assert!(matches!(
            format!("did:ion:{SUFFIX}:e30:e30").parse::<SidetreeDID<ION>>(),
            Err(InvalidSidetreeDID::UnexpectedData)
        ));
    }

    #[test]
    fn suffix_must_be_sha256_multihash() {
        SUFFIX.parse::<DIDSuffix>().unwrap();
        assert!(matches!(
            "abc".parse::<DIDSuffix>(),
            Err(InvalidSidetreeDIDSuffix::Length(2))
        ));
        assert!(matches!(
            "E!".parse::<DIDSuffix>(),
            Err(InvalidSidetreeDIDSuffix::Base64)
        ));
        // sha2-512 code with a 32 byte digest
        let other = hash::encode(&[&[0x13, 0x20][..], &[0u8; 32]].concat());
        assert!(matches!(
            other.parse::<DIDSuffix>(),
            Err(InvalidSidetreeDIDSuffix::Prefix)
        ));
    }
}
