use serde::{Deserialize, Serialize};

use crate::Base64urlUInt;

pub mod ec;
pub use ec::EcParams;

pub mod okp;
pub use okp::OkpParams;

/// Key type parameters, tagged by `kty`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kty")]
pub enum Params {
    EC(EcParams),
    OKP(OkpParams),
}

impl Params {
    /// `crv` member.
    pub fn curve(&self) -> &str {
        match self {
            Self::EC(p) => &p.crv,
            Self::OKP(p) => &p.crv,
        }
    }

    /// `d` member.
    pub fn private_key(&self) -> Option<&Base64urlUInt> {
        match self {
            Self::EC(p) => p.d.as_ref(),
            Self::OKP(p) => p.d.as_ref(),
        }
    }

    pub fn to_public(&self) -> Self {
        match self {
            Self::EC(p) => Self::EC(EcParams::public(&p.crv, p.x.clone(), p.y.clone())),
            Self::OKP(p) => Self::OKP(OkpParams::public(&p.crv, p.x.clone())),
        }
    }
}
