//! `EC` keys ([RFC 7518 §6.2](https://www.rfc-editor.org/rfc/rfc7518#section-6.2)).
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::Base64urlUInt;

pub const SECP_256K1: &str = "secp256k1";

/// Affine point `(x, y)` and optional scalar `d`, which is wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct EcParams {
    #[zeroize(skip)]
    pub crv: String,

    #[zeroize(skip)]
    pub x: Base64urlUInt,

    #[zeroize(skip)]
    pub y: Base64urlUInt,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Base64urlUInt>,
}

impl EcParams {
    pub fn public(crv: &str, x: Base64urlUInt, y: Base64urlUInt) -> Self {
        Self {
            crv: crv.to_owned(),
            x,
            y,
            d: None,
        }
    }
}
