//! Octet key pairs ([RFC 8037 §2](https://www.rfc-editor.org/rfc/rfc8037#section-2)).
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::Base64urlUInt;

pub const ED25519: &str = "Ed25519";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct OkpParams {
    #[zeroize(skip)]
    pub crv: String,

    /// Public key.
    #[zeroize(skip)]
    pub x: Base64urlUInt,

    /// Private key, wiped on drop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Base64urlUInt>,
}

impl OkpParams {
    pub fn public(crv: &str, x: Base64urlUInt) -> Self {
        Self {
            crv: crv.to_owned(),
            x,
            d: None,
        }
    }
}
