use core::fmt;

use base64::{
    engine::{general_purpose::URL_SAFE_NO_PAD, DecodePaddingMode, GeneralPurpose},
    Engine,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Key parameters are written without padding, but padded input is accepted.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    base64::engine::GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Octet string or big-endian unsigned integer in a JWK member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Zeroize)]
#[serde(try_from = "String", into = "String")]
pub struct Base64urlUInt(pub Vec<u8>);

impl Base64urlUInt {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Base64urlUInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(&self.0))
    }
}

impl TryFrom<String> for Base64urlUInt {
    type Error = base64::DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LENIENT.decode(value).map(Self)
    }
}

impl From<Base64urlUInt> for String {
    fn from(value: Base64urlUInt) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_padding_writes_none() {
        let padded = Base64urlUInt::try_from("AQI=".to_owned()).unwrap();
        assert_eq!(padded.as_bytes(), [1, 2]);
        assert_eq!(padded.to_string(), "AQI");
        assert!(Base64urlUInt::try_from("AQ+/".to_owned()).is_err());
    }
}
