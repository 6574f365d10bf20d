//! Multicodec prefixes for raw public keys.
//!
//! See <https://github.com/multiformats/multicodec/blob/master/table.csv>.

pub const SECP256K1_PUB: u64 = 0xe7;
pub const ED25519_PUB: u64 = 0xed;

/// Multicodec-encoded byte string: unsigned-varint codec followed by data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiEncodedBuf(Vec<u8>);

impl MultiEncodedBuf {
    pub fn encode_bytes(codec: u64, bytes: &[u8]) -> Self {
        let mut codec_buffer = unsigned_varint::encode::u64_buffer();
        let encoded_codec = unsigned_varint::encode::u64(codec, &mut codec_buffer);
        let mut result = Vec::with_capacity(encoded_codec.len() + bytes.len());
        result.extend(encoded_codec);
        result.extend(bytes);
        Self(result)
    }

    /// Split the codec from the data.
    pub fn parts(bytes: &[u8]) -> Result<(u64, &[u8]), unsigned_varint::decode::Error> {
        unsigned_varint::decode::u64(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}
