//! [z-base-32](https://philzimmermann.com/docs/human-oriented-base-32-encoding.txt)
//! without padding, as used by `did:dht` identifiers.

const ALPHABET: &[u8; 32] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid z-base-32 character `{0}`")]
    InvalidCharacter(char),

    /// Trailing bits are set, or the length is one no encoding produces.
    #[error("non-canonical z-base-32 encoding")]
    NonCanonical,
}

pub fn encode(data: &[u8]) -> String {
    let mut result = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u16 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | byte as u16;
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1f) as usize;
            result.push(ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1f) as usize;
        result.push(ALPHABET[index] as char);
    }

    result
}

/// Decode z-base-32.
///
/// Only the output of [`encode`] is accepted, so every byte string has
/// exactly one valid encoding.
pub fn decode(data: &str) -> Result<Vec<u8>, DecodeError> {
    let mut result = Vec::with_capacity(data.len() * 5 / 8);
    let mut buffer: u16 = 0;
    let mut bits_in_buffer = 0;

    for c in data.chars() {
        let value = ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or(DecodeError::InvalidCharacter(c))?;
        buffer = (buffer << 5) | value as u16;
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result.push((buffer >> bits_in_buffer) as u8);
        }
    }

    if bits_in_buffer >= 5 || buffer & ((1 << bits_in_buffer) - 1) != 0 {
        return Err(DecodeError::NonCanonical);
    }
    Ok(result)
}
