//! ZX81 character set and BASIC keyword tokens
//!
//! The ZX81 does not use ASCII. Digits occupy codes 0x1C-0x25 and the
//! letters A-Z follow at 0x26-0x3F; there are no lower case letters.
//! Setting bit 7 of a character code selects its inverse video form.

use crate::zx81::error::TapeError;

// Keyword tokens
pub const REM: u8 = 0xEA;
pub const SAVE: u8 = 0xF8;
pub const RAND: u8 = 0xF9;
pub const USR: u8 = 0xD4;

// Control codes
pub const NEWLINE: u8 = 0x76;
pub const QUOTE: u8 = 0x0B;
pub const NUMBER_MARKER: u8 = 0x7E;

// Character ranges
pub const ZERO: u8 = 0x1C;
pub const LETTER_A: u8 = 0x26;
pub const INVERSE: u8 = 0x80;

/// Encode one ASCII alphanumeric as a ZX81 character code.
///
/// Lower case letters are folded to upper case.
pub fn encode_char(ch: char) -> Result<u8, TapeError> {
    let upper = ch.to_ascii_uppercase();
    match upper {
        '0'..='9' => Ok(ZERO + (upper as u8 - b'0')),
        'A'..='Z' => Ok(LETTER_A + (upper as u8 - b'A')),
        _ => Err(TapeError::UnencodableCharacter(ch)),
    }
}

/// Decode a ZX81 digit or letter code, ignoring the inverse bit.
pub fn decode_char(code: u8) -> Option<char> {
    let code = code & !INVERSE;
    match code {
        c if (ZERO..ZERO + 10).contains(&c) => Some((b'0' + (c - ZERO)) as char),
        c if (LETTER_A..LETTER_A + 26).contains(&c) => Some((b'A' + (c - LETTER_A)) as char),
        _ => None,
    }
}

/// A quoted tape name in the ZX81 character set.
///
/// The last character is stored inverted, which is how the ROM finds the
/// end of a name on tape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFilename(Vec<u8>);

impl EncodedFilename {
    pub fn encode(name: &str) -> Result<Self, TapeError> {
        let mut bytes = Vec::with_capacity(name.len() + 2);
        bytes.push(QUOTE);
        for ch in name.chars() {
            bytes.push(encode_char(ch)?);
        }
        if bytes.len() == 1 {
            return Err(TapeError::EmptyTapeName);
        }
        if let Some(last) = bytes.last_mut() {
            *last |= INVERSE;
        }
        bytes.push(QUOTE);
        Ok(EncodedFilename(bytes))
    }

    /// Recover the (upper case) name from a quoted, encoded form.
    pub fn decode(bytes: &[u8]) -> Option<String> {
        match bytes {
            [QUOTE, inner @ .., QUOTE] if !inner.is_empty() => {
                inner.iter().map(|&code| decode_char(code)).collect()
            }
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
