//! BASIC program lines
//!
//! A stored line is a big-endian line number, a little-endian length and
//! then the tokenized content, which always ends with NEWLINE. The loader
//! program is three lines:
//!
//! ```text
//! 0 REM <one byte per machine code byte>
//! 1 SAVE "NAME"
//! 2 RAND USR nnnnn
//! ```

use crate::zx81::charset::{self, EncodedFilename, NEWLINE, RAND, REM, SAVE, USR, ZERO};
use crate::zx81::error::TapeError;
use crate::zx81::float::FloatingPointAddress;
use crate::zx81::params::{ExecAddress, TapeName};
use crate::zx81::system_vars::CODE_START;

pub const COMMENT_LINE_NUMBER: u16 = 0;
pub const SAVE_LINE_NUMBER: u16 = 1;
pub const EXEC_LINE_NUMBER: u16 = 2;

/// Line number plus length field.
pub const LINE_HEADER_LEN: usize = 4;

/// Content length of the exec line: RAND USR, five digits, the hidden
/// number and NEWLINE.
pub const EXEC_CONTENT_LEN: usize = 14;

/// Offset of the first reserved byte within the comment line.
pub const COMMENT_BODY_OFFSET: usize = LINE_HEADER_LEN + 1;

/// Address the first reserved byte of the comment line loads at.
pub const COMMENT_BODY_ADDR: u16 = CODE_START + COMMENT_BODY_OFFSET as u16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLine {
    pub number: u16,
    pub content: Vec<u8>,
}

impl ProgramLine {
    /// Total stored size including the 4-byte header.
    pub fn len(&self) -> usize {
        LINE_HEADER_LEN + self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        self.write_to(&mut bytes);
        bytes
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.number.to_be_bytes());
        out.extend_from_slice(&(self.content.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.content);
    }

    /// Parse one line from the start of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn parse(bytes: &[u8]) -> Result<(ProgramLine, usize), TapeError> {
        if bytes.len() < LINE_HEADER_LEN {
            return Err(TapeError::Truncated {
                what: "program line header",
                needed: LINE_HEADER_LEN,
                available: bytes.len(),
            });
        }

        let number = u16::from_be_bytes([bytes[0], bytes[1]]);
        let length = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
        let end = LINE_HEADER_LEN + length;
        if bytes.len() < end {
            return Err(TapeError::Truncated {
                what: "program line",
                needed: end,
                available: bytes.len(),
            });
        }

        let content = bytes[LINE_HEADER_LEN..end].to_vec();
        if content.last() != Some(&NEWLINE) {
            return Err(TapeError::MalformedImage(format!(
                "line {} does not end with NEWLINE",
                number
            )));
        }
        Ok((ProgramLine { number, content }, end))
    }

    /// Copy machine code over the reserved bytes of a comment line.
    pub fn fill_reserved(&mut self, payload: &[u8]) -> Result<(), TapeError> {
        let reserved = self.content.len().saturating_sub(2);
        if self.content.first() != Some(&REM) || payload.len() != reserved {
            return Err(TapeError::MalformedImage(format!(
                "line {} reserves {} bytes, payload is {}",
                self.number,
                reserved,
                payload.len()
            )));
        }
        self.content[1..1 + reserved].copy_from_slice(payload);
        Ok(())
    }

    /// The bytes between the REM token and the final NEWLINE.
    pub fn reserved(&self) -> &[u8] {
        match self.content.as_slice() {
            [REM, body @ .., NEWLINE] => body,
            _ => &[],
        }
    }
}

/// Line 0: REM followed by one filler byte per payload byte.
///
/// The filler is the ZX81 '0' so the reserved area lists sensibly before
/// the real code is copied in.
pub fn comment_line(payload_len: usize) -> Result<ProgramLine, TapeError> {
    let content_len = payload_len + 2;
    if content_len > u16::MAX as usize {
        return Err(TapeError::AddressOverflow(
            CODE_START as usize + LINE_HEADER_LEN + content_len,
        ));
    }

    let mut content = Vec::with_capacity(content_len);
    content.push(REM);
    content.resize(payload_len + 1, ZERO);
    content.push(NEWLINE);

    Ok(ProgramLine {
        number: COMMENT_LINE_NUMBER,
        content,
    })
}

/// Line 1: SAVE "NAME"
pub fn save_line(name: &TapeName) -> Result<ProgramLine, TapeError> {
    let filename = EncodedFilename::encode(name.as_str())?;
    let content_len = filename.len() + 2;
    if content_len > u16::MAX as usize {
        return Err(TapeError::AddressOverflow(
            CODE_START as usize + LINE_HEADER_LEN + content_len,
        ));
    }

    let mut content = Vec::with_capacity(content_len);
    content.push(SAVE);
    content.extend_from_slice(filename.as_bytes());
    content.push(NEWLINE);

    Ok(ProgramLine {
        number: SAVE_LINE_NUMBER,
        content,
    })
}

/// Line 2: RAND USR nnnnn, with the hidden binary form of the address.
pub fn exec_line(address: ExecAddress) -> ProgramLine {
    let mut content = Vec::with_capacity(EXEC_CONTENT_LEN);
    content.push(RAND);
    content.push(USR);
    for digit in address.digits() {
        content.push(ZERO + (digit - b'0'));
    }
    content.extend_from_slice(&FloatingPointAddress::from_address(address.value()).to_bytes());
    content.push(NEWLINE);

    debug_assert_eq!(content.len(), EXEC_CONTENT_LEN);
    ProgramLine {
        number: EXEC_LINE_NUMBER,
        content,
    }
}

/// Recover the decimal text of a `RAND USR` argument from its ZX81 digits.
pub fn exec_digits(line: &ProgramLine) -> Option<String> {
    match line.content.as_slice() {
        [RAND, USR, rest @ ..] if rest.len() >= 5 => {
            rest[..5]
                .iter()
                .map(|&code| charset::decode_char(code).filter(|ch| ch.is_ascii_digit()))
                .collect()
        }
        _ => None,
    }
}
