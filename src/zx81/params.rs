// Validated conversion parameters
//
// Everything the generators need is checked here, once, so record
// generation never sees an address or name it cannot encode.

use std::fmt;
use std::str::FromStr;

use crate::zx81::charset;
use crate::zx81::error::TapeError;

pub const MIN_EXEC_ADDRESS: u16 = 16383;
pub const MAX_EXEC_ADDRESS: u16 = 32767;

/// First byte of the REM body: CODE_START + line header + REM token.
pub const DEFAULT_EXEC_ADDRESS: u16 = 16514;

/// Suffix appended to the tape name to form the output filename.
pub const TAPE_EXTENSION: &str = "p";

/// Number of decimal digits in a `RAND USR` argument.
pub const EXEC_DIGITS: usize = 5;

/// Machine code entry point, guaranteed to lie in
/// [MIN_EXEC_ADDRESS, MAX_EXEC_ADDRESS].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExecAddress(u16);

impl ExecAddress {
    pub fn value(self) -> u16 {
        self.0
    }

    /// The address as exactly five ASCII digits.
    pub fn digits(self) -> [u8; EXEC_DIGITS] {
        let mut digits = [b'0'; EXEC_DIGITS];
        let mut rest = self.0;
        for slot in digits.iter_mut().rev() {
            *slot = b'0' + (rest % 10) as u8;
            rest /= 10;
        }
        digits
    }
}

impl Default for ExecAddress {
    fn default() -> Self {
        ExecAddress(DEFAULT_EXEC_ADDRESS)
    }
}

impl TryFrom<u32> for ExecAddress {
    type Error = TapeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value < MIN_EXEC_ADDRESS as u32 || value > MAX_EXEC_ADDRESS as u32 {
            return Err(TapeError::ExecAddressOutOfRange(value));
        }
        Ok(ExecAddress(value as u16))
    }
}

impl TryFrom<u16> for ExecAddress {
    type Error = TapeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ExecAddress::try_from(value as u32)
    }
}

impl FromStr for ExecAddress {
    type Err = TapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TapeError::InvalidExecAddress(s.to_string()));
        }
        // Anything longer than u32 is out of range anyway
        let value = s.parse::<u32>().unwrap_or(u32::MAX);
        ExecAddress::try_from(value)
    }
}

impl fmt::Display for ExecAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output base name: non-empty and ASCII alphanumeric only, so it can be
/// written into the SAVE line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TapeName(String);

impl TapeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the file the image is written to, e.g. `game.p`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, TAPE_EXTENSION)
    }
}

impl FromStr for TapeName {
    type Err = TapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TapeError::EmptyTapeName);
        }
        for (pos, ch) in s.chars().enumerate() {
            if charset::encode_char(ch).is_err() {
                return Err(TapeError::InvalidTapeNameChar(ch, pos));
            }
        }
        Ok(TapeName(s.to_string()))
    }
}

impl fmt::Display for TapeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
