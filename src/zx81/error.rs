// Tape conversion error handling

use std::fmt;
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub enum TapeError {
    // Parameter validation errors
    InvalidExecAddress(String),
    ExecAddressOutOfRange(u32),
    EmptyTapeName,
    InvalidTapeNameChar(char, usize), // character, position

    // Encoding errors
    UnencodableCharacter(char),
    AddressOverflow(usize), // first address that no longer fits in 16 bits

    // Tape image reading errors
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },
    MalformedImage(String),

    // Configuration errors
    ConfigError(String),

    // IO errors
    IOError(String),
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TapeError::InvalidExecAddress(text) => {
                write!(f, "Exec address '{}' is not a decimal number", text)
            }
            TapeError::ExecAddressOutOfRange(addr) => {
                write!(
                    f,
                    "Exec address {} must lie in the range {} to {}",
                    addr,
                    crate::zx81::MIN_EXEC_ADDRESS,
                    crate::zx81::MAX_EXEC_ADDRESS
                )
            }
            TapeError::EmptyTapeName => write!(f, "Output name must not be empty"),
            TapeError::InvalidTapeNameChar(ch, pos) => {
                write!(
                    f,
                    "Output name can only use alphanumeric characters ('{}' at position {})",
                    ch.escape_default(),
                    pos
                )
            }
            TapeError::UnencodableCharacter(ch) => {
                write!(
                    f,
                    "Character '{}' has no ZX81 encoding",
                    ch.escape_default()
                )
            }
            TapeError::AddressOverflow(addr) => {
                write!(
                    f,
                    "Address space overflow - program too large (needs address 0x{:x})",
                    addr
                )
            }
            TapeError::Truncated {
                what,
                needed,
                available,
            } => {
                write!(
                    f,
                    "Tape image truncated in {}: needed {} bytes, {} available",
                    what, needed, available
                )
            }
            TapeError::MalformedImage(msg) => write!(f, "Malformed tape image: {}", msg),
            TapeError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TapeError::IOError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TapeError {}

impl From<io::Error> for TapeError {
    fn from(err: io::Error) -> Self {
        TapeError::IOError(err.to_string())
    }
}

impl From<toml::de::Error> for TapeError {
    fn from(err: toml::de::Error) -> Self {
        TapeError::ConfigError(err.to_string())
    }
}
