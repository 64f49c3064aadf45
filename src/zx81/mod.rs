// ZX81 Tape Image Module
// Wraps raw machine code in a loadable ZX81 .p file

pub mod charset;
pub mod display_file;
pub mod error;
pub mod float;
pub mod image;
pub mod layout;
pub mod lines;
pub mod params;
pub mod system_vars;
pub mod tape_file;

#[cfg(test)]
mod lines_tests;

pub use error::TapeError;
pub use image::{TapeImage, TapeImageBuilder};
pub use params::{
    ExecAddress, TapeName, DEFAULT_EXEC_ADDRESS, MAX_EXEC_ADDRESS, MIN_EXEC_ADDRESS,
};

/// Main converter structure
#[derive(Debug, Clone, Copy, Default)]
pub struct Zx81Converter {
    exec_address: ExecAddress,
}

impl Zx81Converter {
    /// Create a converter that starts the machine code at `exec_address`
    pub fn new(exec_address: ExecAddress) -> Self {
        Zx81Converter { exec_address }
    }

    pub fn exec_address(&self) -> ExecAddress {
        self.exec_address
    }

    /// Build the tape image structure without serializing it
    pub fn build(&self, payload: &[u8], name: &TapeName) -> Result<TapeImage, TapeError> {
        TapeImageBuilder::new(name, self.exec_address).build(payload)
    }

    /// Convert machine code to the bytes of a .p file
    pub fn convert(&self, payload: &[u8], name: &TapeName) -> Result<Vec<u8>, TapeError> {
        Ok(self.build(payload, name)?.to_bytes())
    }
}
