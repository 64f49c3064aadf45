/// image.rs
/// Tape image assembly and reading
///
use crate::zx81::charset::{EncodedFilename, SAVE};
use crate::zx81::display_file::{blank_display_file, is_display_file, DISPLAY_FILE_LEN};
use crate::zx81::error::TapeError;
use crate::zx81::float::{FloatingPointAddress, FLOAT_ENCODED_LEN};
use crate::zx81::layout::DerivedFields;
use crate::zx81::lines::{
    self, ProgramLine, COMMENT_LINE_NUMBER, EXEC_LINE_NUMBER, SAVE_LINE_NUMBER,
};
use crate::zx81::params::{ExecAddress, TapeName, EXEC_DIGITS};
use crate::zx81::system_vars::{SystemVars, CODE_START, SYSTEM_VARS_LEN};

use log::debug;

/// A complete .p file, split into its regions.
///
/// File layout:
/// 0x0000: system variables (116 bytes, loaded at 0x4009)
/// 0x0074: line 0, REM holding the machine code
/// ......: line 1, SAVE "NAME"
/// ......: line 2, RAND USR nnnnn
/// ......: display file (794 bytes, ends with the VARS end marker)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeImage {
    pub system_vars: SystemVars,
    pub comment_line: ProgramLine,
    pub save_line: ProgramLine,
    pub exec_line: ProgramLine,
    pub display_file: Vec<u8>,
}

impl TapeImage {
    pub fn len(&self) -> usize {
        SYSTEM_VARS_LEN
            + self.comment_line.len()
            + self.save_line.len()
            + self.exec_line.len()
            + self.display_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.system_vars.to_bytes());
        self.comment_line.write_to(&mut bytes);
        self.save_line.write_to(&mut bytes);
        self.exec_line.write_to(&mut bytes);
        bytes.extend_from_slice(&self.display_file);
        bytes
    }

    /// Split an existing .p file back into its regions.
    ///
    /// Only files with the loader layout produced by this crate are
    /// accepted: exactly lines 0, 1 and 2 followed by a blank-shaped
    /// display file at the address D_FILE claims.
    pub fn parse(bytes: &[u8]) -> Result<Self, TapeError> {
        let system_vars = SystemVars::from_bytes(bytes)?;
        let mut pos = SYSTEM_VARS_LEN;

        let mut next_line = |expected: u16| -> Result<ProgramLine, TapeError> {
            let (line, used) = ProgramLine::parse(&bytes[pos..])?;
            if line.number != expected {
                return Err(TapeError::MalformedImage(format!(
                    "expected line {} at offset {:#x}, found line {}",
                    expected, pos, line.number
                )));
            }
            pos += used;
            Ok(line)
        };

        let comment_line = next_line(COMMENT_LINE_NUMBER)?;
        let save_line = next_line(SAVE_LINE_NUMBER)?;
        let exec_line = next_line(EXEC_LINE_NUMBER)?;

        let program_end = CODE_START as usize + (pos - SYSTEM_VARS_LEN);
        if system_vars.d_file as usize != program_end {
            return Err(TapeError::MalformedImage(format!(
                "D_FILE is {:#06x} but the program ends at {:#06x}",
                system_vars.d_file, program_end
            )));
        }

        let display_file = bytes[pos..].to_vec();
        if !is_display_file(&display_file) {
            return Err(TapeError::MalformedImage(format!(
                "expected a {} byte display file, found {} bytes",
                DISPLAY_FILE_LEN,
                display_file.len()
            )));
        }

        Ok(TapeImage {
            system_vars,
            comment_line,
            save_line,
            exec_line,
            display_file,
        })
    }

    /// The machine code carried in the REM line.
    pub fn payload(&self) -> &[u8] {
        self.comment_line.reserved()
    }

    /// Exec address from the hidden number in line 2.
    pub fn exec_address(&self) -> Option<u16> {
        let content = &self.exec_line.content;
        // after RAND USR and the digits
        let start = 2 + EXEC_DIGITS;
        let float = content.get(start..start + FLOAT_ENCODED_LEN)?;
        FloatingPointAddress::from_bytes(float)?.to_address()
    }

    /// The upper case name from the SAVE line.
    pub fn tape_name(&self) -> Option<String> {
        match self.save_line.content.as_slice() {
            [SAVE, quoted @ .., _newline] => EncodedFilename::decode(quoted),
            _ => None,
        }
    }

    pub fn derived_fields(&self) -> DerivedFields {
        DerivedFields::from_system_vars(&self.system_vars)
    }
}

/// Builds a tape image around a block of machine code.
pub struct TapeImageBuilder<'a> {
    name: &'a TapeName,
    exec_address: ExecAddress,
}

impl<'a> TapeImageBuilder<'a> {
    pub fn new(name: &'a TapeName, exec_address: ExecAddress) -> Self {
        TapeImageBuilder { name, exec_address }
    }

    pub fn build(&self, payload: &[u8]) -> Result<TapeImage, TapeError> {
        log::info!(
            "Tape image generation: {} payload bytes, name '{}', exec {}",
            payload.len(),
            self.name,
            self.exec_address
        );

        // Phase 1: generate every record so its size is known
        debug!("Phase 1: generating program lines and display file");
        let mut comment_line = lines::comment_line(payload.len())?;
        comment_line.fill_reserved(payload)?;
        let save_line = lines::save_line(self.name)?;
        let exec_line = lines::exec_line(self.exec_address);
        let display_file = blank_display_file();
        debug!(
            "Record sizes: comment={} save={} exec={} display={}",
            comment_line.len(),
            save_line.len(),
            exec_line.len(),
            display_file.len()
        );

        // Phase 2: resolve addresses and patch the system variables
        debug!("Phase 2: resolving layout");
        let derived = DerivedFields::resolve(comment_line.len(), save_line.len(), exec_line.len())?;
        let mut system_vars = SystemVars::at_load();
        derived.apply(&mut system_vars);
        debug!(
            "Layout: D_FILE=0x{:04x} VARS=0x{:04x} CH_ADD=0x{:04x} NXTLIN=0x{:04x}",
            derived.d_file,
            derived.vars,
            derived.ch_add,
            derived.nxtlin
        );

        let image = TapeImage {
            system_vars,
            comment_line,
            save_line,
            exec_line,
            display_file,
        };
        log::info!("Tape image generation complete: {} bytes", image.len());
        Ok(image)
    }
}
