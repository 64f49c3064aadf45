// Layout resolution for the system variables
//
// Once the three program lines are measured, the addresses the ROM needs
// at load time follow directly: the display file sits right after the
// program, and the (empty) variables area right after the display.

use crate::zx81::display_file::DISPLAY_FILE_LEN;
use crate::zx81::error::TapeError;
use crate::zx81::system_vars::{SystemVars, CODE_START};

/// Distance from D_FILE back to CH_ADD.
///
/// CH_ADD must point at the NEWLINE that ends line 1, so that NXTLIN
/// (CH_ADD + 1) is the start of line 2 and `RAND USR` runs straight after
/// loading. 19 is the stored size of the exec line (18) plus one; it has to
/// change with that line's format.
pub const NEXT_CHAR_BACKOFF: u16 = 19;

/// Address fields that depend on the program size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedFields {
    pub d_file: u16,
    pub df_cc: u16,
    pub vars: u16,
    pub e_line: u16,
    pub ch_add: u16,
    pub stkbot: u16,
    pub stkend: u16,
    pub nxtlin: u16,
}

impl DerivedFields {
    /// Compute the derived fields from the stored sizes of the comment,
    /// save and exec lines.
    pub fn resolve(comment_len: usize, save_len: usize, exec_len: usize) -> Result<Self, TapeError> {
        let d_file = comment_len + save_len + exec_len + CODE_START as usize;

        // E_LINE (VARS + 1) is the highest address written
        let e_line = d_file + DISPLAY_FILE_LEN;
        if e_line > u16::MAX as usize {
            return Err(TapeError::AddressOverflow(e_line));
        }
        let d_file = d_file as u16;
        if d_file < CODE_START + NEXT_CHAR_BACKOFF {
            return Err(TapeError::MalformedImage(format!(
                "program of {} bytes is too short to hold the exec line",
                d_file - CODE_START
            )));
        }

        let vars = d_file + DISPLAY_FILE_LEN as u16 - 1;
        let ch_add = d_file - NEXT_CHAR_BACKOFF;

        Ok(DerivedFields {
            d_file,
            df_cc: d_file + 1,
            vars,
            e_line: vars + 1,
            ch_add,
            stkbot: vars + 1,
            stkend: vars + 1,
            nxtlin: ch_add + 1,
        })
    }

    pub fn apply(&self, vars: &mut SystemVars) {
        vars.d_file = self.d_file;
        vars.df_cc = self.df_cc;
        vars.vars = self.vars;
        vars.e_line = self.e_line;
        vars.ch_add = self.ch_add;
        vars.stkbot = self.stkbot;
        vars.stkend = self.stkend;
        vars.nxtlin = self.nxtlin;
    }

    /// Read the derived fields back out of a set of system variables.
    pub fn from_system_vars(vars: &SystemVars) -> Self {
        DerivedFields {
            d_file: vars.d_file,
            df_cc: vars.df_cc,
            vars: vars.vars,
            e_line: vars.e_line,
            ch_add: vars.ch_add,
            stkbot: vars.stkbot,
            stkend: vars.stkend,
            nxtlin: vars.nxtlin,
        }
    }
}
