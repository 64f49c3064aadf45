// ZX81 System Variables
//
// A .p file starts with the system variables as they sit in RAM from
// SYSVARS_ADDR onwards. The layout below is written field by field in a
// fixed order with explicit widths; nothing depends on the in-memory
// layout of the Rust struct.

use std::fmt;

use indexmap::IndexMap;

use crate::zx81::charset::NEWLINE;
use crate::zx81::error::TapeError;

/// Address of VERSN, the first saved system variable.
pub const SYSVARS_ADDR: u16 = 0x4009;

/// Serialized size of the system variables.
pub const SYSTEM_VARS_LEN: usize = 116;

/// Start of the BASIC program area, immediately after the system variables.
pub const CODE_START: u16 = SYSVARS_ADDR + SYSTEM_VARS_LEN as u16;

pub const PRBUFF_LEN: usize = 33;
pub const MEMBOT_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemVars {
    pub versn: u8,     // 0 identifies ZX81 BASIC in saved programs
    pub e_ppc: u16,    // line number of the program cursor
    pub d_file: u16,   // start of display file
    pub df_cc: u16,    // PRINT position in the display file
    pub vars: u16,     // start of variables
    pub dest: u16,     // address of variable in assignment
    pub e_line: u16,   // address after the variable list
    pub ch_add: u16,   // next character to be interpreted
    pub x_ptr: u16,    // character preceding the syntax error marker
    pub stkbot: u16,   // bottom of calculator stack
    pub stkend: u16,   // end of calculator stack
    pub berg: u8,      // calculator's b register
    pub mem: u16,      // calculator memory area
    pub unused1: u8,
    pub df_sz: u8,     // lines in the lower part of the screen
    pub s_top: u16,    // top program line in automatic listings
    pub last_k: u16,   // keys pressed
    pub debounce: u8,  // keyboard debounce status
    pub margin: u8,    // blank lines above/below picture: 55 UK, 31 US
    pub nxtlin: u16,   // next program line to be executed
    pub oldppc: u16,   // line number CONT jumps to
    pub flagx: u8,
    pub strlen: u16,   // length of string destination in assignment
    pub t_addr: u16,   // next item in syntax table
    pub seed: u16,     // RND seed, set by RAND
    pub frames: u16,   // frame counter
    pub coords_x: u8,  // last point PLOTted
    pub coords_y: u8,
    pub pr_cc: u8,     // LPRINT position (low byte, in PRBUFF)
    pub s_posn_col: u8, // PRINT position column
    pub s_posn_line: u8, // PRINT position line
    pub cdflag: u8,    // bit 7 set in compute and display mode
    pub prbuff: [u8; PRBUFF_LEN], // printer buffer, 33rd byte is NEWLINE
    pub membot: [u8; MEMBOT_LEN], // calculator memory
    pub unused2: u16,
}

/// A single system variable value, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Byte(u8),
    Word(u16),
    Bytes(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Byte(b) => write!(f, "{:#04x}", b),
            FieldValue::Word(w) => write!(f, "{:#06x} ({})", w, w),
            FieldValue::Bytes(bytes) => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl SystemVars {
    /// System variables as they stand when a freshly loaded program starts.
    ///
    /// The address fields (D_FILE, DF_CC, VARS, E_LINE, CH_ADD, STKBOT,
    /// STKEND, NXTLIN) are placeholders until the layout is resolved.
    pub fn at_load() -> Self {
        let mut prbuff = [0u8; PRBUFF_LEN];
        prbuff[PRBUFF_LEN - 1] = NEWLINE;

        let mut membot = [0u8; MEMBOT_LEN];
        membot[10] = 0x84;
        membot[11] = 0x20;

        SystemVars {
            versn: 0x00,
            e_ppc: 0x0002,
            d_file: 0x6169,
            df_cc: 0x616A,
            vars: 0x6482,
            dest: 0x0000,
            e_line: 0x6483,
            ch_add: 0x6156,
            x_ptr: 0xC000,
            stkbot: 0x6483,
            stkend: 0x6483,
            berg: 0x00,
            mem: 0x405D,
            unused1: 0x00,
            df_sz: 0x02,
            s_top: 0x0000,
            last_k: 0xFDBF,
            debounce: 0xFF,
            margin: 0x37,
            nxtlin: 0x6157,
            oldppc: 0x0000,
            flagx: 0x00,
            strlen: 0x0000,
            t_addr: 0x0C8D,
            seed: 0x4082,
            frames: 0xE8D9,
            coords_x: 0x00,
            coords_y: 0x00,
            pr_cc: 0xBC,
            s_posn_col: 0x21,
            s_posn_line: 0x18,
            cdflag: 0x40,
            prbuff,
            membot,
            unused2: 0x0000,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = FieldWriter(Vec::with_capacity(SYSTEM_VARS_LEN));
        w.byte(self.versn);
        w.word(self.e_ppc);
        w.word(self.d_file);
        w.word(self.df_cc);
        w.word(self.vars);
        w.word(self.dest);
        w.word(self.e_line);
        w.word(self.ch_add);
        w.word(self.x_ptr);
        w.word(self.stkbot);
        w.word(self.stkend);
        w.byte(self.berg);
        w.word(self.mem);
        w.byte(self.unused1);
        w.byte(self.df_sz);
        w.word(self.s_top);
        w.word(self.last_k);
        w.byte(self.debounce);
        w.byte(self.margin);
        w.word(self.nxtlin);
        w.word(self.oldppc);
        w.byte(self.flagx);
        w.word(self.strlen);
        w.word(self.t_addr);
        w.word(self.seed);
        w.word(self.frames);
        w.byte(self.coords_x);
        w.byte(self.coords_y);
        w.byte(self.pr_cc);
        w.byte(self.s_posn_col);
        w.byte(self.s_posn_line);
        w.byte(self.cdflag);
        w.bytes(&self.prbuff);
        w.bytes(&self.membot);
        w.word(self.unused2);

        debug_assert_eq!(w.0.len(), SYSTEM_VARS_LEN);
        w.0
    }

    /// Read the system variables from the start of `bytes`. Trailing bytes
    /// are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TapeError> {
        if bytes.len() < SYSTEM_VARS_LEN {
            return Err(TapeError::Truncated {
                what: "system variables",
                needed: SYSTEM_VARS_LEN,
                available: bytes.len(),
            });
        }

        let mut r = FieldReader { bytes, pos: 0 };
        Ok(SystemVars {
            versn: r.byte(),
            e_ppc: r.word(),
            d_file: r.word(),
            df_cc: r.word(),
            vars: r.word(),
            dest: r.word(),
            e_line: r.word(),
            ch_add: r.word(),
            x_ptr: r.word(),
            stkbot: r.word(),
            stkend: r.word(),
            berg: r.byte(),
            mem: r.word(),
            unused1: r.byte(),
            df_sz: r.byte(),
            s_top: r.word(),
            last_k: r.word(),
            debounce: r.byte(),
            margin: r.byte(),
            nxtlin: r.word(),
            oldppc: r.word(),
            flagx: r.byte(),
            strlen: r.word(),
            t_addr: r.word(),
            seed: r.word(),
            frames: r.word(),
            coords_x: r.byte(),
            coords_y: r.byte(),
            pr_cc: r.byte(),
            s_posn_col: r.byte(),
            s_posn_line: r.byte(),
            cdflag: r.byte(),
            prbuff: r.array(),
            membot: r.array(),
            unused2: r.word(),
        })
    }

    /// Every field by its ROM name, in file order.
    pub fn fields(&self) -> IndexMap<&'static str, FieldValue> {
        use FieldValue::*;

        let mut m = IndexMap::new();
        m.insert("VERSN", Byte(self.versn));
        m.insert("E_PPC", Word(self.e_ppc));
        m.insert("D_FILE", Word(self.d_file));
        m.insert("DF_CC", Word(self.df_cc));
        m.insert("VARS", Word(self.vars));
        m.insert("DEST", Word(self.dest));
        m.insert("E_LINE", Word(self.e_line));
        m.insert("CH_ADD", Word(self.ch_add));
        m.insert("X_PTR", Word(self.x_ptr));
        m.insert("STKBOT", Word(self.stkbot));
        m.insert("STKEND", Word(self.stkend));
        m.insert("BERG", Byte(self.berg));
        m.insert("MEM", Word(self.mem));
        m.insert("UNUSED1", Byte(self.unused1));
        m.insert("DF_SZ", Byte(self.df_sz));
        m.insert("S_TOP", Word(self.s_top));
        m.insert("LAST_K", Word(self.last_k));
        m.insert("DEBOUNCE", Byte(self.debounce));
        m.insert("MARGIN", Byte(self.margin));
        m.insert("NXTLIN", Word(self.nxtlin));
        m.insert("OLDPPC", Word(self.oldppc));
        m.insert("FLAGX", Byte(self.flagx));
        m.insert("STRLEN", Word(self.strlen));
        m.insert("T_ADDR", Word(self.t_addr));
        m.insert("SEED", Word(self.seed));
        m.insert("FRAMES", Word(self.frames));
        m.insert("COORDS_X", Byte(self.coords_x));
        m.insert("COORDS_Y", Byte(self.coords_y));
        m.insert("PR_CC", Byte(self.pr_cc));
        m.insert("S_POSN_COL", Byte(self.s_posn_col));
        m.insert("S_POSN_LINE", Byte(self.s_posn_line));
        m.insert("CDFLAG", Byte(self.cdflag));
        m.insert("PRBUFF", Bytes(self.prbuff.to_vec()));
        m.insert("MEMBOT", Bytes(self.membot.to_vec()));
        m.insert("UNUSED2", Word(self.unused2));
        m
    }
}

impl fmt::Display for SystemVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut addr = SYSVARS_ADDR as usize;
        for (name, value) in self.fields() {
            writeln!(f, "{:#06x}  {:<12} {}", addr, name, value)?;
            addr += match value {
                FieldValue::Byte(_) => 1,
                FieldValue::Word(_) => 2,
                FieldValue::Bytes(bytes) => bytes.len(),
            };
        }
        Ok(())
    }
}

struct FieldWriter(Vec<u8>);

impl FieldWriter {
    fn byte(&mut self, value: u8) {
        self.0.push(value);
    }

    fn word(&mut self, value: u16) {
        self.0.extend_from_slice(&value.to_le_bytes());
    }

    fn bytes(&mut self, values: &[u8]) {
        self.0.extend_from_slice(values);
    }
}

// Callers check the total length up front, so reads never run off the end.
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl FieldReader<'_> {
    fn byte(&mut self) -> u8 {
        let value = self.bytes[self.pos];
        self.pos += 1;
        value
    }

    fn word(&mut self) -> u16 {
        let value = u16::from_le_bytes([self.bytes[self.pos], self.bytes[self.pos + 1]]);
        self.pos += 2;
        value
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}
