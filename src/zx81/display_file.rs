// ZX81 display file
//
// A fully expanded, blank display: a leading NEWLINE, then 24 rows of 32
// spaces each closed by NEWLINE. The byte after the display is the 0x80
// that terminates the (empty) variables area, so VARS points at it.

use crate::zx81::charset::{INVERSE, NEWLINE};

pub const ROWS: usize = 24;
pub const COLUMNS: usize = 32;

/// Marks the end of the variables area, and so the end of the saved image.
pub const END_MARKER: u8 = INVERSE;

pub const DISPLAY_FILE_LEN: usize = 1 + ROWS * (COLUMNS + 1) + 1;

pub fn blank_display_file() -> Vec<u8> {
    let mut buffer = Vec::with_capacity(DISPLAY_FILE_LEN);
    buffer.push(NEWLINE);
    for _ in 0..ROWS {
        buffer.extend_from_slice(&[0x00; COLUMNS]);
        buffer.push(NEWLINE);
    }
    buffer.push(END_MARKER);
    buffer
}

/// Check that `bytes` has the shape of a display file followed by the end
/// marker. Cell contents are not checked.
pub fn is_display_file(bytes: &[u8]) -> bool {
    if bytes.len() != DISPLAY_FILE_LEN || bytes[0] != NEWLINE {
        return false;
    }
    let rows_ok = bytes[1..DISPLAY_FILE_LEN - 1]
        .chunks(COLUMNS + 1)
        .all(|row| row[COLUMNS] == NEWLINE);
    rows_ok && bytes[DISPLAY_FILE_LEN - 1] == END_MARKER
}
