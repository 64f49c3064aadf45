//! Reading object files and writing tape images

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::zx81::error::TapeError;

/// Read a raw object file in full.
pub fn read_object_file(path: &Path) -> Result<Vec<u8>, TapeError> {
    fs::read(path).map_err(|e| {
        TapeError::IOError(format!("Failed to read '{}': {}", path.display(), e))
    })
}

/// Write a tape image, removing the file again if any write fails so no
/// truncated image is left behind.
pub fn write_tape_file(path: &Path, image: &[u8]) -> Result<(), TapeError> {
    let mut file = File::create(path).map_err(|e| {
        TapeError::IOError(format!("Failed to create '{}': {}", path.display(), e))
    })?;

    let written = file.write_all(image).and_then(|_| file.sync_all());
    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            log::warn!(
                "Could not remove partial tape file '{}': {}",
                path.display(),
                cleanup
            );
        }
        return Err(TapeError::IOError(format!(
            "Failed to write '{}': {}",
            path.display(),
            e
        )));
    }

    log::debug!("Wrote {} bytes to {}", image.len(), path.display());
    Ok(())
}
