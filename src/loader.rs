//! Bytecode file loading: a raw little-endian byte stream with no header,
//! magic number, or checksum (spec.md §6).

use std::path::Path;

use tracing::debug;

use crate::error::VmError;

/// Read an entire bytecode file into memory.
pub fn load_program<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, VmError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), len = bytes.len(), "loaded bytecode file");
    Ok(bytes)
}
