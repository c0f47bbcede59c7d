//! Loader for raw binary programs: a little-endian 16-bit origin followed by
//! the bytes to place there.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::memory::{AddressSpace, MemoryError};
use crate::metrics::record_program_load;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    /// File shorter than the two-byte origin.
    MissingHeader { len: usize },
    Memory(MemoryError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "Failed to read program: {}", err),
            LoadError::MissingHeader { len } => {
                write!(f, "Program is {} bytes long, too short for a load address", len)
            }
            LoadError::Memory(err) => write!(f, "Program does not fit in memory: {}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Memory(err) => Some(err),
            LoadError::MissingHeader { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<MemoryError> for LoadError {
    fn from(err: MemoryError) -> Self {
        LoadError::Memory(err)
    }
}

/// Copies a program image into memory and returns its origin.
pub fn load_program(memory: &mut AddressSpace, image: &[u8]) -> Result<u16, LoadError> {
    if image.len() < 2 {
        return Err(LoadError::MissingHeader { len: image.len() });
    }
    let origin = u16::from_le_bytes([image[0], image[1]]);
    let body = &image[2..];

    memory.load(origin, body)?;
    record_program_load(body.len());
    debug!("loaded {} bytes at ${:04X}", body.len(), origin);
    Ok(origin)
}

pub fn load_file<P: AsRef<Path>>(memory: &mut AddressSpace, path: P) -> Result<u16, LoadError> {
    let image = fs::read(path.as_ref())?;
    debug!("read {} from disk", path.as_ref().display());
    load_program(memory, &image)
}
