use std::fmt;

/// Number of addressable cells (64KB).
pub const MEMORY_SIZE: usize = 65536;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Address outside 0x0000-0xFFFF. Signed so that negative branch targets can be reported.
    OutOfRange { address: i64 },
    /// Value outside 0-255.
    InvalidValue { address: u32, value: u32 },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryError::OutOfRange { address } => {
                write!(f, "Address {} out of range 0-{}", address, MEMORY_SIZE - 1)
            }
            MemoryError::InvalidValue { address, value } => {
                write!(f, "Value {} at ${:04X} is outside bounds (0-255)", value, address)
            }
        }
    }
}

impl std::error::Error for MemoryError {}

/// Flat, bounds-checked byte storage. Cells never written read as zero.
#[derive(Clone)]
pub struct AddressSpace {
    data: Box<[u8; MEMORY_SIZE]>,
}

impl AddressSpace {
    pub fn new() -> Self {
        AddressSpace {
            data: Box::new([0; MEMORY_SIZE]),
        }
    }

    fn index(address: u32) -> Result<usize, MemoryError> {
        let index = address as usize;
        if index >= MEMORY_SIZE {
            return Err(MemoryError::OutOfRange { address: address as i64 });
        }
        Ok(index)
    }

    pub fn read(&self, address: u32) -> Result<u8, MemoryError> {
        Ok(self.data[Self::index(address)?])
    }

    /// Stores `value` at `address`. Storage is left untouched on error.
    pub fn write(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        let index = Self::index(address)?;
        let byte = u8::try_from(value).map_err(|_| MemoryError::InvalidValue { address, value })?;
        self.data[index] = byte;
        Ok(())
    }

    // Read a 16-bit value in little-endian format; both cells must be in range
    pub fn read_u16(&self, address: u32) -> Result<u16, MemoryError> {
        let low = self.read(address)? as u16;
        let high = self.read(address + 1)? as u16;
        Ok((high << 8) | low)
    }

    /// Copies `bytes` contiguously starting at `start`. Nothing is written if
    /// the block would run past the end of the address space.
    pub fn load(&mut self, start: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        let start = start as usize;
        let end = start + bytes.len();
        if end > MEMORY_SIZE {
            return Err(MemoryError::OutOfRange { address: end as i64 - 1 });
        }
        self.data[start..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let used = self.data.iter().filter(|&&b| b != 0).count();
        f.debug_struct("AddressSpace")
            .field("size", &MEMORY_SIZE)
            .field("non_zero_cells", &used)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_cells_read_zero() {
        let memory = AddressSpace::new();
        assert_eq!(memory.read(0x0000), Ok(0));
        assert_eq!(memory.read(0x8000), Ok(0));
        assert_eq!(memory.read(0xFFFF), Ok(0));
    }

    #[test]
    fn test_write_overwrites() {
        let mut memory = AddressSpace::new();
        memory.write(0x1234, 0x42).unwrap();
        memory.write(0x1234, 0x43).unwrap();
        assert_eq!(memory.read(0x1234), Ok(0x43));
    }

    #[test]
    fn test_out_of_range() {
        let mut memory = AddressSpace::new();
        assert_eq!(memory.read(0x10000), Err(MemoryError::OutOfRange { address: 0x10000 }));
        assert_eq!(
            memory.write(0x10000, 1),
            Err(MemoryError::OutOfRange { address: 0x10000 })
        );
    }

    #[test]
    fn test_invalid_value_leaves_storage_unchanged() {
        let mut memory = AddressSpace::new();
        memory.write(0x50, 0x11).unwrap();
        assert_eq!(
            memory.write(0x50, 256),
            Err(MemoryError::InvalidValue { address: 0x50, value: 256 })
        );
        assert_eq!(memory.read(0x50), Ok(0x11));
    }

    #[test]
    fn test_read_u16_little_endian() {
        let mut memory = AddressSpace::new();
        memory.write(0x20, 0x34).unwrap();
        memory.write(0x21, 0x12).unwrap();
        assert_eq!(memory.read_u16(0x20), Ok(0x1234));

        // high byte would sit past the last cell
        assert!(memory.read_u16(0xFFFF).is_err());
    }

    #[test]
    fn test_load_past_end_writes_nothing() {
        let mut memory = AddressSpace::new();
        assert!(memory.load(0xFFFE, &[1, 2, 3]).is_err());
        assert_eq!(memory.read(0xFFFE), Ok(0));

        memory.load(0xFFFE, &[1, 2]).unwrap();
        assert_eq!(memory.read(0xFFFF), Ok(2));
    }
}
