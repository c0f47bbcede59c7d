use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::console::Console;
use crate::emulator::{CpuState, Emulator};
use crate::error::SimError;
use crate::memory::{AddressSpace, MEMORY_SIZE};
use crate::registers::{ProcessorState, StatusFlags};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: Uuid,
    pub label: String,
    pub cpu_state: CpuState,
    pub origin: Option<u16>,
    /// Run-length encoded copy of the whole address space.
    pub memory_dump: Vec<u8>,
    pub compression_ratio: f32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    TruncatedRle,
    WrongSize(usize),
    InvalidState(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SnapshotError::TruncatedRle => write!(f, "Truncated RLE data"),
            SnapshotError::WrongSize(size) => {
                write!(f, "Decompressed size {} != {}", size, MEMORY_SIZE)
            }
            SnapshotError::InvalidState(reason) => write!(f, "Invalid CPU state: {}", reason),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl Snapshot {
    pub fn capture<C: Console>(emulator: &Emulator<C>, label: &str) -> Self {
        let memory_dump = compress_memory(emulator.memory.as_slice());
        let compression_ratio = memory_dump.len() as f32 / MEMORY_SIZE as f32;

        Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            cpu_state: emulator.get_state(),
            origin: emulator.origin,
            memory_dump,
            compression_ratio,
            created_at: Utc::now(),
        }
    }

    /// Nothing in `emulator` changes unless the whole snapshot decodes.
    pub fn restore_to<C: Console>(&self, emulator: &mut Emulator<C>) -> Result<(), SnapshotError> {
        let memory = decompress_memory(&self.memory_dump)?;
        let mut restored = AddressSpace::new();
        restored
            .load(0, &memory)
            .map_err(|err| SnapshotError::InvalidState(err.to_string()))?;

        let saved = &self.cpu_state;
        let mut state = ProcessorState::new();
        state.a.set(saved.a as i64).map_err(invalid_state)?;
        state.x.set(saved.x as i64).map_err(invalid_state)?;
        state.y.set(saved.y as i64).map_err(invalid_state)?;
        state.sp.set(saved.sp as i64).map_err(invalid_state)?;
        state.pc.set(saved.pc as i64).map_err(invalid_state)?;
        state.flags = StatusFlags::from_byte(saved.status);

        emulator.cpu.state = state;
        emulator.cpu.instructions = saved.instructions;
        emulator.cpu.halted = saved.halted;
        emulator.memory = restored;
        emulator.origin = self.origin;
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

fn invalid_state(err: SimError) -> SnapshotError {
    SnapshotError::InvalidState(err.to_string())
}

// Simple run-length encoding: 0xFF marks a run (0xFF, count, byte), 0xFF 0x00 is a literal 0xFF
fn compress_memory(memory: &[u8]) -> Vec<u8> {
    let mut compressed = Vec::new();
    let mut i = 0;

    while i < memory.len() {
        let current_byte = memory[i];
        let mut count = 1;

        // Count consecutive identical bytes (max 255)
        while i + count < memory.len() && memory[i + count] == current_byte && count < 255 {
            count += 1;
        }

        if count > 3 || current_byte == 0 {
            compressed.push(0xFF);
            compressed.push(count as u8);
            compressed.push(current_byte);
        } else {
            for _ in 0..count {
                if current_byte == 0xFF {
                    compressed.push(0xFF);
                    compressed.push(0x00);
                } else {
                    compressed.push(current_byte);
                }
            }
        }

        i += count;
    }

    compressed
}

fn decompress_memory(compressed: &[u8]) -> Result<Vec<u8>, SnapshotError> {
    let mut decompressed = Vec::with_capacity(MEMORY_SIZE);
    let mut i = 0;

    while i < compressed.len() {
        if compressed[i] != 0xFF {
            decompressed.push(compressed[i]);
            i += 1;
            continue;
        }

        match compressed.get(i + 1) {
            None => return Err(SnapshotError::TruncatedRle),
            Some(0x00) => {
                decompressed.push(0xFF);
                i += 2;
            }
            Some(&count) => {
                let value = *compressed.get(i + 2).ok_or(SnapshotError::TruncatedRle)?;
                decompressed.extend(std::iter::repeat(value).take(count as usize));
                i += 3;
            }
        }
    }

    if decompressed.len() != MEMORY_SIZE {
        return Err(SnapshotError::WrongSize(decompressed.len()));
    }

    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::console::BufferConsole;

    #[test]
    fn test_memory_compression() {
        let mut memory = vec![0u8; MEMORY_SIZE];
        memory[0x1000..0x1004].copy_from_slice(&[0xFF; 4]);
        memory[0x2000] = 0xAA;
        memory[0x2001] = 0xBB;
        memory[0x2002] = 0xCC;

        let compressed = compress_memory(&memory);
        assert!(compressed.len() < memory.len());
        assert_eq!(decompress_memory(&compressed).unwrap(), memory);
    }

    #[test]
    fn test_rle_escape() {
        let mut memory = vec![0x00; MEMORY_SIZE];
        memory[0] = 0xFF;
        memory[1] = 0xFF;
        memory[2] = 0xAA;
        memory[3] = 0xFF;

        let compressed = compress_memory(&memory);
        assert_eq!(decompress_memory(&compressed).unwrap(), memory);
    }

    #[test]
    fn test_truncated_dump() {
        assert_eq!(decompress_memory(&[0xFF]), Err(SnapshotError::TruncatedRle));
        assert_eq!(decompress_memory(&[0xFF, 0x10]), Err(SnapshotError::TruncatedRle));
        assert_eq!(decompress_memory(&[0x01, 0x02]), Err(SnapshotError::WrongSize(2)));
    }

    #[test]
    fn test_capture_and_restore() {
        let mut emulator = Emulator::new(SimConfig::default(), BufferConsole::new());
        // LDX #$05, DEX, STA $10, BRK
        emulator.load_program(&[0x00, 0x06, 0xA2, 0x05, 0xCA, 0x85, 0x10, 0x00]).unwrap();
        emulator.cpu.state.flags.zero = true;
        emulator.run().unwrap();

        let snapshot = Snapshot::capture(&emulator, "after run");
        let json = snapshot.to_json().unwrap();

        let mut fresh = Emulator::new(SimConfig::default(), BufferConsole::new());
        Snapshot::from_json(&json).unwrap().restore_to(&mut fresh).unwrap();

        assert_eq!(fresh.get_state(), emulator.get_state());
        assert_eq!(fresh.memory.as_slice(), emulator.memory.as_slice());
        assert_eq!(fresh.origin, Some(0x0600));
        assert!(fresh.get_state().flags.zero);
        assert_eq!(snapshot.id.get_version_num(), 4);
    }
}
